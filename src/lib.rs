// THEORY:
// This file is the main entry point for the `pixel_delta` library crate.
//
// The crate compares two images pixel by pixel. Images arrive as slices of packed
// 32-bit pixels; each pair is decoded, composited onto white, projected into YIQ
// and reduced to a perceptual delta. The deltas come back either one per pixel or
// as a single mean accumulated with compensated summation.
//
// `DiffPipeline` is the synchronous API and `ParallelDiff` spreads the same work
// across tokio blocking workers. The single-pixel and pairwise building blocks in
// `core_modules` are public for callers that want to compare individual pixels.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::accumulator::KahanSum;
pub use core_modules::pixel::pixel::{Pixel, Yiq};
pub use core_modules::raw_pixel::raw_pixel::RawPixel;
pub use core_modules::smart_pixel::smart_pixel::{
    Delta, SmartPixel, brightness_delta, color_delta,
};
pub use core_modules::utils::image_helper::image_helper::{pack_rgba_bytes, pack_rgba_image};
pub use error::{DiffError, Result};
pub use parallel_pipeline::{ParallelDiff, SharedImage};
pub use pipeline::{DiffConfig, DiffPipeline, DifferenceReport, ReportKind};
