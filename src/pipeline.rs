// THEORY:
// The `pipeline` module is the top-level synchronous API of the difference engine.
// It takes two images as packed pixel slices and runs every pixel pair through
// decode -> composite -> YIQ -> delta, producing either one delta per pixel or a
// single compensated mean.
//
// Every entry point checks the image lengths before touching a pixel, so a
// mismatched call does no partial work. The per-pixel loop walks the images in
// fixed-width lanes for cache locality; the lane width has no effect on the output.

use crate::core_modules::accumulator::KahanSum;
use crate::core_modules::raw_pixel::raw_pixel::RawPixel;
use crate::core_modules::smart_pixel::smart_pixel::{self, Delta};
use crate::error::{Result, ensure_same_length};

const DEFAULT_LANE_WIDTH: usize = 64;
const DEFAULT_MIN_PARALLEL_LEN: usize = 16_384;

/// Configuration for the difference pipelines.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffConfig {
    /// Number of workers the parallel pipeline splits an image across.
    pub worker_count: usize,
    /// Images shorter than this are processed on the calling task.
    pub min_parallel_len: usize,
    /// Number of pixels handled per lane of the batch loop.
    pub lane_width: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get().max(1),
            min_parallel_len: DEFAULT_MIN_PARALLEL_LEN,
            lane_width: DEFAULT_LANE_WIDTH,
        }
    }
}

impl DiffConfig {
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_min_parallel_len(mut self, min_parallel_len: usize) -> Self {
        self.min_parallel_len = min_parallel_len;
        self
    }

    pub fn with_lane_width(mut self, lane_width: usize) -> Self {
        self.lane_width = lane_width;
        self
    }

    pub(crate) fn effective_workers(&self) -> usize {
        self.worker_count.max(1)
    }

    pub(crate) fn effective_lane_width(&self) -> usize {
        self.lane_width.max(1)
    }
}

/// Which shape of report to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    PerPixel,
    Mean,
}

/// The result of comparing two images.
#[derive(Debug, Clone, PartialEq)]
pub enum DifferenceReport {
    /// One color delta per pixel, in image order.
    PerPixel(Vec<Delta>),
    /// The mean color delta over the whole image.
    Mean(Delta),
}

impl DifferenceReport {
    /// Mean color delta. A per-pixel report is reduced with compensated summation.
    pub fn mean(&self) -> Delta {
        match self {
            DifferenceReport::PerPixel(deltas) => {
                deltas.iter().copied().collect::<KahanSum>().mean()
            }
            DifferenceReport::Mean(mean) => *mean,
        }
    }
}

/// Applies `op` to each pixel pair, walking both images in lanes of `lane_width`.
/// Lengths must already be checked.
pub(crate) fn batch_with<F>(
    left: &[RawPixel],
    right: &[RawPixel],
    lane_width: usize,
    op: F,
) -> Result<Vec<Delta>>
where
    F: Fn(RawPixel, RawPixel) -> Result<Delta>,
{
    let mut deltas = Vec::with_capacity(left.len());
    for (lane_left, lane_right) in left.chunks(lane_width).zip(right.chunks(lane_width)) {
        for (&a, &b) in lane_left.iter().zip(lane_right) {
            deltas.push(op(a, b)?);
        }
    }
    Ok(deltas)
}

/// Folds the color deltas of each pixel pair into a `KahanSum`, in image order.
/// Lengths must already be checked.
pub(crate) fn accumulate_color_deltas(left: &[RawPixel], right: &[RawPixel]) -> Result<KahanSum> {
    left.iter()
        .zip(right)
        .try_fold(KahanSum::new(), |sum, (&a, &b)| {
            Ok(sum.add(smart_pixel::color_delta(a, b)?))
        })
}

/// The synchronous difference engine.
#[derive(Debug, Clone, Default)]
pub struct DiffPipeline {
    config: DiffConfig,
}

impl DiffPipeline {
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// One color delta per pixel pair.
    pub fn batch_color_deltas(&self, left: &[RawPixel], right: &[RawPixel]) -> Result<Vec<Delta>> {
        ensure_same_length(left.len(), right.len())?;
        log::debug!("batch color deltas over {} pixels", left.len());
        batch_with(
            left,
            right,
            self.config.effective_lane_width(),
            smart_pixel::color_delta,
        )
    }

    /// One signed brightness delta per pixel pair.
    pub fn batch_brightness_deltas(
        &self,
        left: &[RawPixel],
        right: &[RawPixel],
    ) -> Result<Vec<Delta>> {
        ensure_same_length(left.len(), right.len())?;
        log::debug!("batch brightness deltas over {} pixels", left.len());
        batch_with(
            left,
            right,
            self.config.effective_lane_width(),
            smart_pixel::brightness_delta,
        )
    }

    /// Mean color delta over the image. Two empty images differ by 0.0.
    pub fn image_difference(&self, left: &[RawPixel], right: &[RawPixel]) -> Result<Delta> {
        ensure_same_length(left.len(), right.len())?;
        log::debug!("image difference over {} pixels", left.len());
        Ok(accumulate_color_deltas(left, right)?.mean())
    }

    pub fn report(
        &self,
        left: &[RawPixel],
        right: &[RawPixel],
        kind: ReportKind,
    ) -> Result<DifferenceReport> {
        match kind {
            ReportKind::PerPixel => self
                .batch_color_deltas(left, right)
                .map(DifferenceReport::PerPixel),
            ReportKind::Mean => self
                .image_difference(left, right)
                .map(DifferenceReport::Mean),
        }
    }
}
