pub mod accumulator;
pub mod pixel;
pub mod raw_pixel;
pub mod smart_pixel;
pub mod utils;
