// Frame ingestion helpers: turn in-memory RGBA8 data into packed pixels.
// No file I/O here; decoding image files is the caller's job.

pub mod image_helper {
    use crate::core_modules::raw_pixel::raw_pixel::{self, RawPixel};
    use crate::error::{DiffError, Result};
    use image::RgbaImage;

    const CHANNELS: usize = 4;

    /// Packs an RGBA8 byte buffer (`[r, g, b, a, r, g, b, a, ...]`) into raw pixels.
    pub fn pack_rgba_bytes(buffer: &[u8]) -> Result<Vec<RawPixel>> {
        if buffer.len() % CHANNELS != 0 {
            return Err(DiffError::MisalignedBuffer { len: buffer.len() });
        }
        Ok(buffer
            .chunks_exact(CHANNELS)
            .map(|px| raw_pixel::pack(px[0], px[1], px[2], px[3]))
            .collect())
    }

    /// Packs an `image` crate RGBA buffer, row-major.
    pub fn pack_rgba_image(image: &RgbaImage) -> Vec<RawPixel> {
        image
            .pixels()
            .map(|px| raw_pixel::pack(px[0], px[1], px[2], px[3]))
            .collect()
    }
}
