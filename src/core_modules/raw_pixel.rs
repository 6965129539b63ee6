// THEORY:
// A `RawPixel` is the packed wire form of a single pixel: one `u32` holding four
// 8-bit channels. Callers hand us whole images as `&[RawPixel]`, so this is the
// representation every pipeline stage starts from.
//
// Layout (high byte to low byte):
//
//     [ A : 24-31 ][ B : 16-23 ][ G : 8-15 ][ R : 0-7 ]
//
// Red lives in the lowest byte, which is what a little-endian load of an RGBA8
// byte buffer produces. Extraction is mask-and-shift only, so every `u32` is a
// valid raw pixel and decoding can never fail.

pub mod raw_pixel {
    pub type RawPixel = u32;
    pub type Byte = u8;

    const CHANNEL_MASK: RawPixel = 0xFF;
    const GREEN_SHIFT: u32 = 8;
    const BLUE_SHIFT: u32 = 16;
    const ALPHA_SHIFT: u32 = 24;

    #[inline]
    pub fn red(raw: RawPixel) -> Byte {
        (raw & CHANNEL_MASK) as Byte
    }

    #[inline]
    pub fn green(raw: RawPixel) -> Byte {
        ((raw >> GREEN_SHIFT) & CHANNEL_MASK) as Byte
    }

    #[inline]
    pub fn blue(raw: RawPixel) -> Byte {
        ((raw >> BLUE_SHIFT) & CHANNEL_MASK) as Byte
    }

    #[inline]
    pub fn alpha(raw: RawPixel) -> Byte {
        ((raw >> ALPHA_SHIFT) & CHANNEL_MASK) as Byte
    }

    /// Packs four 8-bit channels into a `RawPixel`. Inverse of the extractors above.
    #[inline]
    pub fn pack(red: Byte, green: Byte, blue: Byte, alpha: Byte) -> RawPixel {
        (red as RawPixel)
            | ((green as RawPixel) << GREEN_SHIFT)
            | ((blue as RawPixel) << BLUE_SHIFT)
            | ((alpha as RawPixel) << ALPHA_SHIFT)
    }
}

#[cfg(test)]
mod tests {
    use super::raw_pixel::*;

    #[test]
    fn extracts_channels_from_low_to_high_byte() {
        let raw: RawPixel = 0xFF33A1CE;
        assert_eq!(red(raw), 0xCE);
        assert_eq!(green(raw), 0xA1);
        assert_eq!(blue(raw), 0x33);
        assert_eq!(alpha(raw), 0xFF);
    }

    #[test]
    fn pack_is_inverse_of_extraction() {
        for raw in [0u32, 1, 0x80, 0xFF00FF00, 0x12345678, u32::MAX] {
            assert_eq!(pack(red(raw), green(raw), blue(raw), alpha(raw)), raw);
        }
    }
}
