// THEORY (Pixel):
// The `Pixel` module is the single-pixel layer of the difference engine. A `Pixel`
// is a "dumb" container of four floating point channels plus the transforms that
// only need that one pixel: decoding from the packed form, compositing onto white
// and projecting into YIQ. Anything that needs a second pixel (deltas) lives in
// `SmartPixel`.
//
// Channel ranges:
// - decoded:    r, g, b, a in 0..=255
// - composited: r, g, b blended toward 255, a normalized to 0..=1
//
// Compositing onto an opaque white backdrop is what most viewers do with partial
// transparency, so two pixels compare the way they would look on screen rather
// than by their unpremultiplied channels. A fully transparent pixel is pure white
// no matter what color bits it carries.
//
// The YIQ coefficients are applied left to right, multiply then add. Keep that
// order: reassociating the sums changes the rounding of the result.

pub mod pixel {
    use crate::core_modules::raw_pixel::raw_pixel::{self, RawPixel};
    use crate::error::{DiffError, Result};

    pub type Channel = f64;
    pub type Luma = f64;
    pub type Chroma = f64;

    const OPAQUE: Channel = 255.0;
    const WHITE: Channel = 255.0;

    /// A single RGBA pixel with floating point channels.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Pixel {
        /// The red channel value.
        pub r: Channel,
        /// The green channel value.
        pub g: Channel,
        /// The blue channel value.
        pub b: Channel,
        /// The alpha channel value: 0..=255 when decoded, 0..=1 once composited.
        pub a: Channel,
    }

    /// A pixel projected into the YIQ color space.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Yiq {
        /// Luma.
        pub y: Luma,
        /// In-phase chroma (orange-blue axis).
        pub i: Chroma,
        /// Quadrature chroma (purple-green axis).
        pub q: Chroma,
    }

    impl Pixel {
        pub fn new(r: Channel, g: Channel, b: Channel, a: Channel) -> Self {
            Pixel { r, g, b, a }
        }

        /// Unpacks a raw pixel into its four channels. Total: every `u32` decodes.
        #[inline]
        pub fn decode(raw: RawPixel) -> Self {
            Pixel {
                r: raw_pixel::red(raw) as Channel,
                g: raw_pixel::green(raw) as Channel,
                b: raw_pixel::blue(raw) as Channel,
                a: raw_pixel::alpha(raw) as Channel,
            }
        }

        /// Flattens the pixel onto an opaque white backdrop.
        ///
        /// - `a == 0`: pure white with alpha 0, whatever the color channels hold.
        /// - `a == 255`: color passes through, alpha becomes 1.0.
        /// - otherwise each color channel moves toward 255 by `1 - a/255`.
        ///
        /// Returns `InvalidAlpha` for alpha above 255. Decoded pixels never hit
        /// that case; it only guards hand-built `Pixel`s.
        #[inline]
        pub fn blend(&self) -> Result<Pixel> {
            if self.a > OPAQUE {
                return Err(DiffError::InvalidAlpha { alpha: self.a });
            }
            if self.a == 0.0 {
                return Ok(Pixel::new(WHITE, WHITE, WHITE, 0.0));
            }
            if self.a == OPAQUE {
                return Ok(Pixel::new(self.r, self.g, self.b, 1.0));
            }

            let coverage = self.a / OPAQUE;
            Ok(Pixel {
                r: WHITE + (self.r - WHITE) * coverage,
                g: WHITE + (self.g - WHITE) * coverage,
                b: WHITE + (self.b - WHITE) * coverage,
                a: coverage,
            })
        }

        /// Luma (Y) of the pixel. Alpha is ignored.
        #[inline]
        pub fn luma(&self) -> Luma {
            self.r * 0.29889531 + self.g * 0.58662247 + self.b * 0.11448223
        }

        /// In-phase chroma (I).
        #[inline]
        pub fn in_phase(&self) -> Chroma {
            self.r * 0.59597799 - self.g * 0.27417610 - self.b * 0.32180189
        }

        /// Quadrature chroma (Q).
        #[inline]
        pub fn quadrature(&self) -> Chroma {
            self.r * 0.21147017 - self.g * 0.52261711 + self.b * 0.31114694
        }

        pub fn to_yiq(&self) -> Yiq {
            Yiq {
                y: self.luma(),
                i: self.in_phase(),
                q: self.quadrature(),
            }
        }
    }

    impl From<RawPixel> for Pixel {
        fn from(raw: RawPixel) -> Self {
            Pixel::decode(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;
    use crate::error::DiffError;

    #[test]
    fn decodes_zero_to_transparent_black() {
        assert_eq!(Pixel::decode(0x00000000), Pixel::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn decodes_red_from_lowest_byte() {
        assert_eq!(
            Pixel::decode(0xFF33A1CE),
            Pixel::new(206.0, 161.0, 51.0, 255.0)
        );
    }

    #[test]
    fn transparent_pixel_blends_to_white() {
        let blended = Pixel::decode(0x0012_3456).blend().unwrap();
        assert_eq!(blended, Pixel::new(255.0, 255.0, 255.0, 0.0));
    }

    #[test]
    fn opaque_pixel_keeps_color_and_normalizes_alpha() {
        let blended = Pixel::new(10.0, 20.0, 30.0, 255.0).blend().unwrap();
        assert_eq!(blended, Pixel::new(10.0, 20.0, 30.0, 1.0));
    }

    #[test]
    fn partial_alpha_moves_color_toward_white() {
        let pixel = Pixel::new(0.0, 255.0, 100.0, 51.0);
        let blended = pixel.blend().unwrap();
        let k = 51.0 / 255.0;
        assert_eq!(blended.r, 255.0 + (0.0 - 255.0) * k);
        assert_eq!(blended.g, 255.0);
        assert_eq!(blended.b, 255.0 + (100.0 - 255.0) * k);
        assert_eq!(blended.a, k);
        assert!(blended.r > pixel.r);
    }

    #[test]
    fn alpha_above_range_is_rejected() {
        let err = Pixel::new(0.0, 0.0, 0.0, 256.0).blend().unwrap_err();
        assert_eq!(err, DiffError::InvalidAlpha { alpha: 256.0 });
    }

    #[test]
    fn white_has_full_luma_and_no_chroma() {
        let yiq = Pixel::new(255.0, 255.0, 255.0, 1.0).to_yiq();
        assert!((yiq.y - 255.0).abs() < 1e-5);
        assert!(yiq.i.abs() < 1e-5);
        assert!(yiq.q.abs() < 1e-5);
    }

    #[test]
    fn yiq_ignores_alpha() {
        let opaque = Pixel::new(12.0, 200.0, 99.0, 1.0).to_yiq();
        let faded = Pixel::new(12.0, 200.0, 99.0, 0.25).to_yiq();
        assert_eq!(opaque, faded);
    }
}
