// THEORY:
// The `SmartPixel` module is the pairwise layer of the engine. It wraps a
// composited `Pixel` together with its YIQ projection and compares it against
// another `SmartPixel`. A `SmartPixel` on its own says nothing; its value is in
// the relationship.
//
// Two "lenses" of difference:
// - `delta_color`: weighted squared YIQ distance. Never negative, symmetric. Luma
//   carries the largest weight since the eye is more sensitive to brightness than
//   to chroma.
// - `delta_brightness`: signed luma difference, antisymmetric. Useful for telling
//   whether a pixel got lighter or darker.
//
// The YIQ projection is computed once in the constructor so a pixel compared
// against several others does not pay for it again.

pub mod smart_pixel {
    use crate::core_modules::pixel::pixel::{Pixel, Yiq};
    use crate::core_modules::raw_pixel::raw_pixel::RawPixel;
    use crate::error::Result;

    pub type Delta = f64;
    pub type ColorDelta = Delta;
    pub type BrightnessDelta = Delta;

    const LUMA_WEIGHT: f64 = 0.5053;
    const IN_PHASE_WEIGHT: f64 = 0.299;
    const QUADRATURE_WEIGHT: f64 = 0.1957;

    /// A composited pixel with its YIQ coordinates cached for comparison.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct SmartPixel {
        /// The pixel after compositing onto white.
        pub pixel: Pixel,
        yiq: Yiq,
    }

    impl SmartPixel {
        /// Composites `pixel` onto white and caches its YIQ projection.
        pub fn new(pixel: Pixel) -> Result<Self> {
            let pixel = pixel.blend()?;
            Ok(Self {
                yiq: pixel.to_yiq(),
                pixel,
            })
        }

        pub fn from_raw(raw: RawPixel) -> Result<Self> {
            Self::new(Pixel::decode(raw))
        }

        pub fn yiq(&self) -> Yiq {
            self.yiq
        }

        pub fn delta_color(&self, other: &SmartPixel) -> ColorDelta {
            let yd = self.yiq.y - other.yiq.y;
            let id = self.yiq.i - other.yiq.i;
            let qd = self.yiq.q - other.yiq.q;

            LUMA_WEIGHT * yd * yd + IN_PHASE_WEIGHT * id * id + QUADRATURE_WEIGHT * qd * qd
        }

        pub fn delta_brightness(&self, other: &SmartPixel) -> BrightnessDelta {
            self.yiq.y - other.yiq.y
        }
    }

    /// Perceptual color difference between two raw pixels.
    #[inline]
    pub fn color_delta(left: RawPixel, right: RawPixel) -> Result<ColorDelta> {
        Ok(SmartPixel::from_raw(left)?.delta_color(&SmartPixel::from_raw(right)?))
    }

    /// Signed luma difference `Y(left) - Y(right)` between two raw pixels.
    #[inline]
    pub fn brightness_delta(left: RawPixel, right: RawPixel) -> Result<BrightnessDelta> {
        Ok(SmartPixel::from_raw(left)?.delta_brightness(&SmartPixel::from_raw(right)?))
    }
}
