// THEORY:
// The `Accumulator` reduces a stream of per-pixel deltas into a mean. Images
// routinely hold 10^5 to 10^7 pixels, and a naive running `f64` sum drifts as the
// total grows and each small delta loses its low bits. Kahan (compensated)
// summation carries the lost low-order part in a second term and feeds it back
// into the next addition, keeping the error close to a single rounding.
//
// `KahanSum` is a plain value threaded through a fold: old accumulator plus one
// delta gives the new accumulator. There is no hidden state, so partial sums from
// independent ranges can be combined with `merge`.
//
// The result depends on the order deltas are folded in. Callers that split work
// must merge partials in a fixed order to get the same bits back on every run.

use crate::core_modules::smart_pixel::smart_pixel::Delta;

/// A compensated running sum of deltas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KahanSum {
    sum: f64,
    compensation: f64,
    count: usize,
}

impl KahanSum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one delta into the sum.
    #[inline]
    #[must_use]
    pub fn add(self, delta: Delta) -> Self {
        let y = delta - self.compensation;
        let t = self.sum + y;
        Self {
            compensation: (t - self.sum) - y,
            sum: t,
            count: self.count + 1,
        }
    }

    /// Combines a partial sum covering the range directly after this one.
    ///
    /// The other side's total is folded in as a single compensated term, after
    /// its own lost low-order part has been subtracted.
    #[must_use]
    pub fn merge(self, other: KahanSum) -> Self {
        let y = (other.sum - other.compensation) - self.compensation;
        let t = self.sum + y;
        Self {
            compensation: (t - self.sum) - y,
            sum: t,
            count: self.count + other.count,
        }
    }

    pub fn total(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean of every folded delta. An empty sum has mean 0.0.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }
}

impl FromIterator<Delta> for KahanSum {
    fn from_iter<I: IntoIterator<Item = Delta>>(iter: I) -> Self {
        iter.into_iter().fold(KahanSum::new(), KahanSum::add)
    }
}

impl Extend<Delta> for KahanSum {
    fn extend<I: IntoIterator<Item = Delta>>(&mut self, iter: I) {
        *self = iter.into_iter().fold(*self, KahanSum::add);
    }
}
