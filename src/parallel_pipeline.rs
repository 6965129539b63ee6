// THEORY:
// `ParallelDiff` is the multi-worker front end of the engine. Per-pixel deltas have
// no dependency between indices, so an image is cut into contiguous ranges, one
// per worker, and each worker writes only its own range. Range outputs are joined
// back in range order, so the result is exactly what the sequential pipeline gives.
//
// The mean is different: compensated summation is order dependent. Each worker
// folds its range sequentially into a `KahanSum` and the partials are merged in
// ascending range order. For a fixed worker count the mean is bit-identical from
// run to run; changing the worker count may move the last bits.
//
// Workers run on tokio's blocking pool since the work is CPU bound and never
// awaits. Inputs are shared as `Arc<[RawPixel]>` so no worker copies pixel data.

use crate::core_modules::accumulator::KahanSum;
use crate::core_modules::raw_pixel::raw_pixel::RawPixel;
use crate::core_modules::smart_pixel::smart_pixel::{self, Delta};
use crate::error::{DiffError, Result, ensure_same_length};
use crate::pipeline::{
    DiffConfig, DiffPipeline, DifferenceReport, ReportKind, accumulate_color_deltas, batch_with,
};
use std::ops::Range;
use std::sync::Arc;

pub type SharedImage = Arc<[RawPixel]>;

/// Splits `0..len` into at most `workers` contiguous, ordered ranges.
fn worker_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    let span = len.div_ceil(workers.max(1)).max(1);
    (0..len)
        .step_by(span)
        .map(|start| start..(start + span).min(len))
        .collect()
}

/// The parallel difference engine.
#[derive(Debug, Clone, Default)]
pub struct ParallelDiff {
    config: DiffConfig,
    sequential: DiffPipeline,
}

impl ParallelDiff {
    pub fn new(config: DiffConfig) -> Self {
        Self {
            sequential: DiffPipeline::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    fn runs_inline(&self, len: usize) -> bool {
        len < self.config.min_parallel_len || self.config.effective_workers() == 1
    }

    /// Runs `work` over each worker range and returns the outputs in range order.
    async fn run_ranges<T, F>(&self, left: SharedImage, right: SharedImage, work: F) -> Result<Vec<T>>
    where
        T: Send + 'static,
        F: Fn(&[RawPixel], &[RawPixel]) -> Result<T> + Send + Sync + 'static,
    {
        let ranges = worker_ranges(left.len(), self.config.effective_workers());
        log::debug!(
            "splitting {} pixels across {} workers",
            left.len(),
            ranges.len()
        );

        let work = Arc::new(work);
        let tasks = ranges.into_iter().enumerate().map(|(worker, range)| {
            let left = Arc::clone(&left);
            let right = Arc::clone(&right);
            let work = Arc::clone(&work);
            tokio::task::spawn_blocking(move || {
                log::trace!("worker {worker} processing pixels {range:?}");
                work(&left[range.clone()], &right[range])
            })
        });

        let outputs = futures::future::try_join_all(tasks)
            .await
            .map_err(|e| DiffError::WorkerFailed(e.to_string()))?;
        outputs.into_iter().collect()
    }

    /// One color delta per pixel pair, computed across workers.
    pub async fn batch_color_deltas(
        &self,
        left: SharedImage,
        right: SharedImage,
    ) -> Result<Vec<Delta>> {
        ensure_same_length(left.len(), right.len())?;
        if self.runs_inline(left.len()) {
            return self.sequential.batch_color_deltas(&left, &right);
        }

        let lane_width = self.config.effective_lane_width();
        let parts = self
            .run_ranges(left, right, move |l, r| {
                batch_with(l, r, lane_width, smart_pixel::color_delta)
            })
            .await?;
        Ok(parts.concat())
    }

    /// One signed brightness delta per pixel pair, computed across workers.
    pub async fn batch_brightness_deltas(
        &self,
        left: SharedImage,
        right: SharedImage,
    ) -> Result<Vec<Delta>> {
        ensure_same_length(left.len(), right.len())?;
        if self.runs_inline(left.len()) {
            return self.sequential.batch_brightness_deltas(&left, &right);
        }

        let lane_width = self.config.effective_lane_width();
        let parts = self
            .run_ranges(left, right, move |l, r| {
                batch_with(l, r, lane_width, smart_pixel::brightness_delta)
            })
            .await?;
        Ok(parts.concat())
    }

    /// Mean color delta. Worker partials are merged in range order.
    pub async fn image_difference(&self, left: SharedImage, right: SharedImage) -> Result<Delta> {
        ensure_same_length(left.len(), right.len())?;
        if self.runs_inline(left.len()) {
            return self.sequential.image_difference(&left, &right);
        }

        let partials = self
            .run_ranges(left, right, accumulate_color_deltas)
            .await?;
        let total = partials
            .into_iter()
            .fold(KahanSum::new(), KahanSum::merge);
        Ok(total.mean())
    }

    pub async fn report(
        &self,
        left: SharedImage,
        right: SharedImage,
        kind: ReportKind,
    ) -> Result<DifferenceReport> {
        match kind {
            ReportKind::PerPixel => self
                .batch_color_deltas(left, right)
                .await
                .map(DifferenceReport::PerPixel),
            ReportKind::Mean => self
                .image_difference(left, right)
                .await
                .map(DifferenceReport::Mean),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise(len: usize, seed: u32) -> SharedImage {
        (0..len as u32)
            .map(|i| (i ^ seed).wrapping_mul(0x9E37_79B9))
            .collect::<Vec<_>>()
            .into()
    }

    fn parallel(workers: usize) -> ParallelDiff {
        ParallelDiff::new(
            DiffConfig::default()
                .with_worker_count(workers)
                .with_min_parallel_len(0),
        )
    }

    #[test]
    fn ranges_cover_every_index_once_in_order() {
        for (len, workers) in [(0, 4), (1, 4), (10, 3), (100, 7), (16, 16), (5, 0)] {
            let ranges = worker_ranges(len, workers);
            let flattened: Vec<usize> = ranges.iter().cloned().flatten().collect();
            assert_eq!(flattened, (0..len).collect::<Vec<_>>());
            assert!(ranges.len() <= workers.max(1));
        }
    }

    #[tokio::test]
    async fn parallel_batch_matches_sequential() {
        let left = noise(10_007, 1);
        let right = noise(10_007, 2);
        let expected = DiffPipeline::default()
            .batch_color_deltas(&left, &right)
            .unwrap();

        for workers in [1, 2, 3, 8] {
            let deltas = parallel(workers)
                .batch_color_deltas(left.clone(), right.clone())
                .await
                .unwrap();
            assert_eq!(deltas, expected, "workers = {workers}");
        }
    }

    #[tokio::test]
    async fn parallel_brightness_matches_sequential() {
        let left = noise(4_099, 5);
        let right = noise(4_099, 6);
        let expected = DiffPipeline::default()
            .batch_brightness_deltas(&left, &right)
            .unwrap();
        let deltas = parallel(4)
            .batch_brightness_deltas(left, right)
            .await
            .unwrap();
        assert_eq!(deltas, expected);
    }

    #[tokio::test]
    async fn parallel_mean_is_reproducible() {
        let left = noise(50_000, 9);
        let right = noise(50_000, 10);
        let engine = parallel(6);

        let first = engine.image_difference(left.clone(), right.clone()).await.unwrap();
        let second = engine.image_difference(left.clone(), right.clone()).await.unwrap();
        assert_eq!(first.to_bits(), second.to_bits());

        let sequential = DiffPipeline::default().image_difference(&left, &right).unwrap();
        assert!((first - sequential).abs() < 1e-9 * sequential.max(1.0));
    }

    #[tokio::test]
    async fn single_worker_mean_equals_sequential() {
        let left = noise(3_000, 21);
        let right = noise(3_000, 22);
        let sequential = DiffPipeline::default().image_difference(&left, &right).unwrap();
        let mean = parallel(1).image_difference(left, right).await.unwrap();
        assert_eq!(mean, sequential);
    }

    #[tokio::test]
    async fn mismatch_is_rejected_before_spawning() {
        let err = parallel(4)
            .image_difference(noise(8, 0), noise(9, 0))
            .await
            .unwrap_err();
        assert_eq!(err, DiffError::LengthMismatch { left: 8, right: 9 });
    }

    #[tokio::test]
    async fn identical_images_report_zero() {
        let image = noise(20_000, 77);
        let report = parallel(4)
            .report(image.clone(), image, ReportKind::Mean)
            .await
            .unwrap();
        assert_eq!(report, DifferenceReport::Mean(0.0));
    }

    #[tokio::test]
    async fn small_images_run_inline() {
        let engine = ParallelDiff::new(DiffConfig::default().with_worker_count(8));
        let left = noise(100, 1);
        let right = noise(100, 2);
        let expected = DiffPipeline::default().image_difference(&left, &right).unwrap();
        assert_eq!(engine.image_difference(left, right).await.unwrap(), expected);
    }
}
