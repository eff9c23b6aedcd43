use super::types::PartialSums;

use rayon::prelude::*;
use std::f64::consts::TAU;

/// Computes partial sums for every candidate period below `max_periods`.
#[derive(Debug, Clone, Copy)]
pub struct PeriodCorrelator {
    max_periods: usize,
}

impl PeriodCorrelator {
    pub fn new(max_periods: usize) -> Self {
        Self { max_periods }
    }

    /// Projects `samples` (whose first element sits at global index `offset`) onto
    /// every candidate period. Periods are independent and run in parallel.
    pub fn correlate(&self, samples: &[f32], offset: usize) -> PartialSums {
        let mut sums = PartialSums::zeroed(self.max_periods);

        if self.max_periods > 1 {
            sums.0[1..]
                .par_iter_mut()
                .enumerate()
                .for_each(|(index, slot)| {
                    *slot = project(samples, offset, index + 1);
                });
        }

        tracing::trace!(
            "Correlated {} samples at offset {} against {} periods",
            samples.len(),
            offset,
            self.max_periods.saturating_sub(1)
        );
        sums
    }
}

/// `Σ_t samples[t] * sin((2π / period) * (offset + t))` for one period.
///
/// # Panics
/// If `period` is 0.
pub fn project(samples: &[f32], offset: usize, period: usize) -> f64 {
    assert!(period > 0, "period 0 has no frequency");

    let omega = TAU / period as f64;
    let wave: Vec<f64> = (0..period).map(|k| (omega * k as f64).sin()).collect();

    let mut phase = offset % period;
    let mut sum = 0.0;
    for &sample in samples {
        sum += sample as f64 * wave[phase];
        phase += 1;
        if phase == period {
            phase = 0;
        }
    }
    sum
}
