//! Synthetic Signals
//!
//! Builds test signals made of one or more sine waves with integer periods,
//! buried in uniform noise. This is how the "secret" periodicities a scan is
//! supposed to uncover get into a data file in the first place.

use super::store::Signal;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

/// Recipe for a synthetic signal.
#[derive(Debug, Clone)]
pub struct SyntheticSignal {
    /// Periods (in samples) of the hidden sine waves.
    pub periods: Vec<usize>,
    /// Peak amplitude shared by every hidden wave.
    pub amplitude: f32,
    /// Half-width of the uniform noise added to each sample.
    pub noise: f32,
    /// Seed of the noise generator; equal seeds give identical signals.
    pub seed: u64,
}

impl SyntheticSignal {
    pub fn generate(&self, num_elements: usize) -> Signal {
        let mut rng = StdRng::seed_from_u64(self.seed);

        let samples = (0..num_elements)
            .map(|t| {
                let wave: f64 = self
                    .periods
                    .iter()
                    .filter(|&&period| period > 0)
                    .map(|&period| {
                        // Reduce the phase in integers first; `t` can be far beyond f32 precision.
                        let phase = (t % period) as f64 * TAU / period as f64;
                        self.amplitude as f64 * phase.sin()
                    })
                    .sum();

                let jitter = if self.noise > 0.0 {
                    rng.gen_range(-self.noise..=self.noise)
                } else {
                    0.0
                };

                wave as f32 + jitter
            })
            .collect();

        Signal::from_samples(samples)
    }
}
