use std::fmt;
use std::time::Duration;

/// Throughput of one run, measured on the coordinator.
///
/// `elapsed` spans distribution, computation and gathering. The figure counts
/// `W * P * S` multiplies, the same theoretical operation count for every run of
/// a given shape, divided by wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Performance {
    pub workers: usize,
    pub elements: usize,
    pub max_periods: usize,
    pub slice_size: usize,
    pub elapsed: Duration,
}

impl Performance {
    pub fn multiplies(&self) -> f64 {
        self.workers as f64 * self.max_periods as f64 * self.slice_size as f64
    }

    pub fn mega_mults_per_second(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds <= 0.0 {
            return 0.0;
        }
        self.multiplies() / seconds / 1_000_000.0
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:3} processors, {:10} elements, {:9.2} mega-multiplies computed per second",
            self.workers,
            self.elements,
            self.mega_mults_per_second()
        )
    }
}
