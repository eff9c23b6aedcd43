use serde::{Deserialize, Serialize};

/// One worker's per-period contributions, indexed by period.
///
/// Slot 0 is reserved and holds `0.0`; slots `1..len()` hold the sums for
/// periods `1..P`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialSums(pub Vec<f64>);

impl PartialSums {
    pub fn zeroed(max_periods: usize) -> Self {
        Self(vec![0.0; max_periods])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, period: usize) -> Option<f64> {
        self.0.get(period).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}
