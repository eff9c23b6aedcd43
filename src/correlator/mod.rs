//! Period Correlator Module
//!
//! The compute engine every worker runs on its slice. For each candidate period
//! `p` in `[1, P)` it evaluates
//!
//! ```text
//! partial[p] = Σ_t  slice[t] * sin((2π / p) * (offset + t))
//! ```
//!
//! where `offset + t` is the sample's *global* index. Using the local index would
//! restart the sine at every slice boundary and corrupt every period that does not
//! divide the slice size.
//!
//! ## Numerics
//! - The phase is reduced to `(offset + t) mod p` in integer arithmetic, so the
//!   sine is only ever evaluated on `[0, 2π)` no matter how deep into the signal a
//!   slice sits. Each period therefore needs just `p` sine evaluations.
//! - Sums are accumulated in `f64`.
//! - Period 0 has no frequency; its slot stays `0.0` and is never reported.
//!
//! ## Submodules
//! - **`types`**: The [`PartialSums`] vector.
//! - **`engine`**: The [`PeriodCorrelator`] and the single-period projection.

pub mod engine;
pub mod types;

pub use engine::{PeriodCorrelator, project};
pub use types::PartialSums;
