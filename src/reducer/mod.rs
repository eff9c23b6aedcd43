//! Reduction Module
//!
//! Coordinator-side aggregation of partial sums.
//!
//! ## Discipline
//! - The totals start as the coordinator's own partial sums, not as zeros.
//! - Every other rank must report exactly once, with exactly `P` values.
//! - Reports may arrive in any order; addition is elementwise and order-independent
//!   up to floating-point rounding.
//! - Anything else (unknown rank, second report, wrong length, missing report) is a
//!   protocol error and fails the run. A silently skipped worker would corrupt
//!   every total.

pub mod reducer;

pub use reducer::{Reducer, TotalSums};
