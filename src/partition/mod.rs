//! Partitioning Module
//!
//! Maps global sample indices to workers. With `N` samples and `W` workers every
//! rank `r` owns the contiguous range `[r*S, r*S + S)` where `S = N / W`; the
//! ranges tile `[0, N)` with no gaps or overlaps.
//!
//! The coordinator keeps its own slice through [`Partitioner::local_slice`], a plain
//! copy out of the signal. It never sends a message to itself.

pub mod partitioner;

pub use partitioner::{Partition, Partitioner};

#[cfg(test)]
mod tests;
