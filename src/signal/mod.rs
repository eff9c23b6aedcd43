//! Signal Store Module
//!
//! Owns the full sample buffer on the coordinator and the logic to get it into memory.
//!
//! ## Formats
//! - **Binary**: a raw dump of little-endian `f32` samples, exactly `4 * N` bytes.
//! - **ASCII**: whitespace-separated decimal numbers, exactly `N` tokens.
//!
//! Only the coordinator ever loads a signal. Workers see nothing but the slice
//! they are sent.
//!
//! ## Submodules
//! - **`store`**: The immutable [`Signal`] buffer plus loading and writing.
//! - **`generator`**: Synthetic signals with hidden sine waves buried in noise.

pub mod generator;
pub mod store;

pub use generator::SyntheticSignal;
pub use store::{Signal, SignalError};
