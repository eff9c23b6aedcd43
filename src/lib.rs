//! Distributed Periodogram Cluster Library
//!
//! This library crate defines the core modules of the distributed period scanner.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of loosely coupled subsystems, leaf first:
//!
//! - **`signal`**: The signal store. Loads the full sample buffer on the coordinator
//!   (raw binary or ASCII) and synthesizes test signals with hidden sine waves.
//! - **`partition`**: Deterministic mapping of global sample indices to equal,
//!   contiguous worker slices.
//! - **`correlator`**: The per-worker engine projecting a slice onto a sine wave of
//!   every candidate period, using global time indices so phase survives slicing.
//! - **`reducer`**: Coordinator-side aggregation of per-worker partial sums into totals.
//! - **`sink`**: Rendering of the final table and the performance report.
//! - **`cluster`**: The message-passing layer (wire messages, TCP framing,
//!   in-process and TCP links, worker join handshake).
//! - **`run`**: The coordinator and worker state machines that tie it all together.

pub mod cluster;
pub mod config;
pub mod correlator;
pub mod error;
pub mod partition;
pub mod reducer;
pub mod run;
pub mod signal;
pub mod sink;

pub use config::{RunConfig, SignalFormat};
pub use error::PeriodogramError;
