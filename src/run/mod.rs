//! Scan Orchestration Module
//!
//! Drives one single-pass scan through its phases:
//!
//! ```text
//! INIT → LOAD (coordinator) → DISTRIBUTE → COMPUTE (all ranks) → GATHER → EMIT → DONE
//! ```
//!
//! There are no retries and no way back to an earlier phase. A failure in any
//! phase ends the run; once links exist the coordinator tells every worker it can
//! still reach to abort, so nobody is left blocked on a receive.
//!
//! ## Submodules
//! - **`coordinator`**: Rank 0. Distributes slices, computes its own, reduces.
//! - **`worker`**: Every other rank. Waits for a slice, computes, reports.
//! - **`local`**: Runs a whole cluster inside one process over in-process links.

pub mod coordinator;
pub mod local;
pub mod worker;

pub use coordinator::{Coordinator, RunReport};
pub use local::run_local;
pub use worker::{Worker, WorkerSummary};

use std::fmt;

/// Phases of a scan, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Load,
    Distribute,
    Compute,
    Gather,
    Emit,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "INIT",
            Phase::Load => "LOAD",
            Phase::Distribute => "DISTRIBUTE",
            Phase::Compute => "COMPUTE",
            Phase::Gather => "GATHER",
            Phase::Emit => "EMIT",
            Phase::Done => "DONE",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests;
