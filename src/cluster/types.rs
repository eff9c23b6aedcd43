use crate::correlator::PartialSums;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a participant in the scan. Rank 0 is always the coordinator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub usize);

impl Rank {
    pub const COORDINATOR: Rank = Rank(0);

    pub fn is_coordinator(&self) -> bool {
        *self == Self::COORDINATOR
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Identity a worker process announces when joining.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WorkerId(pub String);

impl WorkerId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for WorkerId {
    fn default() -> Self {
        Self::new()
    }
}

/// The wire protocol between the coordinator and a worker.
///
/// - `Join`: worker → coordinator, first frame on a fresh TCP connection.
/// - `Assign`: coordinator → worker, the worker's slice and everything needed to process it.
/// - `Report`: worker → coordinator, the finished partial sums.
/// - `Abort`: coordinator → worker, the run failed and the worker should stop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum WireMessage {
    Join {
        worker_id: WorkerId,
    },

    Assign {
        rank: Rank,
        world_size: usize,
        max_periods: usize,
        /// Global index of `samples[0]`.
        offset: usize,
        samples: Vec<f32>,
    },

    Report {
        rank: Rank,
        sums: PartialSums,
    },

    Abort {
        reason: String,
    },
}

impl WireMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            WireMessage::Join { .. } => "Join",
            WireMessage::Assign { .. } => "Assign",
            WireMessage::Report { .. } => "Report",
            WireMessage::Abort { .. } => "Abort",
        }
    }
}
