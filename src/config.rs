//! Run parameters shared by every participant in a scan.
//!
//! The coordinator builds a [`RunConfig`] from the command line and ships the
//! parts a worker needs (world size, period bound) inside the slice assignment,
//! so workers never have to be configured separately.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Number of samples in the signal when nothing else is configured.
pub const DEFAULT_NUM_ELEMENTS: usize = 1024 * 1024;
/// Exclusive upper bound on candidate periods when nothing else is configured.
pub const DEFAULT_MAX_PERIODS: usize = 100;

/// On-disk encoding of the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum SignalFormat {
    /// Little-endian `f32` samples, exactly `4 * N` bytes.
    Binary,
    /// Whitespace-separated decimal numbers, exactly `N` tokens.
    Ascii,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("signal must contain at least one sample")]
    EmptySignal,

    #[error("at least one worker is required")]
    NoWorkers,

    #[error("max periods must be at least 2 (got {max_periods})")]
    TooFewPeriods { max_periods: usize },

    #[error("{num_elements} samples cannot be split evenly across {world_size} workers")]
    UnevenPartition {
        num_elements: usize,
        world_size: usize,
    },

    #[error("signal holds {actual} samples but the run is configured for {expected}")]
    SignalLength { expected: usize, actual: usize },
}

/// Validated parameters of one distributed scan.
///
/// Construction through [`RunConfig::new`] guarantees `num_elements % world_size == 0`,
/// so every worker receives a slice of the same size and no trailing samples are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    num_elements: usize,
    max_periods: usize,
    world_size: usize,
    recv_timeout: Option<Duration>,
}

impl RunConfig {
    pub fn new(
        num_elements: usize,
        max_periods: usize,
        world_size: usize,
    ) -> Result<Self, ConfigError> {
        if num_elements == 0 {
            return Err(ConfigError::EmptySignal);
        }
        if world_size == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if max_periods < 2 {
            return Err(ConfigError::TooFewPeriods { max_periods });
        }
        if num_elements % world_size != 0 {
            return Err(ConfigError::UnevenPartition {
                num_elements,
                world_size,
            });
        }

        Ok(Self {
            num_elements,
            max_periods,
            world_size,
            recv_timeout: None,
        })
    }

    /// Bounds every blocking receive of the run. Without it a hung peer stalls forever.
    pub fn with_recv_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.recv_timeout = timeout;
        self
    }

    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    pub fn max_periods(&self) -> usize {
        self.max_periods
    }

    pub fn world_size(&self) -> usize {
        self.world_size
    }

    pub fn slice_size(&self) -> usize {
        self.num_elements / self.world_size
    }

    pub fn recv_timeout(&self) -> Option<Duration> {
        self.recv_timeout
    }
}
