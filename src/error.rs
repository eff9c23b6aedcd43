//! Top-level error type of a scan.
//!
//! Every variant is fatal to the run except [`SinkError`], which is only raised
//! after the totals have been computed and reported.

use thiserror::Error;

use crate::cluster::error::ClusterError;
use crate::config::ConfigError;
use crate::signal::SignalError;
use crate::sink::SinkError;

#[derive(Debug, Error)]
pub enum PeriodogramError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("signal source error: {0}")]
    Signal(#[from] SignalError),

    #[error("cluster error: {0}")]
    Cluster(#[from] ClusterError),

    #[error("result sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("compute task failed: {0}")]
    Compute(#[from] tokio::task::JoinError),
}
