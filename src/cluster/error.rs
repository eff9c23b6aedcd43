use std::time::Duration;
use thiserror::Error;

/// Failures of the message-passing layer. None of them is recoverable.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// A message was missing, malformed, duplicated, or came from the wrong rank.
    #[error("protocol mismatch: {0}")]
    ProtocolMismatch(String),

    #[error("timed out after {after:?} waiting for {waiting_for}")]
    Timeout {
        after: Duration,
        waiting_for: String,
    },

    #[error("link to {peer} closed")]
    Disconnected { peer: String },

    /// The peer gave up on the run and said why.
    #[error("run aborted by peer: {0}")]
    Aborted(String),

    #[error("frame of {size} bytes exceeds the {limit} byte limit")]
    FrameTooLarge { size: usize, limit: usize },

    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
}

impl ClusterError {
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolMismatch(message.into())
    }
}
