//! Worker (ranks 1..W)
//!
//! Blocks until its slice arrives, computes partial sums against global time,
//! reports them, and is done. A worker never sees more of the signal than its own
//! slice and never talks to another worker.

use super::Phase;
use crate::cluster::error::ClusterError;
use crate::cluster::transport::{Link, recv_within};
use crate::cluster::types::{Rank, WireMessage};
use crate::correlator::PeriodCorrelator;
use crate::error::PeriodogramError;
use crate::partition::Partition;

use std::time::{Duration, Instant};
use tracing::{debug, info};

/// What a worker did, for logging by whoever ran it.
#[derive(Debug, Clone)]
pub struct WorkerSummary {
    pub partition: Partition,
    pub world_size: usize,
    pub elapsed: Duration,
}

struct Assignment {
    rank: Rank,
    world_size: usize,
    max_periods: usize,
    offset: usize,
    samples: Vec<f32>,
}

pub struct Worker<L: Link> {
    link: L,
    recv_timeout: Option<Duration>,
}

impl<L: Link> Worker<L> {
    pub fn new(link: L, recv_timeout: Option<Duration>) -> Self {
        Self { link, recv_timeout }
    }

    pub async fn run(mut self) -> Result<WorkerSummary, PeriodogramError> {
        match self.execute().await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                tracing::error!("Worker failed: {}", e);
                let peer_gone = matches!(
                    e,
                    PeriodogramError::Cluster(
                        ClusterError::Aborted(_) | ClusterError::Disconnected { .. }
                    )
                );
                if !peer_gone {
                    let notice = WireMessage::Abort {
                        reason: e.to_string(),
                    };
                    if let Err(send_err) = self.link.send(notice).await {
                        debug!("Could not deliver abort to {}: {}", self.link.peer(), send_err);
                    }
                }
                Err(e)
            }
        }
    }

    async fn execute(&mut self) -> Result<WorkerSummary, PeriodogramError> {
        let assignment = self.receive_assignment().await?;
        let Assignment {
            rank,
            world_size,
            max_periods,
            offset,
            samples,
        } = assignment;
        let partition = Partition {
            rank,
            offset,
            size: samples.len(),
        };

        debug!("Node {} entering {} over {:?}", rank, Phase::Compute, partition.range());
        let started = Instant::now();
        let correlator = PeriodCorrelator::new(max_periods);
        let sums = tokio::task::spawn_blocking(move || correlator.correlate(&samples, offset)).await?;
        let elapsed = started.elapsed();

        debug!("Node {} entering {}", rank, Phase::Gather);
        self.link.send(WireMessage::Report { rank, sums }).await?;

        info!(
            "Rank {} of {} reported {} periods over {} samples in {:?}",
            rank, world_size, max_periods, partition.size, elapsed
        );
        Ok(WorkerSummary {
            partition,
            world_size,
            elapsed,
        })
    }

    async fn receive_assignment(&mut self) -> Result<Assignment, ClusterError> {
        debug!("Waiting for slice from {}", self.link.peer());

        match recv_within(&mut self.link, self.recv_timeout, "slice assignment").await? {
            WireMessage::Assign {
                rank,
                world_size,
                max_periods,
                offset,
                samples,
            } => {
                if rank.is_coordinator() || rank.0 >= world_size {
                    return Err(ClusterError::protocol(format!(
                        "assigned rank {} in a world of {}",
                        rank, world_size
                    )));
                }
                if max_periods < 2 {
                    return Err(ClusterError::protocol(format!(
                        "assigned max periods {}",
                        max_periods
                    )));
                }
                if samples.is_empty() || offset != rank.0 * samples.len() {
                    return Err(ClusterError::protocol(format!(
                        "slice of {} samples at offset {} does not belong to rank {}",
                        samples.len(),
                        offset,
                        rank
                    )));
                }

                Ok(Assignment {
                    rank,
                    world_size,
                    max_periods,
                    offset,
                    samples,
                })
            }
            WireMessage::Abort { reason } => Err(ClusterError::Aborted(reason)),
            other => Err(ClusterError::protocol(format!(
                "expected Assign, got {}",
                other.kind()
            ))),
        }
    }
}
