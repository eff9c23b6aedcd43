//! Coordinator (rank 0)
//!
//! Owns the signal, keeps its own slice by local copy, sends every other slice over
//! its link, computes its own partial sums while the workers compute theirs, and
//! folds every report into the totals.

use super::Phase;
use crate::cluster::error::ClusterError;
use crate::cluster::transport::{Link, recv_within};
use crate::cluster::types::{Rank, WireMessage};
use crate::config::{ConfigError, RunConfig};
use crate::correlator::PeriodCorrelator;
use crate::error::PeriodogramError;
use crate::partition::Partitioner;
use crate::reducer::{Reducer, TotalSums};
use crate::signal::Signal;
use crate::sink::Performance;

use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{debug, info};

/// How long a single abort notice may take before the worker is given up on.
const ABORT_GRACE: Duration = Duration::from_secs(1);

/// Outcome of a completed scan.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub totals: TotalSums,
    pub performance: Performance,
}

pub struct Coordinator<L: Link> {
    config: RunConfig,
    partitioner: Partitioner,
    /// `links[i]` leads to rank `i + 1` until GATHER, which hands them back in
    /// arrival order.
    links: Vec<L>,
}

impl<L: Link + 'static> Coordinator<L> {
    pub fn new(config: RunConfig, links: Vec<L>) -> Result<Self, PeriodogramError> {
        let expected = config.world_size() - 1;
        if links.len() != expected {
            return Err(ClusterError::protocol(format!(
                "world size {} needs {} worker link(s), got {}",
                config.world_size(),
                expected,
                links.len()
            ))
            .into());
        }

        let partitioner = Partitioner::new(&config);
        Ok(Self {
            config,
            partitioner,
            links,
        })
    }

    /// Runs DISTRIBUTE → COMPUTE → GATHER. On failure every reachable worker is told to abort.
    pub async fn run(mut self, signal: &Signal) -> Result<RunReport, PeriodogramError> {
        match self.execute(signal).await {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::error!("Coordinator failed: {}", e);
                self.abort_all(&e.to_string()).await;
                Err(e)
            }
        }
    }

    async fn execute(&mut self, signal: &Signal) -> Result<RunReport, PeriodogramError> {
        if signal.len() != self.config.num_elements() {
            return Err(ConfigError::SignalLength {
                expected: self.config.num_elements(),
                actual: signal.len(),
            }
            .into());
        }

        let started = Instant::now();

        debug!("Coordinator entering {}", Phase::Distribute);
        let own_slice = self.distribute(signal).await?;

        debug!("Coordinator entering {}", Phase::Compute);
        let correlator = PeriodCorrelator::new(self.config.max_periods());
        let own_sums =
            tokio::task::spawn_blocking(move || correlator.correlate(&own_slice, 0)).await?;

        debug!("Coordinator entering {}", Phase::Gather);
        let mut reducer = Reducer::seeded(own_sums, self.config.world_size());
        self.gather(&mut reducer).await?;
        let totals = reducer.finish()?;

        let performance = Performance {
            workers: self.config.world_size(),
            elements: self.config.num_elements(),
            max_periods: self.config.max_periods(),
            slice_size: self.config.slice_size(),
            elapsed: started.elapsed(),
        };

        info!("{}", performance);
        Ok(RunReport {
            totals,
            performance,
        })
    }

    /// Sends each remote slice and returns the coordinator's own copy.
    async fn distribute(&mut self, signal: &Signal) -> Result<Vec<f32>, ClusterError> {
        let own_slice = self.partitioner.local_slice(signal);
        let remote: Vec<_> = self.partitioner.remote_partitions().collect();

        for (link, partition) in self.links.iter_mut().zip(remote) {
            let samples = self.partitioner.slice(signal, &partition).to_vec();
            debug!(
                "Sending {} samples at offset {} to rank {} ({})",
                samples.len(),
                partition.offset,
                partition.rank,
                link.peer()
            );

            link.send(WireMessage::Assign {
                rank: partition.rank,
                world_size: self.config.world_size(),
                max_periods: self.config.max_periods(),
                offset: partition.offset,
                samples,
            })
            .await?;
        }

        Ok(own_slice)
    }

    /// Waits on every link at once and folds reports in arrival order, so the first
    /// failing rank ends the gather no matter where it sits.
    ///
    /// Links come back to `self.links` as their receive completes. A link still
    /// waiting when the gather fails is dropped, which closes it under its worker.
    async fn gather(&mut self, reducer: &mut Reducer) -> Result<(), PeriodogramError> {
        let timeout = self.config.recv_timeout();
        let mut pending = JoinSet::new();

        for (index, mut link) in self.links.drain(..).enumerate() {
            pending.spawn(async move {
                let received = recv_within(&mut link, timeout, "partial sums").await;
                (Rank(index + 1), link, received)
            });
        }

        while let Some(joined) = pending.join_next().await {
            let (expected, link, received) = joined?;
            self.links.push(link);
            Self::fold(reducer, expected, received?)?;
        }

        Ok(())
    }

    fn fold(reducer: &mut Reducer, expected: Rank, msg: WireMessage) -> Result<(), ClusterError> {
        match msg {
            WireMessage::Report { rank, sums } => {
                if rank != expected {
                    return Err(ClusterError::protocol(format!(
                        "link of rank {} delivered a report for rank {}",
                        expected, rank
                    )));
                }
                reducer.accept(rank, sums)
            }
            WireMessage::Abort { reason } => {
                Err(ClusterError::Aborted(format!("rank {}: {}", expected, reason)))
            }
            other => Err(ClusterError::protocol(format!(
                "expected Report from rank {}, got {}",
                expected,
                other.kind()
            ))),
        }
    }

    async fn abort_all(&mut self, reason: &str) {
        for link in self.links.iter_mut() {
            let msg = WireMessage::Abort {
                reason: reason.to_string(),
            };
            let delivered = tokio::time::timeout(ABORT_GRACE, link.send(msg)).await;
            match delivered {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("Could not deliver abort to {}: {}", link.peer(), e),
                Err(_) => debug!("Abort to {} timed out", link.peer()),
            }
        }
    }
}
