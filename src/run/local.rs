use super::coordinator::{Coordinator, RunReport};
use super::worker::Worker;
use crate::cluster::transport::local_cluster;
use crate::config::RunConfig;
use crate::error::PeriodogramError;
use crate::signal::Signal;

/// Runs a whole cluster of `config.world_size()` ranks inside this process.
///
/// Workers are tokio tasks talking to the coordinator over in-process links; the
/// coordinator runs on the calling task. The result is the coordinator's.
pub async fn run_local(config: RunConfig, signal: &Signal) -> Result<RunReport, PeriodogramError> {
    let (coordinator_links, worker_links) = local_cluster(config.world_size());

    let handles: Vec<_> = worker_links
        .into_iter()
        .map(|link| tokio::spawn(Worker::new(link, config.recv_timeout()).run()))
        .collect();

    tracing::info!("Started {} in-process worker(s)", handles.len());

    let coordinator = Coordinator::new(config, coordinator_links)?;
    let outcome = coordinator.run(signal).await;

    for (index, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(Ok(summary)) => {
                tracing::debug!(
                    "Worker {} finished {:?} in {:?}",
                    index + 1,
                    summary.partition.range(),
                    summary.elapsed
                );
            }
            Ok(Err(e)) => tracing::warn!("Worker {} failed: {}", index + 1, e),
            Err(e) => tracing::error!("Worker task {} did not complete: {}", index + 1, e),
        }
    }

    outcome
}
