use super::error::ClusterError;
use super::transport::{Link, TcpLink, recv_within};
use super::types::{Rank, WireMessage, WorkerId};

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tracing::info;

const CONNECT_ATTEMPTS: usize = 8;
const CONNECT_INITIAL_DELAY: Duration = Duration::from_millis(150);
const CONNECT_MAX_DELAY: Duration = Duration::from_millis(1200);

/// Accepts `expected` workers on `listener` and returns their links in rank order.
///
/// Ranks are handed out in connection order: the first worker to complete its
/// `Join` becomes rank 1. Anything other than a `Join` as the first frame is fatal.
/// `join_timeout` bounds both the wait for each connection and for its `Join`.
pub async fn accept_workers(
    listener: &TcpListener,
    expected: usize,
    join_timeout: Option<Duration>,
) -> Result<Vec<TcpLink>, ClusterError> {
    info!("Waiting for {} worker(s) to join", expected);

    let mut links = Vec::with_capacity(expected);
    while links.len() < expected {
        let (stream, addr) = accept_within(listener, join_timeout, links.len(), expected).await?;
        let mut link = TcpLink::new(stream, addr);

        match recv_within(&mut link, join_timeout, "Join").await? {
            WireMessage::Join { worker_id } => {
                let rank = Rank(links.len() + 1);
                info!("Worker {:?} at {} joined as rank {}", worker_id, addr, rank);
                links.push(link);
            }
            other => {
                return Err(ClusterError::protocol(format!(
                    "expected Join from {}, got {}",
                    addr,
                    other.kind()
                )));
            }
        }
    }

    info!("All {} worker(s) joined", expected);
    Ok(links)
}

async fn accept_within(
    listener: &TcpListener,
    limit: Option<Duration>,
    joined: usize,
    expected: usize,
) -> Result<(TcpStream, SocketAddr), ClusterError> {
    let Some(after) = limit else {
        return Ok(listener.accept().await?);
    };

    match tokio::time::timeout(after, listener.accept()).await {
        Ok(accepted) => Ok(accepted?),
        Err(_) => {
            tracing::error!("Only {} of {} worker(s) joined within {:?}", joined, expected, after);
            Err(ClusterError::Timeout {
                after,
                waiting_for: format!("worker {} of {} to connect", joined + 1, expected),
            })
        }
    }
}

/// Connects to the coordinator, retrying with jittered exponential backoff, and sends `Join`.
pub async fn join_coordinator(
    coordinator: SocketAddr,
    worker_id: &WorkerId,
) -> Result<TcpLink, ClusterError> {
    let stream = connect_with_retry(coordinator, CONNECT_ATTEMPTS).await?;
    let mut link = TcpLink::new(stream, coordinator);

    link.send(WireMessage::Join {
        worker_id: worker_id.clone(),
    })
    .await?;

    info!("Sent join request to {} as {:?}", coordinator, worker_id);
    Ok(link)
}

async fn connect_with_retry(addr: SocketAddr, attempts: usize) -> Result<TcpStream, ClusterError> {
    let mut delay_ms = CONNECT_INITIAL_DELAY.as_millis() as u64;

    for attempt in 0..attempts {
        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                if attempt + 1 == attempts {
                    return Err(e.into());
                }
                tracing::debug!(
                    "Connect to {} failed (attempt {}/{}): {}",
                    addr,
                    attempt + 1,
                    attempts,
                    e
                );
                let jitter = rand::random::<u64>() % 50;
                tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                delay_ms = (delay_ms * 2).min(CONNECT_MAX_DELAY.as_millis() as u64);
            }
        }
    }

    Err(ClusterError::Disconnected {
        peer: addr.to_string(),
    })
}
