//! Links
//!
//! A [`Link`] is the coordinator's view of one worker, or a worker's view of the
//! coordinator. Two implementations exist:
//! - [`LocalLink`]: tokio channels, for running a whole cluster inside one process.
//! - [`TcpLink`]: a TCP stream carrying length-prefixed bincode frames.
//!
//! The run loops are generic over `Link`, so both modes execute the exact same
//! distribution and gather code.

use super::error::ClusterError;
use super::protocol::{read_frame, write_frame};
use super::types::WireMessage;

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;

/// Capacity of each direction of an in-process link.
const LOCAL_LINK_CAPACITY: usize = 4;

/// An ordered, bidirectional message channel to a single peer.
pub trait Link: Send {
    fn send(&mut self, msg: WireMessage) -> impl Future<Output = Result<(), ClusterError>> + Send;

    fn recv(&mut self) -> impl Future<Output = Result<WireMessage, ClusterError>> + Send;

    /// Human-readable name of the peer, for logs and errors.
    fn peer(&self) -> String;
}

/// Receives one message, failing with [`ClusterError::Timeout`] once `limit` elapses.
pub async fn recv_within<L: Link>(
    link: &mut L,
    limit: Option<Duration>,
    waiting_for: &str,
) -> Result<WireMessage, ClusterError> {
    let Some(after) = limit else {
        return link.recv().await;
    };

    let outcome = tokio::time::timeout(after, link.recv()).await;
    match outcome {
        Ok(result) => result,
        Err(_) => {
            tracing::error!("No {} from {} within {:?}", waiting_for, link.peer(), after);
            Err(ClusterError::Timeout {
                after,
                waiting_for: format!("{} from {}", waiting_for, link.peer()),
            })
        }
    }
}

#[derive(Debug)]
pub struct LocalLink {
    peer: String,
    tx: mpsc::Sender<WireMessage>,
    rx: mpsc::Receiver<WireMessage>,
}

/// Creates the two ends of an in-process link. `a` talks to `b_name`, `b` to `a_name`.
pub fn local_pair(a_name: &str, b_name: &str) -> (LocalLink, LocalLink) {
    let (a_tx, b_rx) = mpsc::channel(LOCAL_LINK_CAPACITY);
    let (b_tx, a_rx) = mpsc::channel(LOCAL_LINK_CAPACITY);

    let a = LocalLink {
        peer: b_name.to_string(),
        tx: a_tx,
        rx: a_rx,
    };
    let b = LocalLink {
        peer: a_name.to_string(),
        tx: b_tx,
        rx: b_rx,
    };
    (a, b)
}

/// Wires up an in-process cluster of `world_size` participants.
///
/// Returns `(coordinator_ends, worker_ends)`, both of length `world_size - 1`;
/// index `i` of each belongs to rank `i + 1`.
pub fn local_cluster(world_size: usize) -> (Vec<LocalLink>, Vec<LocalLink>) {
    (1..world_size)
        .map(|rank| local_pair("coordinator", &format!("worker {}", rank)))
        .unzip()
}

impl Link for LocalLink {
    async fn send(&mut self, msg: WireMessage) -> Result<(), ClusterError> {
        self.tx
            .send(msg)
            .await
            .map_err(|_| ClusterError::Disconnected {
                peer: self.peer.clone(),
            })
    }

    async fn recv(&mut self) -> Result<WireMessage, ClusterError> {
        self.rx.recv().await.ok_or_else(|| ClusterError::Disconnected {
            peer: self.peer.clone(),
        })
    }

    fn peer(&self) -> String {
        self.peer.clone()
    }
}

#[derive(Debug)]
pub struct TcpLink {
    stream: TcpStream,
    peer_addr: SocketAddr,
}

impl TcpLink {
    pub fn new(stream: TcpStream, peer_addr: SocketAddr) -> Self {
        if let Err(e) = stream.set_nodelay(true) {
            tracing::warn!("Failed to disable Nagle on link to {}: {}", peer_addr, e);
        }
        Self { stream, peer_addr }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.stream.local_addr()
    }
}

impl Link for TcpLink {
    async fn send(&mut self, msg: WireMessage) -> Result<(), ClusterError> {
        write_frame(&mut self.stream, &msg).await
    }

    async fn recv(&mut self) -> Result<WireMessage, ClusterError> {
        let peer = self.peer_addr.to_string();
        read_frame(&mut self.stream, &peer).await
    }

    fn peer(&self) -> String {
        self.peer_addr.to_string()
    }
}
