//! Cluster Messaging Module
//!
//! The message-passing layer between the coordinator and its workers. There is no
//! shared memory anywhere in a scan; every byte of signal and every partial sum
//! travels over a [`transport::Link`].
//!
//! ## Core Concepts
//! - **Ranks**: Participants are numbered `0..W`. Rank 0 is the coordinator, which
//!   also computes its own slice.
//! - **Links**: One ordered, bidirectional channel per coordinator/worker pair. Each
//!   direction has exactly one sender and one receiver, so no locking is needed.
//! - **Join handshake**: Over TCP a worker connects, announces its `WorkerId`, and
//!   learns its rank from the slice assignment that follows.
//! - **No recovery**: A closed link, a timeout, or an unexpected message is fatal to
//!   the whole run.
//!
//! ## Submodules
//! - **`types`**: Ranks, worker identities and the wire message enum.
//! - **`protocol`**: Length-prefixed bincode framing for TCP streams.
//! - **`transport`**: The `Link` trait with in-process and TCP implementations.
//! - **`service`**: Coordinator accept loop and worker join with retry.
//! - **`error`**: Transport and protocol failures.

pub mod error;
pub mod protocol;
pub mod service;
pub mod transport;
pub mod types;
