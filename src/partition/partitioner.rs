use crate::cluster::types::Rank;
use crate::config::RunConfig;
use crate::signal::Signal;

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The slice of the signal owned by one rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub rank: Rank,
    /// Global index of the first sample.
    pub offset: usize,
    pub size: usize,
}

impl Partition {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.size
    }
}

pub struct Partitioner {
    world_size: usize,
    slice_size: usize,
}

impl Partitioner {
    /// `RunConfig` already guarantees an even split.
    pub fn new(config: &RunConfig) -> Self {
        Self {
            world_size: config.world_size(),
            slice_size: config.slice_size(),
        }
    }

    pub fn partition(&self, rank: Rank) -> Option<Partition> {
        if rank.0 >= self.world_size {
            return None;
        }

        Some(Partition {
            rank,
            offset: rank.0 * self.slice_size,
            size: self.slice_size,
        })
    }

    pub fn partitions(&self) -> impl Iterator<Item = Partition> + '_ {
        (0..self.world_size).filter_map(|rank| self.partition(Rank(rank)))
    }

    /// Partitions that have to cross the network, i.e. everything but rank 0.
    pub fn remote_partitions(&self) -> impl Iterator<Item = Partition> + '_ {
        self.partitions().filter(|partition| !partition.rank.is_coordinator())
    }

    /// Borrowed view of the samples a partition covers.
    pub fn slice<'a>(&self, signal: &'a Signal, partition: &Partition) -> &'a [f32] {
        &signal.samples()[partition.range()]
    }

    /// The coordinator's own slice, copied straight out of the signal.
    pub fn local_slice(&self, signal: &Signal) -> Vec<f32> {
        let own = Partition {
            rank: Rank::COORDINATOR,
            offset: 0,
            size: self.slice_size,
        };
        self.slice(signal, &own).to_vec()
    }
}
