use crate::cluster::error::ClusterError;
use crate::cluster::types::Rank;
use crate::correlator::PartialSums;
use crate::sink::ResultRow;

/// Final per-period totals. Slot 0 is reserved and never reported.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalSums(Vec<f64>);

impl TotalSums {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, period: usize) -> Option<f64> {
        self.0.get(period).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// One row per candidate period, starting at 1.
    pub fn rows(&self) -> impl Iterator<Item = ResultRow> + '_ {
        self.0
            .iter()
            .enumerate()
            .skip(1)
            .map(|(period, &magnitude)| ResultRow { period, magnitude })
    }

    /// The period with the largest absolute total, ignoring slot 0.
    pub fn dominant_period(&self) -> Option<usize> {
        self.rows()
            .max_by(|a, b| a.magnitude.abs().total_cmp(&b.magnitude.abs()))
            .map(|row| row.period)
    }
}

/// Accumulates reports from every rank into [`TotalSums`].
pub struct Reducer {
    totals: Vec<f64>,
    reported: Vec<bool>,
}

impl Reducer {
    /// Starts from the coordinator's own sums; rank 0 counts as already reported.
    pub fn seeded(own: PartialSums, world_size: usize) -> Self {
        let mut reported = vec![false; world_size.max(1)];
        reported[0] = true;

        Self {
            totals: own.into_vec(),
            reported,
        }
    }

    pub fn accept(&mut self, from: Rank, sums: PartialSums) -> Result<(), ClusterError> {
        if from.is_coordinator() || from.0 >= self.reported.len() {
            return Err(ClusterError::protocol(format!(
                "report from unexpected rank {} (world size {})",
                from,
                self.reported.len()
            )));
        }
        if self.reported[from.0] {
            return Err(ClusterError::protocol(format!(
                "rank {} reported twice",
                from
            )));
        }
        if sums.len() != self.totals.len() {
            return Err(ClusterError::protocol(format!(
                "rank {} sent {} sums, expected {}",
                from,
                sums.len(),
                self.totals.len()
            )));
        }

        for (total, partial) in self.totals.iter_mut().zip(sums.as_slice()) {
            *total += partial;
        }
        self.reported[from.0] = true;

        tracing::debug!("Accumulated partial sums from rank {}", from);
        Ok(())
    }

    pub fn pending(&self) -> Vec<Rank> {
        self.reported
            .iter()
            .enumerate()
            .filter(|(_, done)| !**done)
            .map(|(rank, _)| Rank(rank))
            .collect()
    }

    pub fn finish(self) -> Result<TotalSums, ClusterError> {
        let pending = self.pending();
        if !pending.is_empty() {
            return Err(ClusterError::protocol(format!(
                "no report from rank(s) {:?}",
                pending.iter().map(|rank| rank.0).collect::<Vec<_>>()
            )));
        }

        Ok(TotalSums(self.totals))
    }
}
