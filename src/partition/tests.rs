//! Partitioning Module Tests
//!
//! ## Test Scopes
//! - **Tiling**: Partitions cover `[0, N)` exactly, for many `(N, W)` pairs.
//! - **Slicing**: The coordinator's local copy and remote slices hold the right samples.

#[cfg(test)]
mod tests {
    use crate::cluster::types::Rank;
    use crate::config::RunConfig;
    use crate::partition::Partitioner;
    use crate::signal::Signal;

    // ============================================================
    // TILING
    // ============================================================

    #[test]
    fn test_partitions_tile_the_signal() {
        for world_size in 1..=12 {
            for slice_size in [1usize, 3, 64, 1000] {
                let num_elements = world_size * slice_size;
                let config = RunConfig::new(num_elements, 10, world_size).unwrap();
                let partitioner = Partitioner::new(&config);

                let mut covered = vec![0u8; num_elements];
                for partition in partitioner.partitions() {
                    for index in partition.range() {
                        covered[index] += 1;
                    }
                }

                assert!(
                    covered.iter().all(|&hits| hits == 1),
                    "N={} W={} does not tile exactly",
                    num_elements,
                    world_size
                );
            }
        }
    }

    #[test]
    fn test_partitions_are_contiguous_and_ordered() {
        let config = RunConfig::new(1024 * 1024, 100, 4).unwrap();
        let partitioner = Partitioner::new(&config);

        let partitions: Vec<_> = partitioner.partitions().collect();

        assert_eq!(partitions.len(), 4);
        assert_eq!(partitions[0].offset, 0);
        for pair in partitions.windows(2) {
            assert_eq!(pair[0].range().end, pair[1].offset);
        }
        assert_eq!(partitions[3].range().end, 1024 * 1024);
    }

    #[test]
    fn test_rank_out_of_range_has_no_partition() {
        let config = RunConfig::new(8, 4, 2).unwrap();
        let partitioner = Partitioner::new(&config);

        assert!(partitioner.partition(Rank(1)).is_some());
        assert!(partitioner.partition(Rank(2)).is_none());
    }

    #[test]
    fn test_remote_partitions_skip_coordinator() {
        let config = RunConfig::new(12, 4, 3).unwrap();
        let partitioner = Partitioner::new(&config);

        let ranks: Vec<_> = partitioner.remote_partitions().map(|p| p.rank).collect();

        assert_eq!(ranks, vec![Rank(1), Rank(2)]);
    }

    // ============================================================
    // SLICING
    // ============================================================

    #[test]
    fn test_local_slice_is_rank_zero_range() {
        let signal = Signal::from_samples((0..12).map(|i| i as f32).collect());
        let config = RunConfig::new(12, 4, 3).unwrap();
        let partitioner = Partitioner::new(&config);

        assert_eq!(partitioner.local_slice(&signal), vec![0.0, 1.0, 2.0, 3.0]);

        let last = partitioner.partition(Rank(2)).unwrap();
        assert_eq!(partitioner.slice(&signal, &last), &[8.0, 9.0, 10.0, 11.0]);
    }
}
