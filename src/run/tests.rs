//! Orchestration Tests
//!
//! ## Test Scopes
//! - **End-to-end**: Hidden period recovery, single-worker baseline, W-independence.
//! - **Protocol faults**: Misbehaving or silent workers turn into errors, never hangs.
//! - **Worker side**: Abort handling and assignment validation.
//! - **Network**: A full scan over real TCP links on loopback.

#[cfg(test)]
mod tests {
    use crate::cluster::error::ClusterError;
    use crate::cluster::service::{accept_workers, join_coordinator};
    use crate::cluster::transport::{Link, local_cluster, local_pair};
    use crate::cluster::types::{Rank, WireMessage, WorkerId};
    use crate::config::{ConfigError, RunConfig};
    use crate::correlator::{PartialSums, project};
    use crate::error::PeriodogramError;
    use crate::run::{Coordinator, Worker, WorkerSummary, run_local};
    use crate::signal::{Signal, SyntheticSignal};
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::net::TcpListener;

    fn synthetic(periods: Vec<usize>, num_elements: usize) -> Signal {
        SyntheticSignal {
            periods,
            amplitude: 1.0,
            noise: 0.1,
            seed: 2024,
        }
        .generate(num_elements)
    }

    fn assert_close(got: f64, want: f64, context: &str) {
        let tolerance = 1e-6 * want.abs().max(1.0);
        assert!(
            (got - want).abs() <= tolerance,
            "{}: got {}, want {}",
            context,
            got,
            want
        );
    }

    // ============================================================
    // END-TO-END
    // ============================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_four_workers_find_period_fifty() {
        let num_elements = 1024 * 1024;
        let signal = synthetic(vec![50], num_elements);
        let config = RunConfig::new(num_elements, 100, 4).unwrap();

        let report = run_local(config, &signal).await.unwrap();

        let totals = &report.totals;
        assert_eq!(totals.len(), 100);
        assert_eq!(totals.dominant_period(), Some(50));

        let peak = totals.get(50).unwrap().abs();
        for period in (1..100).filter(|&p| p != 50) {
            let other = totals.get(period).unwrap().abs();
            assert!(
                peak > 20.0 * other,
                "period {} ({}) rivals period 50 ({})",
                period,
                other,
                peak
            );
        }
        assert!(totals.rows().all(|row| row.period != 0));
        assert_eq!(report.performance.workers, 4);
        assert_eq!(report.performance.slice_size, 262_144);
    }

    #[tokio::test]
    async fn test_single_worker_matches_direct_computation() {
        let signal = synthetic(vec![17, 40], 12_000);
        let config = RunConfig::new(12_000, 64, 1).unwrap();

        let report = run_local(config, &signal).await.unwrap();

        for period in 1..64 {
            assert_close(
                report.totals.get(period).unwrap(),
                project(signal.samples(), 0, period),
                &format!("period {}", period),
            );
        }
    }

    #[tokio::test]
    async fn test_world_size_does_not_change_totals() {
        let signal = synthetic(vec![9, 31], 7_200);
        let baseline = run_local(RunConfig::new(7_200, 48, 1).unwrap(), &signal)
            .await
            .unwrap();

        for world_size in [2, 3, 5, 8] {
            let config = RunConfig::new(7_200, 48, world_size).unwrap();
            let report = run_local(config, &signal).await.unwrap();

            for period in 1..48 {
                assert_close(
                    report.totals.get(period).unwrap(),
                    baseline.totals.get(period).unwrap(),
                    &format!("W={} period {}", world_size, period),
                );
            }
        }
    }

    #[tokio::test]
    async fn test_signal_length_mismatch_is_rejected() {
        let signal = synthetic(vec![5], 100);
        let config = RunConfig::new(200, 10, 2).unwrap();

        let err = run_local(config, &signal).await.unwrap_err();

        assert!(matches!(
            err,
            PeriodogramError::Config(ConfigError::SignalLength {
                expected: 200,
                actual: 100
            })
        ));
    }

    // ============================================================
    // PROTOCOL FAULTS
    // ============================================================

    #[tokio::test]
    async fn test_report_for_wrong_rank_is_fatal() {
        let signal = synthetic(vec![5], 300);
        let config = RunConfig::new(300, 10, 3).unwrap();
        let (coordinator_links, mut worker_links) = local_cluster(3);

        let honest = Worker::new(worker_links.remove(0), None);
        let mut impostor = worker_links.remove(0);

        let honest_task = tokio::spawn(honest.run());
        let impostor_task = tokio::spawn(async move {
            let _ = impostor.recv().await;
            impostor
                .send(WireMessage::Report {
                    rank: Rank(1),
                    sums: PartialSums::zeroed(10),
                })
                .await
                .unwrap();
            // Keep the link open until the coordinator has judged the report.
            let _ = impostor.recv().await;
        });

        let err = Coordinator::new(config, coordinator_links)
            .unwrap()
            .run(&signal)
            .await
            .unwrap_err();

        assert!(
            matches!(err, PeriodogramError::Cluster(ClusterError::ProtocolMismatch(_))),
            "got: {}",
            err
        );
        let _ = honest_task.await;
        impostor_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_short_report_is_fatal() {
        let signal = synthetic(vec![5], 200);
        let config = RunConfig::new(200, 10, 2).unwrap();
        let (coordinator_links, mut worker_links) = local_cluster(2);
        let mut worker = worker_links.remove(0);

        let worker_task = tokio::spawn(async move {
            let _ = worker.recv().await;
            worker
                .send(WireMessage::Report {
                    rank: Rank(1),
                    sums: PartialSums::zeroed(9),
                })
                .await
                .unwrap();
            worker.recv().await
        });

        let err = Coordinator::new(config, coordinator_links)
            .unwrap()
            .run(&signal)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("expected 10"), "got: {}", err);
        // The worker is told to abort.
        let followup = worker_task.await.unwrap().unwrap();
        assert_eq!(followup.kind(), "Abort");
    }

    #[tokio::test]
    async fn test_silent_worker_times_out() {
        let signal = synthetic(vec![5], 200);
        let config = RunConfig::new(200, 10, 2)
            .unwrap()
            .with_recv_timeout(Some(Duration::from_millis(100)));
        let (coordinator_links, _silent_workers) = local_cluster(2);

        let err = Coordinator::new(config, coordinator_links)
            .unwrap()
            .run(&signal)
            .await
            .unwrap_err();

        assert!(
            matches!(err, PeriodogramError::Cluster(ClusterError::Timeout { .. })),
            "got: {}",
            err
        );
    }

    #[tokio::test]
    async fn test_vanished_worker_is_fatal() {
        let signal = synthetic(vec![5], 200);
        let config = RunConfig::new(200, 10, 2).unwrap();
        let (coordinator_links, worker_links) = local_cluster(2);
        drop(worker_links);

        let err = Coordinator::new(config, coordinator_links)
            .unwrap()
            .run(&signal)
            .await
            .unwrap_err();

        assert!(
            matches!(err, PeriodogramError::Cluster(ClusterError::Disconnected { .. })),
            "got: {}",
            err
        );
    }

    #[tokio::test]
    async fn test_abort_from_later_rank_is_not_stuck_behind_silent_rank() {
        let signal = synthetic(vec![5], 300);
        let config = RunConfig::new(300, 10, 3).unwrap();
        let (coordinator_links, mut worker_links) = local_cluster(3);

        // Rank 1 takes its slice and never answers; no receive timeout is set.
        let _silent = worker_links.remove(0);
        let mut quitter = worker_links.remove(0);
        let quitter_task = tokio::spawn(async move {
            let _ = quitter.recv().await;
            quitter
                .send(WireMessage::Abort {
                    reason: "disk full".to_string(),
                })
                .await
                .unwrap();
        });

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            Coordinator::new(config, coordinator_links)
                .unwrap()
                .run(&signal),
        )
        .await
        .expect("gather waited on the silent rank");

        match outcome {
            Err(PeriodogramError::Cluster(ClusterError::Aborted(reason))) => {
                assert!(reason.contains("rank 2"), "got: {}", reason);
                assert!(reason.contains("disk full"), "got: {}", reason);
            }
            other => panic!("expected Aborted, got {:?}", other.map(|r| r.totals)),
        }
        quitter_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_link_count_must_match_world_size() {
        let config = RunConfig::new(300, 10, 3).unwrap();
        let (coordinator_links, _workers) = local_cluster(2);

        assert!(Coordinator::new(config, coordinator_links).is_err());
    }

    // ============================================================
    // WORKER SIDE
    // ============================================================

    #[tokio::test]
    async fn test_worker_stops_on_abort() {
        let (mut coordinator, worker) = local_pair("coordinator", "worker 1");

        coordinator
            .send(WireMessage::Abort {
                reason: "source unavailable".to_string(),
            })
            .await
            .unwrap();
        let err = Worker::new(worker, None).run().await.unwrap_err();

        assert!(matches!(err, PeriodogramError::Cluster(ClusterError::Aborted(_))));
    }

    #[tokio::test]
    async fn test_worker_rejects_misplaced_slice() {
        let (mut coordinator, worker) = local_pair("coordinator", "worker 1");

        coordinator
            .send(WireMessage::Assign {
                rank: Rank(1),
                world_size: 2,
                max_periods: 10,
                offset: 3,
                samples: vec![0.0; 8],
            })
            .await
            .unwrap();
        let err = Worker::new(worker, None).run().await.unwrap_err();

        assert!(matches!(
            err,
            PeriodogramError::Cluster(ClusterError::ProtocolMismatch(_))
        ));
        // The worker explains itself before leaving.
        assert_eq!(coordinator.recv().await.unwrap().kind(), "Abort");
    }

    #[tokio::test]
    async fn test_worker_fails_cleanly_when_abort_cannot_be_sent() {
        let (mut coordinator, worker) = local_pair("coordinator", "worker 1");

        coordinator
            .send(WireMessage::Assign {
                rank: Rank(3),
                world_size: 2,
                max_periods: 10,
                offset: 24,
                samples: vec![0.0; 8],
            })
            .await
            .unwrap();
        drop(coordinator);

        let err = Worker::new(worker, None).run().await.unwrap_err();

        assert!(matches!(
            err,
            PeriodogramError::Cluster(ClusterError::ProtocolMismatch(_))
        ));
    }

    #[tokio::test]
    async fn test_worker_reports_global_phase_sums() {
        let signal = synthetic(vec![7], 400);
        let (mut coordinator, worker) = local_pair("coordinator", "worker 1");

        coordinator
            .send(WireMessage::Assign {
                rank: Rank(1),
                world_size: 2,
                max_periods: 12,
                offset: 200,
                samples: signal.samples()[200..].to_vec(),
            })
            .await
            .unwrap();
        let summary = Worker::new(worker, None).run().await.unwrap();

        assert_eq!(summary.partition.range(), 200..400);
        match coordinator.recv().await.unwrap() {
            WireMessage::Report { rank, sums } => {
                assert_eq!(rank, Rank(1));
                assert_eq!(sums.len(), 12);
                assert_close(
                    sums.get(7).unwrap(),
                    project(&signal.samples()[200..], 200, 7),
                    "period 7",
                );
            }
            other => panic!("expected Report, got {}", other.kind()),
        }
    }

    // ============================================================
    // NETWORK
    // ============================================================

    async fn tcp_worker(addr: SocketAddr) -> Result<WorkerSummary, PeriodogramError> {
        let link = join_coordinator(addr, &WorkerId::new()).await?;
        Worker::new(link, Some(Duration::from_secs(10))).run().await
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_scan_over_tcp_matches_local_scan() {
        let signal = synthetic(vec![12], 8_000);
        let config = RunConfig::new(8_000, 30, 4)
            .unwrap()
            .with_recv_timeout(Some(Duration::from_secs(10)));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let workers: Vec<_> = (0..3).map(|_| tokio::spawn(tcp_worker(addr))).collect();

        let links = accept_workers(&listener, 3, Some(Duration::from_secs(5)))
            .await
            .unwrap();
        let report = Coordinator::new(config.clone(), links)
            .unwrap()
            .run(&signal)
            .await
            .unwrap();

        let mut offsets = Vec::new();
        for handle in workers {
            offsets.push(handle.await.unwrap().unwrap().partition.offset);
        }
        offsets.sort();
        assert_eq!(offsets, vec![2_000, 4_000, 6_000]);

        let local = run_local(config, &signal).await.unwrap();
        assert_eq!(report.totals.dominant_period(), Some(12));
        for period in 1..30 {
            assert_close(
                report.totals.get(period).unwrap(),
                local.totals.get(period).unwrap(),
                &format!("period {}", period),
            );
        }
    }
}
