//! Unit tests for ps-output.

#[cfg(test)]
mod fixtures {
    use std::time::Duration;

    use ps_core::{Phase, Round};
    use ps_engine::{PhaseReport, RoundReport};

    pub fn phase(phase: Phase, dispatched: usize, failed: usize, ms: u64) -> PhaseReport {
        PhaseReport {
            phase,
            dispatched,
            failed,
            skipped: 0,
            elapsed: Duration::from_millis(ms),
        }
    }

    pub fn round(n: u64, threads: usize, phases: Vec<PhaseReport>) -> RoundReport {
        let elapsed = phases.iter().map(|p| p.elapsed).sum();
        RoundReport { round: Round(n), threads, phases, elapsed }
    }
}

#[cfg(test)]
mod csv_tests {
    use ps_core::{Phase, Round};
    use ps_engine::EngineObserver;
    use tempfile::TempDir;

    use super::fixtures::{phase, round};
    use crate::{CsvMetricsWriter, MetricsWriter, PhaseMetricsObserver};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn records(dir: &TempDir, name: &str) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(dir.path().join(name)).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn headers_written() {
        let dir = tmp();
        let mut w = CsvMetricsWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("phase_timings.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            ["round", "phase", "threads", "dispatched", "failed", "skipped", "elapsed_us"]
        );

        let mut rdr = csv::Reader::from_path(dir.path().join("round_summaries.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["round", "threads", "phases", "dispatched", "failed", "elapsed_us"]);
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("metrics").join("run1");
        let _w = CsvMetricsWriter::new(&nested).unwrap();
        assert!(nested.join("round_summaries.csv").exists());
    }

    #[test]
    fn observer_writes_one_row_per_phase_and_round() {
        let dir = tmp();
        let mut obs = PhaseMetricsObserver::new(CsvMetricsWriter::new(dir.path()).unwrap());

        obs.on_round_end(&round(0, 4, vec![phase(Phase::FIRST, 10, 1, 3), phase(Phase::SECOND, 8, 0, 2)]));
        obs.on_round_end(&round(1, 4, vec![phase(Phase::FIRST, 10, 0, 4)]));
        obs.on_engine_end(Round(2));
        assert!(obs.take_error().is_none());
        assert_eq!(obs.rounds_recorded(), 2);

        let timings = records(&dir, "phase_timings.csv");
        assert_eq!(timings.len(), 3);
        assert_eq!(&timings[0][1], "0");    // phase
        assert_eq!(&timings[0][4], "1");    // failed
        assert_eq!(&timings[1][1], "1");
        assert_eq!(&timings[1][6], "2000"); // 2 ms

        let summaries = records(&dir, "round_summaries.csv");
        assert_eq!(summaries.len(), 2);
        assert_eq!(&summaries[0][2], "2");  // phases
        assert_eq!(&summaries[0][3], "18"); // dispatched
        assert_eq!(&summaries[1][0], "1");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvMetricsWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use ps_core::{Phase, Round};
    use ps_engine::EngineObserver;

    use super::fixtures::{phase, round};
    use crate::{
        MetricsWriter, OutputError, OutputResult, PhaseMetricsObserver, PhaseTimingRow,
        RoundSummaryRow,
    };

    /// Fails every summary write; counts calls.
    #[derive(Default)]
    struct Broken {
        timing_rows: usize,
        attempts:    usize,
        finished:    bool,
    }

    impl MetricsWriter for Broken {
        fn write_phase_timings(&mut self, rows: &[PhaseTimingRow]) -> OutputResult<()> {
            self.timing_rows += rows.len();
            Ok(())
        }

        fn write_round_summary(&mut self, _row: &RoundSummaryRow) -> OutputResult<()> {
            self.attempts += 1;
            Err(OutputError::Io(std::io::Error::other(format!("disk full #{}", self.attempts))))
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn first_error_kept_and_run_continues() {
        let mut obs = PhaseMetricsObserver::new(Broken::default());
        obs.on_round_end(&round(0, 2, vec![phase(Phase::FIRST, 1, 0, 1)]));
        obs.on_round_end(&round(1, 2, vec![phase(Phase::FIRST, 1, 0, 1)]));
        obs.on_engine_end(Round(2));

        let err = obs.take_error().unwrap();
        assert!(err.to_string().contains("disk full #1"));
        assert!(obs.take_error().is_none());

        let w = obs.into_writer();
        assert_eq!(w.timing_rows, 2);
        assert_eq!(w.attempts, 2);
        assert!(w.finished);
    }

    #[test]
    fn empty_round_writes_summary_only() {
        let mut obs = PhaseMetricsObserver::new(Broken::default());
        obs.on_round_end(&round(0, 1, vec![]));
        let w = obs.into_writer();
        assert_eq!(w.timing_rows, 0);
        assert_eq!(w.attempts, 1);
    }
}

#[cfg(test)]
mod performance_tests {
    use std::time::Duration;

    use ps_core::Phase;
    use ps_engine::EngineObserver;

    use super::fixtures::{phase, round};
    use crate::ThreadPerformanceSummary;

    fn summary() -> ThreadPerformanceSummary {
        let mut s = ThreadPerformanceSummary::new(2);
        // 2 threads: rounds of 10 ms and 30 ms.
        s.record(&round(0, 2, vec![phase(Phase::FIRST, 5, 0, 6), phase(Phase::SECOND, 5, 0, 4)]));
        s.record(&round(1, 2, vec![phase(Phase::FIRST, 5, 0, 20), phase(Phase::SECOND, 5, 0, 10)]));
        // 8 threads: one 5 ms round, phase 0 only.
        s.on_round_end(&round(0, 8, vec![phase(Phase::FIRST, 5, 0, 5)]));
        s
    }

    #[test]
    fn averages_per_thread_count() {
        let s = summary();
        assert_eq!(s.thread_counts(), vec![2, 8]);
        assert_eq!(s.rounds_recorded(2), 2);
        assert_eq!(s.average_round(2), Some(Duration::from_millis(20)));
        assert_eq!(s.average_phase(2, Phase::FIRST), Some(Duration::from_millis(13)));
        assert_eq!(s.average_phase(2, Phase::SECOND), Some(Duration::from_millis(7)));
        assert_eq!(s.average_phase(8, Phase::SECOND), None);
        assert_eq!(s.average_round(4), None);
    }

    #[test]
    fn speedup_relative_to_baseline() {
        let s = summary();
        assert_eq!(s.speedup(2), Some(1.0));
        let x = s.speedup(8).unwrap();
        assert!((x - 4.0).abs() < 1e-9);
    }

    #[test]
    fn speedup_unknown_without_baseline_samples() {
        let mut s = ThreadPerformanceSummary::new(16);
        s.record(&round(0, 4, vec![phase(Phase::FIRST, 1, 0, 1)]));
        assert_eq!(s.speedup(4), None);
    }

    #[test]
    fn table_lists_each_thread_count() {
        let table = summary().render_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("speedup vs 2"));
        assert!(lines[0].contains("phase 1"));
        assert!(lines[1].starts_with("2 "));
        assert!(lines[2].contains("4.00x"));
    }

    #[test]
    fn separate_summaries_do_not_interfere() {
        let mut a = ThreadPerformanceSummary::new(1);
        let b = ThreadPerformanceSummary::new(1);
        a.record(&round(0, 1, vec![]));
        assert_eq!(a.rounds_recorded(1), 1);
        assert_eq!(b.rounds_recorded(1), 0);
    }
}

#[cfg(test)]
mod engine_integration_tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use ps_core::EngineConfig;
    use ps_engine::EngineBuilder;
    use ps_phase::{BehaviorResult, PhaseRegistryBuilder, PhaseResult, PhaseScheduled};

    use crate::{CsvMetricsWriter, PhaseMetricsObserver, ThreadPerformanceSummary};

    #[derive(Default)]
    struct Tick {
        n: AtomicU32,
    }

    impl Tick {
        fn running(&self) -> bool {
            true
        }

        fn tick(&self) -> BehaviorResult {
            self.n.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    impl PhaseScheduled for Tick {
        fn register_phases(reg: &mut PhaseRegistryBuilder<Self>) -> PhaseResult<()> {
            reg.phase(0, Tick::running, Tick::tick)?.phase(1, Tick::running, Tick::tick)?;
            Ok(())
        }
    }

    #[test]
    fn engine_run_produces_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig { num_threads: Some(2), ..EngineConfig::default() };
        let mut engine = EngineBuilder::<Tick>::new(config).build().unwrap();
        for _ in 0..5 {
            engine.add_agent(Arc::new(Tick::default())).unwrap();
        }

        let metrics = PhaseMetricsObserver::new(CsvMetricsWriter::new(dir.path()).unwrap());
        let mut obs = (metrics, ThreadPerformanceSummary::new(2));
        engine.run(3, &mut obs).unwrap();
        engine.shutdown();

        let (mut metrics, perf) = obs;
        assert!(metrics.take_error().is_none());
        assert_eq!(perf.rounds_recorded(2), 3);

        let mut rdr = csv::Reader::from_path(dir.path().join("phase_timings.csv")).unwrap();
        assert_eq!(rdr.records().count(), 6);
        assert!(engine.agents().iter().all(|a| a.n.load(Ordering::Relaxed) == 6));
    }
}
