//! Round and phase timing aggregated by worker-thread count.
//!
//! Feed the same [`ThreadPerformanceSummary`] to several engines (one per
//! thread count) to compare scaling.  The summary is an ordinary value owned
//! by the caller; two simulations in one process keep separate tables.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use ps_core::{MAX_PHASES, Phase};
use ps_engine::{EngineObserver, RoundReport};

#[derive(Clone, Debug, Default)]
struct Samples {
    rounds:       u32,
    round_total:  Duration,
    phase_total:  [Duration; MAX_PHASES],
    phase_rounds: [u32; MAX_PHASES],
}

/// Per-thread-count averages with speedup against a baseline thread count.
#[derive(Clone, Debug)]
pub struct ThreadPerformanceSummary {
    baseline: usize,
    samples:  BTreeMap<usize, Samples>,
}

impl ThreadPerformanceSummary {
    /// Speedups are reported relative to runs with `baseline` threads.
    pub fn new(baseline: usize) -> Self {
        Self { baseline, samples: BTreeMap::new() }
    }

    pub fn baseline(&self) -> usize {
        self.baseline
    }

    /// Add one round's timings.
    pub fn record(&mut self, report: &RoundReport) {
        let s = self.samples.entry(report.threads).or_default();
        s.rounds += 1;
        s.round_total += report.elapsed;
        for p in &report.phases {
            let i = p.phase.index();
            s.phase_total[i] += p.elapsed;
            s.phase_rounds[i] += 1;
        }
    }

    /// Thread counts with at least one recorded round, ascending.
    pub fn thread_counts(&self) -> Vec<usize> {
        self.samples.keys().copied().collect()
    }

    pub fn rounds_recorded(&self, threads: usize) -> u32 {
        self.samples.get(&threads).map_or(0, |s| s.rounds)
    }

    pub fn average_round(&self, threads: usize) -> Option<Duration> {
        let s = self.samples.get(&threads)?;
        (s.rounds > 0).then(|| s.round_total / s.rounds)
    }

    /// Mean duration of `phase` over the rounds in which it ran.
    pub fn average_phase(&self, threads: usize, phase: Phase) -> Option<Duration> {
        let s = self.samples.get(&threads)?;
        let n = s.phase_rounds[phase.index()];
        (n > 0).then(|| s.phase_total[phase.index()] / n)
    }

    /// Baseline average round time divided by this thread count's.
    ///
    /// `None` until both have samples.
    pub fn speedup(&self, threads: usize) -> Option<f64> {
        let base = self.average_round(self.baseline)?.as_secs_f64();
        let this = self.average_round(threads)?.as_secs_f64();
        (this > 0.0).then(|| base / this)
    }

    /// Fixed-width comparison table, one line per thread count.
    pub fn render_table(&self) -> String {
        let phases: Vec<Phase> = Phase::all()
            .filter(|p| self.samples.values().any(|s| s.phase_rounds[p.index()] > 0))
            .collect();

        let mut out = String::new();
        let _ = write!(out, "{:<8} | {:>14}", "threads", "round avg (ms)");
        for p in &phases {
            let _ = write!(out, " | {:>12}", format!("{p} (ms)"));
        }
        let _ = writeln!(out, " | speedup vs {}", self.baseline);

        for (&threads, s) in &self.samples {
            let avg = self.average_round(threads).unwrap_or_default();
            let _ = write!(out, "{threads:<8} | {:>14.2}", millis(avg));
            for p in &phases {
                match self.average_phase(threads, *p) {
                    Some(d) => { let _ = write!(out, " | {:>12.2}", millis(d)); }
                    None => { let _ = write!(out, " | {:>12}", "-"); }
                }
            }
            match self.speedup(threads) {
                Some(x) => { let _ = writeln!(out, " | {x:.2}x ({} rounds)", s.rounds); }
                None => { let _ = writeln!(out, " | - ({} rounds)", s.rounds); }
            }
        }
        out
    }
}

impl Default for ThreadPerformanceSummary {
    fn default() -> Self {
        Self::new(1)
    }
}

impl EngineObserver for ThreadPerformanceSummary {
    fn on_round_end(&mut self, report: &RoundReport) {
        self.record(report);
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
