//! `ps-output` — engine metrics writers for the phasesim framework.
//!
//! | Type                        | Role                                              |
//! |-----------------------------|---------------------------------------------------|
//! | [`CsvMetricsWriter`]        | `phase_timings.csv`, `round_summaries.csv`        |
//! | [`PhaseMetricsObserver`]    | Bridges `EngineObserver` hooks to a writer        |
//! | [`ThreadPerformanceSummary`]| Average durations per thread count, speedups      |
//!
//! Everything here is owned by the caller and handed to the engine per run,
//! so concurrent simulations never share a metrics table.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ps_output::{CsvMetricsWriter, PhaseMetricsObserver};
//!
//! let writer = CsvMetricsWriter::new(Path::new("./output"))?;
//! let mut obs = PhaseMetricsObserver::new(writer);
//! engine.run(100, &mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("metrics error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod performance;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvMetricsWriter;
pub use error::{OutputError, OutputResult};
pub use observer::PhaseMetricsObserver;
pub use performance::ThreadPerformanceSummary;
pub use row::{PhaseTimingRow, RoundSummaryRow};
pub use writer::MetricsWriter;
