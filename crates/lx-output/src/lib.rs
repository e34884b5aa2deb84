//! `lx-output` — run report writers for the level-crossing control engine.
//!
//! One backend is provided:
//!
//! | Backend | Files created                                                        |
//! |---------|----------------------------------------------------------------------|
//! | CSV     | `gate_events.csv`, `wait_events.csv`, `queue_samples.csv`, `summary.csv` |
//!
//! Backends implement [`ReportWriter`] and are driven by [`ReportObserver`],
//! which implements `lx_engine::EngineObserver`: gate events stream out as
//! they happen, everything else is written once at run end.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lx_output::{CsvWriter, ReportObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = ReportObserver::new(writer);
//! for snapshot in telemetry {
//!     engine.step(&snapshot, &mut obs);
//! }
//! engine.finalize(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::ReportObserver;
pub use row::{summary_rows, GateEventRow, QueueSampleRow, SummaryRow, WaitEventRow};
pub use writer::ReportWriter;
