//! The `ReportWriter` trait implemented by all backend writers.

use crate::{GateEventRow, OutputResult, QueueSampleRow, SummaryRow, WaitEventRow};

/// Trait implemented by output backends.
///
/// All methods are infallible from the observer's perspective — errors are
/// stored internally and retrieved with [`ReportObserver::take_error`].
pub trait ReportWriter {
    /// Write one gate transition, streamed as it happens.
    fn write_gate_event(&mut self, row: &GateEventRow) -> OutputResult<()>;

    /// Write the completed wait intervals, at run end.
    fn write_wait_events(&mut self, rows: &[WaitEventRow]) -> OutputResult<()>;

    /// Write the periodic queue/comfort samples, at run end.
    fn write_queue_samples(&mut self, rows: &[QueueSampleRow]) -> OutputResult<()>;

    /// Write the summary statistics, at run end.
    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
