//! `ReportObserver<W>` — bridges `EngineObserver` to a `ReportWriter`.

use lx_core::CrossingId;
use lx_engine::{EngineObserver, RunReport};
use lx_gate::GateEvent;

use crate::row::{summary_rows, GateEventRow, QueueSampleRow, WaitEventRow};
use crate::writer::ReportWriter;
use crate::OutputError;

/// An [`EngineObserver`] that streams gate events as they happen and writes
/// the full report at run end, to any [`ReportWriter`] backend.
///
/// Errors from the writer are stored internally because `EngineObserver`
/// methods have no return value.  After `engine.finalize()` returns, check
/// for errors with [`take_error`][Self::take_error].
pub struct ReportObserver<W: ReportWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: ReportWriter> ReportObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run finishes.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

fn event_name(event: GateEvent) -> &'static str {
    match event {
        GateEvent::WarningActivated => "warning",
        GateEvent::Closed => "closed",
        GateEvent::Opened => "opened",
    }
}

impl<W: ReportWriter> EngineObserver for ReportObserver<W> {
    fn on_gate_event(&mut self, crossing: CrossingId, event: GateEvent, time: f64) {
        let row = GateEventRow {
            crossing_id: crossing.0,
            event: event_name(event),
            time,
        };
        let result = self.writer.write_gate_event(&row);
        self.store_err(result);
    }

    fn on_run_end(&mut self, report: &RunReport) {
        let waits: Vec<WaitEventRow> = report
            .metrics
            .wait_events
            .iter()
            .map(WaitEventRow::from)
            .collect();
        let result = self.writer.write_wait_events(&waits);
        self.store_err(result);

        let samples: Vec<QueueSampleRow> = report
            .metrics
            .queue_samples
            .iter()
            .map(QueueSampleRow::from)
            .collect();
        let result = self.writer.write_queue_samples(&samples);
        self.store_err(result);

        let result = self.writer.write_summary(&summary_rows(report));
        self.store_err(result);

        let result = self.writer.finish();
        self.store_err(result);
    }
}
