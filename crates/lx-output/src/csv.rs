//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `gate_events.csv`
//! - `wait_events.csv`
//! - `queue_samples.csv`
//! - `summary.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::ReportWriter;
use crate::{GateEventRow, OutputResult, QueueSampleRow, SummaryRow, WaitEventRow};

/// Writes the run report to four CSV files.
pub struct CsvWriter {
    gate_events:   Writer<File>,
    wait_events:   Writer<File>,
    queue_samples: Writer<File>,
    summary:       Writer<File>,
    finished:      bool,
}

impl CsvWriter {
    /// Open (or create) the four CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut gate_events = Writer::from_path(dir.join("gate_events.csv"))?;
        gate_events.write_record(["crossing_id", "event", "time"])?;

        let mut wait_events = Writer::from_path(dir.join("wait_events.csv"))?;
        wait_events.write_record(["vehicle_id", "start", "end", "duration"])?;

        let mut queue_samples = Writer::from_path(dir.join("queue_samples.csv"))?;
        queue_samples.write_record(["time", "queue_len", "comfort"])?;

        let mut summary = Writer::from_path(dir.join("summary.csv"))?;
        summary.write_record(["metric", "n", "mean", "std_dev", "ci95_low", "ci95_high"])?;

        Ok(Self {
            gate_events,
            wait_events,
            queue_samples,
            summary,
            finished: false,
        })
    }
}

impl ReportWriter for CsvWriter {
    fn write_gate_event(&mut self, row: &GateEventRow) -> OutputResult<()> {
        self.gate_events.write_record(&[
            row.crossing_id.to_string(),
            row.event.to_string(),
            row.time.to_string(),
        ])?;
        Ok(())
    }

    fn write_wait_events(&mut self, rows: &[WaitEventRow]) -> OutputResult<()> {
        for row in rows {
            self.wait_events.write_record(&[
                row.vehicle_id.to_string(),
                row.start.to_string(),
                row.end.to_string(),
                row.duration.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_queue_samples(&mut self, rows: &[QueueSampleRow]) -> OutputResult<()> {
        for row in rows {
            self.queue_samples.write_record(&[
                row.time.to_string(),
                row.queue_len.to_string(),
                row.comfort.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.summary.write_record(&[
                row.metric.to_string(),
                row.n.to_string(),
                row.mean.to_string(),
                row.std_dev.to_string(),
                row.ci95_low.to_string(),
                row.ci95_high.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.gate_events.flush()?;
        self.wait_events.flush()?;
        self.queue_samples.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
