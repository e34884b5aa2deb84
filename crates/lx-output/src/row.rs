//! Plain data row types written by output backends.

use lx_engine::RunReport;
use lx_metrics::{QueueSample, SampleStats, WaitEvent};

/// One completed wait interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitEventRow {
    pub vehicle_id: u32,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

impl From<&WaitEvent> for WaitEventRow {
    fn from(e: &WaitEvent) -> Self {
        Self {
            vehicle_id: e.vehicle.0,
            start: e.start,
            end: e.end,
            duration: e.duration(),
        }
    }
}

/// One periodic queue observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueSampleRow {
    pub time: f64,
    pub queue_len: u64,
    pub comfort: f64,
}

impl From<&QueueSample> for QueueSampleRow {
    fn from(s: &QueueSample) -> Self {
        Self {
            time: s.time,
            queue_len: s.queue_len as u64,
            comfort: s.comfort,
        }
    }
}

/// One gate transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateEventRow {
    pub crossing_id: u16,
    /// `"warning"`, `"closed"`, or `"opened"`.
    pub event: &'static str,
    pub time: f64,
}

/// One summary metric.
///
/// Distribution metrics carry the full statistics; scalar metrics carry their
/// value in `mean` with `n = 1` and zeros elsewhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRow {
    pub metric: &'static str,
    pub n: u64,
    pub mean: f64,
    pub std_dev: f64,
    pub ci95_low: f64,
    pub ci95_high: f64,
}

impl SummaryRow {
    fn stats(metric: &'static str, s: &SampleStats) -> Self {
        Self {
            metric,
            n: s.n as u64,
            mean: s.mean,
            std_dev: s.std_dev,
            ci95_low: s.ci_low(),
            ci95_high: s.ci_high(),
        }
    }

    fn scalar(metric: &'static str, value: f64) -> Self {
        Self {
            metric,
            n: 1,
            mean: value,
            std_dev: 0.0,
            ci95_low: value,
            ci95_high: value,
        }
    }
}

/// Flatten a [`RunReport`] into summary rows, one metric per row.
pub fn summary_rows(report: &RunReport) -> Vec<SummaryRow> {
    let m = &report.metrics;
    let accepted = report.reroutes.iter().filter(|r| r.rerouted).count();

    let mut rows = vec![
        SummaryRow::stats("wait_secs", &m.wait),
        SummaryRow::stats("fuel_litres", &m.fuel),
        SummaryRow::stats("emissions_kg_co2", &m.emissions),
        SummaryRow::stats("comfort", &m.comfort),
        SummaryRow::scalar("final_comfort", m.final_comfort),
        SummaryRow::scalar("vehicle_count", m.vehicle_count as f64),
        SummaryRow::scalar("queue_mean_len", m.queue.mean_len),
        SummaryRow::scalar("queue_max_len", m.queue.max_len as f64),
        SummaryRow::scalar("total_stops", m.total_stops as f64),
        SummaryRow::scalar("total_engine_off_secs", m.total_engine_off_time),
        SummaryRow::scalar("reroutes_evaluated", report.reroutes.len() as f64),
        SummaryRow::scalar("reroutes_accepted", accepted as f64),
        SummaryRow::scalar("ticks", report.ticks as f64),
    ];

    if let Some(p) = &m.prediction {
        rows.push(SummaryRow::scalar("prediction_mae_secs", p.mae));
        if let Some(b) = p.baseline_mae {
            rows.push(SummaryRow::scalar("baseline_mae_secs", b));
        }
        if let Some(pct) = p.improvement_pct {
            rows.push(SummaryRow::scalar("prediction_improvement_pct", pct));
        }
    }

    rows
}
