//! The finalization output.

use crate::stats::{PredictionReport, SampleStats};
use crate::tracker::{QueueSample, WaitEvent};

/// Queue-length summary over all periodic samples.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueStats {
    pub samples: usize,
    pub mean_len: f64,
    pub max_len: usize,
}

/// The structured summary produced exactly once, at `finalize()`.
///
/// Per-scalar statistics cover every vehicle ever observed; the wait-event
/// and queue-sample logs are carried whole so downstream writers can persist
/// them in whatever format they choose.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsReport {
    pub vehicle_count: usize,

    /// Seconds waited, per vehicle.
    pub wait: SampleStats,
    /// Litres burned, per vehicle.
    pub fuel: SampleStats,
    /// Kilograms of CO₂, per vehicle.
    pub emissions: SampleStats,
    /// Comfort score, per periodic sample.
    pub comfort: SampleStats,

    /// Mean comfort over the run; 1.0 when no sample was ever taken.
    pub final_comfort: f64,

    pub queue: QueueStats,
    pub total_engine_off_time: f64,
    pub total_stops: u64,

    pub wait_events: Vec<WaitEvent>,
    pub queue_samples: Vec<QueueSample>,

    /// Predictor-vs-baseline scoring; `None` when no train completed the
    /// predict-then-arrive cycle.
    pub prediction: Option<PredictionReport>,
}
