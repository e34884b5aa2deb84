//! Per-train tracking state.

use lx_core::{CrossingId, TrainId};

use crate::estimator::Estimate;

/// One recorded sensor crossing: when the train's leading edge passed the
/// detection point and the speed telemetry reported at that instant.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorTrigger {
    /// Simulated time (s) of the tick that detected the crossing.
    pub time: f64,
    /// Observed speed (m/s) at that tick.
    pub speed: f64,
}

/// Everything tracked for one train approaching (or passing) its crossing.
///
/// # Invariants
///
/// - `triggers` is a contiguous-from-zero prefix of the crossing's sensor
///   indices: `triggers[k]` corresponds to sensor `k`, entries are appended
///   in order and never overwritten.  `triggers.len()` is the filled count.
/// - `estimate` is committed at most once, when the filled count first
///   reaches the sensor count.  `estimate_attempted` records that the
///   one-shot fired even if the inputs were degenerate and it stayed `None`.
/// - `arrived` and `departed` are set at most once, monotonically.
#[derive(Clone, Debug)]
pub struct Train {
    pub id: TrainId,

    /// The crossing this train is tracked against, assigned at first
    /// observation and fixed for the train's lifetime.
    pub crossing: CrossingId,

    /// Train length (m), from telemetry or the configured default.
    pub length: f64,

    /// Filled prefix of sensor triggers, capacity = the crossing's sensor
    /// count.
    pub triggers: Vec<SensorTrigger>,

    /// One-shot arrival/clearance estimate.  `None` until all sensors have
    /// fired, and forever if the trigger timing was degenerate.
    pub estimate: Option<Estimate>,

    /// True once the one-shot estimation has run, successful or not.
    pub estimate_attempted: bool,

    pub arrived: bool,
    /// Time the leading edge reached the crossing.
    pub arrival_time: Option<f64>,

    pub departed: bool,
    /// Time the rear cleared the crossing.
    pub departure_time: Option<f64>,

    pub first_seen: f64,
    pub last_seen: f64,
    pub last_position: f64,
    pub last_speed: f64,
}

impl Train {
    /// Create a fresh record from the first observation of a train.
    pub fn new(
        id: TrainId,
        crossing: CrossingId,
        length: f64,
        sensor_count: usize,
        position: f64,
        speed: f64,
        now: f64,
    ) -> Self {
        Self {
            id,
            crossing,
            length,
            triggers: Vec::with_capacity(sensor_count),
            estimate: None,
            estimate_attempted: false,
            arrived: false,
            arrival_time: None,
            departed: false,
            departure_time: None,
            first_seen: now,
            last_seen: now,
            last_position: position,
            last_speed: speed,
        }
    }

    /// Seconds until the front reaches the crossing, by decaying the one-shot
    /// estimate.  Negative means arrival is imminent or overdue.
    #[inline]
    pub fn remaining_eta(&self, now: f64) -> Option<f64> {
        self.estimate.as_ref().map(|e| e.eta - (now - e.computed_at))
    }

    /// Seconds until the rear clears the crossing, by the same decay.
    #[inline]
    pub fn remaining_etd(&self, now: f64) -> Option<f64> {
        self.estimate.as_ref().map(|e| e.etd - (now - e.computed_at))
    }
}
