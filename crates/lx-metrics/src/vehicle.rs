//! Per-vehicle observation record.

use lx_core::{CrossingId, VehicleId};

/// Everything tracked for one road vehicle under observation.
///
/// Created on first appearance in telemetry and retained until finalization
/// so completed-run statistics cover every vehicle ever seen, including ones
/// that left telemetry range mid-wait.
#[derive(Clone, Debug)]
pub struct VehicleRecord {
    pub id: VehicleId,

    /// The crossing ahead of this vehicle at first observation, if any.
    pub crossing: Option<CrossingId>,

    pub first_seen: f64,
    pub last_seen: f64,
    pub last_position: f64,
    pub last_speed: f64,

    /// Derived each tick from instantaneous speed vs. the stillness threshold.
    pub waiting: bool,

    /// Set on the false→true waiting transition, taken on the true→false one
    /// (at which point the completed interval folds into `total_wait`).
    pub wait_start: Option<f64>,

    pub total_wait: f64,

    /// Count of wait-start transitions.
    pub stops: u32,

    /// Engine-shutdown flag; cleared when the vehicle resumes motion or the
    /// gate reopens.
    pub engine_off: bool,
    pub engine_off_time: f64,

    /// Litres burned across all states so far.
    pub total_fuel: f64,
    /// Kilograms of CO₂, always `total_fuel × co2_kg_per_litre`-consistent.
    pub total_emissions: f64,

    /// True after the one-shot reroute evaluation ran, regardless of outcome.
    pub reroute_decided: bool,
    /// The evaluation's verdict (meaningless while `!reroute_decided`).
    pub rerouted: bool,
}

impl VehicleRecord {
    /// Create a fresh record from the first observation of a vehicle.
    pub fn new(
        id: VehicleId,
        crossing: Option<CrossingId>,
        position: f64,
        speed: f64,
        now: f64,
    ) -> Self {
        Self {
            id,
            crossing,
            first_seen: now,
            last_seen: now,
            last_position: position,
            last_speed: speed,
            waiting: false,
            wait_start: None,
            total_wait: 0.0,
            stops: 0,
            engine_off: false,
            engine_off_time: 0.0,
            total_fuel: 0.0,
            total_emissions: 0.0,
            reroute_decided: false,
            rerouted: false,
        }
    }

    /// Wait accumulated so far, counting any still-open interval up to `now`.
    pub fn wait_including_open(&self, now: f64) -> f64 {
        match self.wait_start {
            Some(start) => self.total_wait + (now - start).max(0.0),
            None => self.total_wait,
        }
    }
}
