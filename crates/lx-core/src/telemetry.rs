//! The telemetry contract: what the external feed supplies once per tick.
//!
//! The engine never moves anything itself.  Each tick it receives a read-only
//! [`TelemetrySnapshot`] — the current simulated time plus position and speed
//! of every active entity — and reacts.  Positions are 1-D coordinates in
//! metres along the entity's own path (rail line for trains, road for
//! vehicles), increasing in the direction of travel; speeds are m/s.

/// Whether an observed entity is a train or a road vehicle.
///
/// Trains get sensor tracking and ETA estimation; everything else is treated
/// as a vehicle.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    Train,
    Vehicle,
}

/// One entity's position/speed sample for the current tick.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityObs {
    /// Raw telemetry ID, unique within its `kind` namespace and stable for
    /// the entity's lifetime.
    pub id: u32,
    pub kind: EntityKind,
    /// Position of the entity's leading edge along its 1-D path, metres.
    pub position: f64,
    /// Instantaneous speed, m/s.
    pub speed: f64,
    /// Entity length in metres.  Usually only reported for trains; when
    /// absent the configured default train length applies.
    pub length: Option<f64>,
}

impl EntityObs {
    /// Convenience constructor for a train observation.
    pub fn train(id: u32, position: f64, speed: f64, length: f64) -> Self {
        Self {
            id,
            kind: EntityKind::Train,
            position,
            speed,
            length: Some(length),
        }
    }

    /// Convenience constructor for a vehicle observation.
    pub fn vehicle(id: u32, position: f64, speed: f64) -> Self {
        Self {
            id,
            kind: EntityKind::Vehicle,
            position,
            speed,
            length: None,
        }
    }
}

/// Everything the telemetry source reports for one tick.
///
/// Entities absent from a snapshot are simply not updated that tick; their
/// records are retained (accepted under-coverage, not an error).
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetrySnapshot {
    /// Current simulated time in seconds.
    pub time: f64,
    pub entities: Vec<EntityObs>,
}

impl TelemetrySnapshot {
    pub fn new(time: f64) -> Self {
        Self {
            time,
            entities: Vec::new(),
        }
    }

    /// Builder-style helper used heavily in tests and demos.
    pub fn with(mut self, obs: EntityObs) -> Self {
        self.entities.push(obs);
        self
    }
}
