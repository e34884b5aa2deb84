//! Run configuration: thresholds, fuel model, metrics tuning, and geometry.
//!
//! All of this is loaded once at startup (typically from a TOML/JSON file by
//! the application crate) and is read-only for the run's duration.  Malformed
//! configuration is the one fatal condition in the system: [`EngineConfig::validate`]
//! must pass before the first tick.

use thiserror::Error;

use crate::CrossingId;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Configuration validation failure.  Fatal: reject before the first tick.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("crossing {0}: {1}")]
    Crossing(CrossingId, String),

    #[error("threshold `{name}` must be {requirement}, got {got}")]
    Threshold {
        name: &'static str,
        requirement: &'static str,
        got: f64,
    },

    #[error("{0}")]
    Invalid(String),
}

// ── Thresholds ────────────────────────────────────────────────────────────────

/// The immutable decision thresholds, all in seconds / m/s as noted.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thresholds {
    /// Lead time (s) required before predicted arrival at which the barrier
    /// must already be down.
    pub closure_before_eta: f64,

    /// Lead time (s) after the train's rear clears before the barrier may
    /// reopen.
    pub opening_after_etd: f64,

    /// Seconds before predicted arrival at which the intersection warning
    /// activates.  Normally `>= closure_before_eta`.
    pub notification_time: f64,

    /// Remaining expected wait (s) above which a stationary vehicle is told
    /// to shut its engine off.
    pub engine_off_threshold: f64,

    /// How long (s) a vehicle must already have been stationary before the
    /// shutdown policy considers it at all.
    pub engine_off_grace: f64,

    /// Speed (m/s) below which a vehicle counts as waiting.
    pub stillness_speed: f64,

    /// Minimum time saved (s) for a reroute decision to fire.
    pub reroute_min_time_saved: f64,

    /// Fallback train speed (m/s) when the trigger-interval speed estimate
    /// degenerates to zero or below.
    pub nominal_train_speed: f64,

    /// Assumed road speed (m/s) for the reroute travel-time estimate.
    pub nominal_road_speed: f64,

    /// Acceleration magnitudes below this (m/s²) are treated as zero and the
    /// estimator uses the constant-speed solution.
    pub accel_dead_band: f64,

    /// Train length (m) assumed when telemetry omits it.
    pub default_train_length: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            closure_before_eta: 15.0,
            opening_after_etd: 5.0,
            notification_time: 30.0,
            engine_off_threshold: 10.0,
            engine_off_grace: 5.0,
            stillness_speed: 0.5,
            reroute_min_time_saved: 10.0,
            nominal_train_speed: 20.0,
            nominal_road_speed: 13.9, // ~50 km/h
            accel_dead_band: 0.05,
            default_train_length: 150.0,
        }
    }
}

impl Thresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, f64); 6] = [
            ("closure_before_eta", self.closure_before_eta),
            ("opening_after_etd", self.opening_after_etd),
            ("notification_time", self.notification_time),
            ("nominal_train_speed", self.nominal_train_speed),
            ("nominal_road_speed", self.nominal_road_speed),
            ("default_train_length", self.default_train_length),
        ];
        for (name, got) in positive {
            if !(got > 0.0) {
                return Err(ConfigError::Threshold {
                    name,
                    requirement: "> 0",
                    got,
                });
            }
        }
        let non_negative: [(&'static str, f64); 5] = [
            ("engine_off_threshold", self.engine_off_threshold),
            ("engine_off_grace", self.engine_off_grace),
            ("stillness_speed", self.stillness_speed),
            ("reroute_min_time_saved", self.reroute_min_time_saved),
            ("accel_dead_band", self.accel_dead_band),
        ];
        for (name, got) in non_negative {
            if !(got >= 0.0) {
                return Err(ConfigError::Threshold {
                    name,
                    requirement: ">= 0",
                    got,
                });
            }
        }
        Ok(())
    }
}

// ── Fuel model ────────────────────────────────────────────────────────────────

/// Fixed per-second consumption rates selected by vehicle state.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuelModel {
    /// Litres per second while driving.
    pub driving_lps: f64,
    /// Litres per second while idling in a queue.
    pub idling_lps: f64,
    /// Litres per second with the engine shut off (normally 0).
    pub engine_off_lps: f64,
    /// Kilograms of CO₂ emitted per litre of fuel burned.
    pub co2_kg_per_litre: f64,
}

impl Default for FuelModel {
    fn default() -> Self {
        Self {
            driving_lps: 0.0008,    // ~2.9 L/h cruising share attributable to the queue segment
            idling_lps: 0.0003,     // ~1.1 L/h idle burn
            engine_off_lps: 0.0,
            co2_kg_per_litre: 2.31, // petrol combustion constant
        }
    }
}

impl FuelModel {
    fn validate(&self) -> Result<(), ConfigError> {
        let rates = [
            ("driving_lps", self.driving_lps),
            ("idling_lps", self.idling_lps),
            ("engine_off_lps", self.engine_off_lps),
            ("co2_kg_per_litre", self.co2_kg_per_litre),
        ];
        for (name, got) in rates {
            if !(got >= 0.0) {
                return Err(ConfigError::Threshold {
                    name,
                    requirement: ">= 0",
                    got,
                });
            }
        }
        Ok(())
    }
}

// ── Metrics configuration ─────────────────────────────────────────────────────

/// Tuning for the metrics aggregator.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsConfig {
    /// Sample queue length and comfort every K ticks.
    pub sample_interval_ticks: u64,
    /// Queue length at which the comfort queue term saturates.
    pub queue_norm: f64,
    /// Average wait (s) at which the comfort wait term saturates.
    pub wait_norm: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            sample_interval_ticks: 10,
            queue_norm: 20.0,
            wait_norm: 120.0,
        }
    }
}

impl MetricsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_interval_ticks == 0 {
            return Err(ConfigError::Invalid(
                "metrics.sample_interval_ticks must be >= 1".into(),
            ));
        }
        if !(self.queue_norm > 0.0) || !(self.wait_norm > 0.0) {
            return Err(ConfigError::Invalid(
                "metrics queue_norm and wait_norm must be > 0".into(),
            ));
        }
        Ok(())
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// The alternate crossing a vehicle can be redirected to.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlternateRoute {
    pub crossing: CrossingId,
    /// Road distance (m) from the decision point to the alternate crossing.
    pub distance: f64,
}

/// Static geometry for one level crossing.
///
/// Positions are 1-D coordinates in the same frames telemetry reports:
/// `rail_position` on the rail axis, `road_position` on the road axis.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossingGeometry {
    pub id: CrossingId,

    /// Where the rail axis meets the crossing (m).
    pub rail_position: f64,

    /// Where the road axis meets the crossing (m).
    pub road_position: f64,

    /// Virtual detection points on the rail axis, strictly increasing and all
    /// before `rail_position` — i.e. ordered furthest-to-nearest from the
    /// crossing along the direction of travel.  At least 2.
    pub sensor_positions: Vec<f64>,

    /// Vehicles within this many metres short of `road_position` are subject
    /// to the engine-shutdown policy.
    pub engine_off_band: f64,

    /// Vehicles within this many metres short of `road_position` get their
    /// one-shot reroute evaluation once the warning is active.
    pub decision_distance: f64,

    /// Alternate crossing for reroute decisions, if one exists.
    pub alternate: Option<AlternateRoute>,
}

impl CrossingGeometry {
    /// Distance (m) from sensor `idx` to the crossing.
    #[inline]
    pub fn sensor_distance(&self, idx: usize) -> f64 {
        self.rail_position - self.sensor_positions[idx]
    }

    /// Number of virtual sensors.
    #[inline]
    pub fn sensor_count(&self) -> usize {
        self.sensor_positions.len()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor_positions.len() < 2 {
            return Err(ConfigError::Crossing(
                self.id,
                format!("needs >= 2 sensors, got {}", self.sensor_positions.len()),
            ));
        }
        for pair in self.sensor_positions.windows(2) {
            if !(pair[0] < pair[1]) {
                return Err(ConfigError::Crossing(
                    self.id,
                    format!(
                        "sensor positions must be strictly increasing toward the crossing ({} !< {})",
                        pair[0], pair[1]
                    ),
                ));
            }
        }
        let nearest = *self.sensor_positions.last().unwrap();
        if !(nearest < self.rail_position) {
            return Err(ConfigError::Crossing(
                self.id,
                format!(
                    "nearest sensor ({nearest}) must lie before the crossing ({})",
                    self.rail_position
                ),
            ));
        }
        if !(self.engine_off_band >= 0.0) || !(self.decision_distance >= 0.0) {
            return Err(ConfigError::Crossing(
                self.id,
                "engine_off_band and decision_distance must be >= 0".into(),
            ));
        }
        if let Some(alt) = &self.alternate {
            if alt.crossing == self.id {
                return Err(ConfigError::Crossing(
                    self.id,
                    "alternate route points back at the same crossing".into(),
                ));
            }
            if !(alt.distance > 0.0) {
                return Err(ConfigError::Crossing(
                    self.id,
                    format!("alternate distance must be > 0, got {}", alt.distance),
                ));
            }
        }
        Ok(())
    }
}

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Everything the engine needs for a run.  Immutable once validated;
/// reloading mid-run is not supported.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Simulated seconds per tick of the external stepping loop.
    pub tick_len_secs: f64,
    pub thresholds: Thresholds,
    pub fuel: FuelModel,
    pub metrics: MetricsConfig,
    /// All monitored crossings.  `CrossingId`s must equal their index here.
    pub crossings: Vec<CrossingGeometry>,
}

impl EngineConfig {
    /// Validate every sub-section.  Must succeed before the first tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_len_secs > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tick_len_secs must be > 0, got {}",
                self.tick_len_secs
            )));
        }
        if self.crossings.is_empty() {
            return Err(ConfigError::Invalid("no crossings configured".into()));
        }
        self.thresholds.validate()?;
        self.fuel.validate()?;
        self.metrics.validate()?;
        for (i, crossing) in self.crossings.iter().enumerate() {
            if crossing.id.index() != i {
                return Err(ConfigError::Crossing(
                    crossing.id,
                    format!("id must equal its index {i} in the crossing list"),
                ));
            }
            crossing.validate()?;
            if let Some(alt) = &crossing.alternate {
                if alt.crossing.index() >= self.crossings.len() {
                    return Err(ConfigError::Crossing(
                        crossing.id,
                        format!("alternate {} does not exist", alt.crossing),
                    ));
                }
            }
        }
        Ok(())
    }
}
