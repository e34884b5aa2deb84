//! One-shot ETA/ETD estimation from sensor trigger intervals.
//!
//! # Design
//!
//! The estimate is committed exactly once per train, from the two (or, for
//! the acceleration variant, three) most-recently triggered sensors:
//!
//! - **Constant speed**: `v = (d_a − d_b) / (t_b − t_a)` where `d` is each
//!   sensor's distance to the crossing, then `eta = d_last / v`.
//! - **Kinematic variant** (≥ 3 sensors): acceleration from the change in
//!   segment speed between the two most recent intervals, evaluated at their
//!   midpoint times, then the positive root of `½at² + vt − d = 0`.
//!
//! Every degenerate input recovers locally, never as an error:
//!
//! | Condition                       | Outcome                                 |
//! |---------------------------------|-----------------------------------------|
//! | `t_b − t_a ≤ 0`                 | estimate stays `None`, never retried    |
//! | `v ≤ 0`                         | nominal train speed fallback            |
//! | `\|a\| <` dead-band              | constant-speed solution                 |
//! | negative discriminant           | constant-speed solution                 |

use log::debug;

use lx_core::{CrossingGeometry, Thresholds};

use crate::train::SensorTrigger;

/// The committed prediction for one train.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Estimate {
    /// Predicted seconds (from `computed_at`) until the front reaches the
    /// crossing.  Floored at zero.
    pub eta: f64,
    /// Predicted seconds (from `computed_at`) until the rear fully clears the
    /// crossing.
    pub etd: f64,
    /// Simulated time at which this estimate was committed.
    pub computed_at: f64,
}

/// A pluggable arrival predictor, so an externally supplied reference
/// estimator can be scored against the built-in one (see the metrics report's
/// prediction comparison).
pub trait ArrivalEstimator: Send + Sync {
    /// Predicted seconds until the train's front reaches the crossing,
    /// evaluated at the moment the final sensor fires.  `None` when the
    /// inputs are degenerate.
    fn predict(
        &self,
        triggers: &[SensorTrigger],
        geometry: &CrossingGeometry,
        thresholds: &Thresholds,
    ) -> Option<f64>;
}

// ── Internal kinematics ───────────────────────────────────────────────────────

/// Speed over the interval between the two most-recent triggers.
/// `None` when the interval is non-positive (telemetry jitter).
fn interval_speed(
    triggers: &[SensorTrigger],
    geometry: &CrossingGeometry,
) -> Option<f64> {
    let n = triggers.len();
    debug_assert!(n >= 2);
    let (a, b) = (n - 2, n - 1);
    let dt = triggers[b].time - triggers[a].time;
    if dt <= 0.0 {
        return None;
    }
    // Distances to the crossing decrease with sensor index, so this is > 0
    // whenever the geometry validated.
    Some((geometry.sensor_distance(a) - geometry.sensor_distance(b)) / dt)
}

/// Acceleration from the two most-recent segment speeds, evaluated at the
/// segments' midpoint times.  Requires three triggers with positive
/// intervals; otherwise `None` and the caller uses the constant-speed path.
fn segment_acceleration(
    triggers: &[SensorTrigger],
    geometry: &CrossingGeometry,
) -> Option<f64> {
    let n = triggers.len();
    if n < 3 {
        return None;
    }
    let dt1 = triggers[n - 2].time - triggers[n - 3].time;
    let dt2 = triggers[n - 1].time - triggers[n - 2].time;
    if dt1 <= 0.0 || dt2 <= 0.0 {
        return None;
    }
    let v1 = (geometry.sensor_distance(n - 3) - geometry.sensor_distance(n - 2)) / dt1;
    let v2 = (geometry.sensor_distance(n - 2) - geometry.sensor_distance(n - 1)) / dt2;
    let mid1 = (triggers[n - 3].time + triggers[n - 2].time) * 0.5;
    let mid2 = (triggers[n - 2].time + triggers[n - 1].time) * 0.5;
    if mid2 <= mid1 {
        return None;
    }
    Some((v2 - v1) / (mid2 - mid1))
}

/// Time to cover `distance` at speed `v` with acceleration `accel`, falling
/// back to the constant-speed solution when the kinematics degenerate.
fn time_to_cover(distance: f64, v: f64, accel: Option<f64>, dead_band: f64) -> f64 {
    if let Some(a) = accel {
        if a.abs() >= dead_band {
            let disc = v * v + 2.0 * a * distance;
            if disc >= 0.0 {
                let t = (-v + disc.sqrt()) / a;
                if t.is_finite() && t >= 0.0 {
                    return t;
                }
            }
            debug!(
                "kinematic solve degenerate (v={v:.2}, a={a:.3}, d={distance:.1}); \
                 using constant-speed estimate"
            );
        }
    }
    (distance / v).max(0.0)
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Commit the one-shot estimate for a train whose final sensor just fired.
///
/// Returns `None` — permanently, callers must not retry — when the two most
/// recent triggers carry a non-positive time interval.
pub fn estimate(
    triggers: &[SensorTrigger],
    geometry: &CrossingGeometry,
    thresholds: &Thresholds,
    train_length: f64,
    now: f64,
) -> Option<Estimate> {
    let mut v = interval_speed(triggers, geometry)?;
    if v <= 0.0 {
        debug!(
            "non-positive interval speed {v:.3}; falling back to nominal {:.1} m/s",
            thresholds.nominal_train_speed
        );
        v = thresholds.nominal_train_speed;
    }
    let accel = segment_acceleration(triggers, geometry);
    let n = triggers.len();
    let d = geometry.sensor_distance(n - 1);

    let eta = time_to_cover(d, v, accel, thresholds.accel_dead_band);
    let etd = time_to_cover(d + train_length, v, accel, thresholds.accel_dead_band);
    Some(Estimate {
        eta,
        etd,
        computed_at: now,
    })
}

/// The authoritative estimator: constant-speed with the kinematic-quadratic
/// refinement when three sensors are available.
pub struct KinematicEstimator;

impl ArrivalEstimator for KinematicEstimator {
    fn predict(
        &self,
        triggers: &[SensorTrigger],
        geometry: &CrossingGeometry,
        thresholds: &Thresholds,
    ) -> Option<f64> {
        estimate(
            triggers,
            geometry,
            thresholds,
            thresholds.default_train_length,
            0.0,
        )
        .map(|e| e.eta)
    }
}

/// Physics-only baseline: remaining distance over the speed observed at the
/// last trigger.  Ignores interval timing entirely, so it reflects what a
/// single point-speed reading would predict.
pub struct LastSpeedEstimator;

impl ArrivalEstimator for LastSpeedEstimator {
    fn predict(
        &self,
        triggers: &[SensorTrigger],
        geometry: &CrossingGeometry,
        thresholds: &Thresholds,
    ) -> Option<f64> {
        let last = triggers.last()?;
        let v = if last.speed > 0.0 {
            last.speed
        } else {
            thresholds.nominal_train_speed
        };
        let d = geometry.sensor_distance(triggers.len() - 1);
        Some((d / v).max(0.0))
    }
}
