//! Per-tick sensor trigger recording and arrival/departure detection.

use log::debug;

use lx_core::{CrossingGeometry, Thresholds};

use crate::estimator;
use crate::train::{SensorTrigger, Train};

/// Applies one tick's position/speed observation to a [`Train`] record.
///
/// Borrowing the geometry and thresholds once per crossing keeps the per-train
/// call free of lookups.
pub struct SensorTracker<'a> {
    geometry: &'a CrossingGeometry,
    thresholds: &'a Thresholds,
}

impl<'a> SensorTracker<'a> {
    pub fn new(geometry: &'a CrossingGeometry, thresholds: &'a Thresholds) -> Self {
        Self {
            geometry,
            thresholds,
        }
    }

    /// Record everything this tick's observation implies for `train`:
    /// newly crossed sensors, the one-shot estimate, arrival, departure.
    ///
    /// A long tick can carry the train past several sensors at once; all
    /// newly-crossed indices are recorded in travel order with the *same*
    /// tick time and speed (no sub-tick interpolation), which preserves the
    /// contiguous-prefix invariant.
    pub fn observe(&self, train: &mut Train, position: f64, speed: f64, now: f64) {
        train.last_seen = now;
        train.last_position = position;
        train.last_speed = speed;

        // ── Trigger recording (skip-ahead safe) ───────────────────────────
        while train.triggers.len() < self.geometry.sensor_count()
            && position >= self.geometry.sensor_positions[train.triggers.len()]
        {
            train.triggers.push(SensorTrigger { time: now, speed });
        }

        // ── One-shot estimate commit ──────────────────────────────────────
        if train.triggers.len() == self.geometry.sensor_count() && !train.estimate_attempted {
            train.estimate_attempted = true;
            train.estimate = estimator::estimate(
                &train.triggers,
                self.geometry,
                self.thresholds,
                train.length,
                now,
            );
            match &train.estimate {
                Some(e) => debug!(
                    "{} committed eta={:.2}s etd={:.2}s at t={now:.2}",
                    train.id, e.eta, e.etd
                ),
                None => debug!("{} trigger timing degenerate; no estimate", train.id),
            }
        }

        // ── Arrival / departure events (each at most once) ────────────────
        if !train.arrived && position >= self.geometry.rail_position {
            train.arrived = true;
            train.arrival_time = Some(now);
            debug!("{} arrived at crossing {} t={now:.2}", train.id, train.crossing);
        }
        if train.arrived
            && !train.departed
            && position >= self.geometry.rail_position + train.length
        {
            train.departed = true;
            train.departure_time = Some(now);
            debug!("{} cleared crossing {} t={now:.2}", train.id, train.crossing);
        }
    }
}
