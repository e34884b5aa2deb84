//! The engine-shutdown policy.

use log::debug;

use lx_core::Thresholds;
use lx_metrics::VehicleRecord;

/// Decides, once per tick per queued vehicle, whether its engine should be
/// (or stay) shut off.
///
/// The policy only runs while the crossing's gate is closed; releasing every
/// flag when the gate reopens is the engine's job (it owns the gate events).
pub struct EngineOffPolicy<'a> {
    th: &'a Thresholds,
}

impl<'a> EngineOffPolicy<'a> {
    pub fn new(th: &'a Thresholds) -> Self {
        Self { th }
    }

    /// Evaluate one vehicle.
    ///
    /// `distance_to_crossing` is metres short of the crossing along the road
    /// (negative once past it); `expected_wait` comes from
    /// [`expected_remaining_wait`][crate::expected_remaining_wait].
    ///
    /// Shutdown requires all of: gate closed, inside the band, below the
    /// stillness speed for longer than the grace period, and an expected
    /// remaining wait at or above the threshold.  Resuming motion or leaving
    /// the band clears the flag immediately.
    pub fn evaluate(
        &self,
        vehicle: &mut VehicleRecord,
        distance_to_crossing: f64,
        speed: f64,
        gate_closed: bool,
        expected_wait: Option<f64>,
        band: f64,
        now: f64,
    ) {
        let in_band = (0.0..=band).contains(&distance_to_crossing);
        let still = speed < self.th.stillness_speed;

        if !still || !in_band {
            if vehicle.engine_off {
                debug!("{} engine restarted t={now:.2}", vehicle.id);
            }
            vehicle.engine_off = false;
            return;
        }

        if !gate_closed || vehicle.engine_off {
            return;
        }

        let grace_elapsed = vehicle
            .wait_start
            .is_some_and(|start| now - start > self.th.engine_off_grace);
        let wait_warrants = expected_wait.is_some_and(|w| w >= self.th.engine_off_threshold);

        if grace_elapsed && wait_warrants {
            vehicle.engine_off = true;
            debug!(
                "{} engine off t={now:.2} (expected wait {:.1}s)",
                vehicle.id,
                expected_wait.unwrap_or_default()
            );
        }
    }
}
