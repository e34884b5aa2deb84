//! The one-shot reroute decision.

use log::info;

use lx_core::{Thresholds, VehicleId};
use lx_metrics::VehicleRecord;

/// The recorded outcome of a vehicle's single reroute evaluation.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RerouteDecision {
    pub vehicle: VehicleId,
    /// When the evaluation ran.
    pub time: f64,
    pub rerouted: bool,
    /// `wait_here − (travel_time + wait_other)` — may be negative for a
    /// declined reroute; kept for the report either way.
    pub time_saved: f64,
}

/// Evaluate and record the reroute decision for `vehicle`.
///
/// Reroute fires when staying would cost more than `reroute_min_time_saved`
/// seconds over driving to the alternate crossing and waiting there.  The
/// vehicle is marked decided regardless of the verdict and is never
/// re-evaluated, even if conditions later change.
pub fn evaluate_reroute(
    vehicle: &mut VehicleRecord,
    wait_here: f64,
    travel_time: f64,
    wait_other: f64,
    th: &Thresholds,
    now: f64,
) -> RerouteDecision {
    debug_assert!(!vehicle.reroute_decided, "reroute evaluated twice");

    let time_saved = wait_here - (travel_time + wait_other);
    let rerouted = time_saved > th.reroute_min_time_saved;

    vehicle.reroute_decided = true;
    vehicle.rerouted = rerouted;

    if rerouted {
        info!(
            "{} rerouted t={now:.2} (saves {time_saved:.1}s over waiting {wait_here:.1}s)",
            vehicle.id
        );
    }

    RerouteDecision {
        vehicle: vehicle.id,
        time: now,
        rerouted,
        time_saved,
    }
}

/// Consume a vehicle's one-shot without a comparison (no alternate route
/// exists).  Recorded as declined so the idempotence guarantee stays uniform.
pub fn decline_reroute(vehicle: &mut VehicleRecord, now: f64) -> RerouteDecision {
    debug_assert!(!vehicle.reroute_decided, "reroute evaluated twice");
    vehicle.reroute_decided = true;
    vehicle.rerouted = false;
    RerouteDecision {
        vehicle: vehicle.id,
        time: now,
        rerouted: false,
        time_saved: 0.0,
    }
}
