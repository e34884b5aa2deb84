//! Integration tests: full train/vehicle passes through the tick loop.

use std::ops::RangeInclusive;

use lx_core::{
    AlternateRoute, CrossingGeometry, CrossingId, EngineConfig, EntityObs, FuelModel,
    MetricsConfig, TelemetrySnapshot, Thresholds, TrainId, VehicleId,
};
use lx_gate::GateEvent;
use lx_policy::RerouteDecision;
use lx_track::LastSpeedEstimator;

use crate::{CrossingEngine, EngineBuilder, EngineObserver, NoopObserver, RunReport};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn thresholds() -> Thresholds {
    Thresholds {
        closure_before_eta: 15.0,
        opening_after_etd: 5.0,
        notification_time: 30.0,
        engine_off_threshold: 10.0,
        engine_off_grace: 5.0,
        stillness_speed: 0.5,
        reroute_min_time_saved: 10.0,
        nominal_road_speed: 12.5,
        ..Thresholds::default()
    }
}

fn crossing(
    id: u16,
    rail: f64,
    road: f64,
    sensors: Vec<f64>,
    alternate: Option<AlternateRoute>,
) -> CrossingGeometry {
    CrossingGeometry {
        id: CrossingId(id),
        rail_position: rail,
        road_position: road,
        sensor_positions: sensors,
        engine_off_band: 60.0,
        decision_distance: 200.0,
        alternate,
    }
}

/// Two crossings; the first can divert to the second, 100 m away by road.
fn config() -> EngineConfig {
    EngineConfig {
        tick_len_secs: 1.0,
        thresholds: thresholds(),
        fuel: FuelModel::default(),
        metrics: MetricsConfig {
            sample_interval_ticks: 10,
            ..MetricsConfig::default()
        },
        crossings: vec![
            crossing(
                0,
                1000.0,
                500.0,
                vec![700.0, 800.0, 900.0],
                Some(AlternateRoute {
                    crossing: CrossingId(1),
                    distance: 100.0,
                }),
            ),
            crossing(1, 5000.0, 3000.0, vec![4700.0, 4850.0], None),
        ],
    }
}

fn engine() -> CrossingEngine {
    EngineBuilder::new(config()).build().unwrap()
}

/// A 150 m train passing crossing 0 at a constant 10 m/s.
///
/// Sensors fire at t = 10/20/30, the estimate commits at t = 30
/// (eta 10 s, etd 25 s), the front arrives at t = 40 and the rear clears at
/// t = 55, so the gate closes at t = 30 and reopens at t = 60.
fn through_train(t: f64) -> EntityObs {
    EntityObs::train(7, 600.0 + 10.0 * t, 10.0, 150.0)
}

/// Step the engine once per simulated second over `times`.
fn drive<O: EngineObserver>(
    engine: &mut CrossingEngine,
    observer: &mut O,
    times: RangeInclusive<u64>,
    f: impl Fn(f64) -> Vec<EntityObs>,
) {
    for t in times {
        let now = t as f64;
        let mut snap = TelemetrySnapshot::new(now);
        snap.entities = f(now);
        engine.step(&snap, observer);
    }
}

/// Observer that records every callback for later assertions.
#[derive(Default)]
struct Recording {
    gate_events: Vec<(CrossingId, GateEvent, f64)>,
    reroutes: Vec<RerouteDecision>,
    run_ends: usize,
}

impl EngineObserver for Recording {
    fn on_gate_event(&mut self, crossing: CrossingId, event: GateEvent, time: f64) {
        self.gate_events.push((crossing, event, time));
    }
    fn on_reroute(&mut self, decision: &RerouteDecision) {
        self.reroutes.push(*decision);
    }
    fn on_run_end(&mut self, _report: &RunReport) {
        self.run_ends += 1;
    }
}

// ── Gate lifecycle ────────────────────────────────────────────────────────────

#[cfg(test)]
mod gates {
    use super::*;

    #[test]
    fn full_pass_warns_closes_and_reopens() {
        let mut eng = engine();
        let mut obs = Recording::default();
        drive(&mut eng, &mut obs, 0..=60, |t| vec![through_train(t)]);

        assert_eq!(
            obs.gate_events,
            vec![
                (CrossingId(0), GateEvent::WarningActivated, 30.0),
                (CrossingId(0), GateEvent::Closed, 30.0),
                (CrossingId(0), GateEvent::Opened, 60.0),
            ]
        );

        let q = eng.gate_state(CrossingId(0)).unwrap();
        assert!(!q.closed);
        assert!(!q.notified);
        // The departed train is pruned once its gate reopens.
        assert!(eng.train_remaining_eta(TrainId(7)).is_none());
    }

    #[test]
    fn unfinished_sensor_pass_never_closes() {
        let mut eng = engine();
        let mut obs = Recording::default();
        // Stops 50 m short of the last detection point: no estimate, ever.
        drive(&mut eng, &mut obs, 0..=80, |t| {
            let pos = (600.0 + 10.0 * t).min(850.0);
            vec![EntityObs::train(
                3,
                pos,
                if pos < 850.0 { 10.0 } else { 0.0 },
                150.0,
            )]
        });

        assert!(obs.gate_events.is_empty());
        assert!(eng.train_remaining_eta(TrainId(3)).is_none());
        assert!(!eng.gate_state(CrossingId(0)).unwrap().closed);
    }

    #[test]
    fn remaining_eta_decays_after_commit() {
        let mut eng = engine();
        drive(&mut eng, &mut NoopObserver, 0..=35, |t| {
            vec![through_train(t)]
        });
        // Committed at t = 30 with eta 10; five seconds later 5 remain.
        let r = eng.train_remaining_eta(TrainId(7)).unwrap();
        assert!((r - 5.0).abs() < 1e-9);
    }
}

// ── Engine shutdown ───────────────────────────────────────────────────────────

#[cfg(test)]
mod engine_shutdown {
    use super::*;

    #[test]
    fn queued_vehicle_shuts_down_and_restarts_on_reopen() {
        let mut eng = engine();
        let mut obs = Recording::default();
        // Parked 40 m short of the crossing, inside the engine-off band.
        let f = |t: f64| vec![through_train(t), EntityObs::vehicle(1, 460.0, 0.0)];

        drive(&mut eng, &mut obs, 0..=29, &f);
        // Gate still open: stationary or not, the engine stays on.
        assert!(!eng.vehicle_flags(VehicleId(1)).unwrap().engine_off);

        drive(&mut eng, &mut obs, 30..=30, &f);
        // Gate closed at t = 30, grace long since elapsed, expected wait
        // 25 + 5 = 30 s above the 10 s threshold.
        assert!(eng.vehicle_flags(VehicleId(1)).unwrap().engine_off);

        drive(&mut eng, &mut obs, 31..=59, &f);
        assert!(eng.vehicle_flags(VehicleId(1)).unwrap().engine_off);

        drive(&mut eng, &mut obs, 60..=60, &f);
        // Reopening releases the flag even though the vehicle hasn't moved.
        assert!(!eng.vehicle_flags(VehicleId(1)).unwrap().engine_off);
    }

    #[test]
    fn vehicle_outside_band_is_left_alone() {
        let mut eng = engine();
        // Parked 150 m out: subject to reroute, not to shutdown.
        let f = |t: f64| vec![through_train(t), EntityObs::vehicle(2, 350.0, 0.0)];
        drive(&mut eng, &mut NoopObserver, 0..=45, &f);
        assert!(!eng.vehicle_flags(VehicleId(2)).unwrap().engine_off);
    }
}

// ── Reroute ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reroute {
    use super::*;

    #[test]
    fn warned_vehicle_in_zone_reroutes_once() {
        let mut eng = engine();
        let mut obs = Recording::default();
        let f = |t: f64| vec![through_train(t), EntityObs::vehicle(2, 350.0, 0.0)];

        drive(&mut eng, &mut obs, 0..=29, &f);
        // No warning yet, so no evaluation either.
        assert!(obs.reroutes.is_empty());

        drive(&mut eng, &mut obs, 30..=45, &f);
        // Evaluated exactly once, at the tick the warning activated:
        // wait_here 30 − (travel 100/12.5 + wait_other 0) = 22 > 10.
        assert_eq!(obs.reroutes.len(), 1);
        let d = obs.reroutes[0];
        assert_eq!(d.vehicle, VehicleId(2));
        assert_eq!(d.time, 30.0);
        assert!(d.rerouted);
        assert!((d.time_saved - 22.0).abs() < 1e-9);
        assert!(eng.vehicle_flags(VehicleId(2)).unwrap().rerouted);
    }

    #[test]
    fn no_alternate_consumes_the_evaluation_as_declined() {
        let mut cfg = config();
        cfg.crossings[0].alternate = None;
        let mut eng = EngineBuilder::new(cfg).build().unwrap();
        let mut obs = Recording::default();
        let f = |t: f64| vec![through_train(t), EntityObs::vehicle(2, 350.0, 0.0)];

        drive(&mut eng, &mut obs, 0..=45, &f);
        assert_eq!(obs.reroutes.len(), 1);
        assert!(!obs.reroutes[0].rerouted);
        assert!(!eng.vehicle_flags(VehicleId(2)).unwrap().rerouted);
    }

    #[test]
    fn vehicle_outside_decision_zone_is_never_evaluated() {
        let mut eng = engine();
        let mut obs = Recording::default();
        // 280 m out, beyond the 200 m decision distance.
        let f = |t: f64| vec![through_train(t), EntityObs::vehicle(2, 220.0, 0.0)];
        drive(&mut eng, &mut obs, 0..=45, &f);
        assert!(obs.reroutes.is_empty());
    }
}

// ── Finalization ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod finalize {
    use super::*;

    #[test]
    fn report_covers_vehicles_reroutes_and_predictions() {
        let mut eng = EngineBuilder::new(config())
            .baseline(Box::new(LastSpeedEstimator))
            .build()
            .unwrap();
        let mut obs = Recording::default();
        let f = |t: f64| {
            vec![
                through_train(t),
                EntityObs::vehicle(1, 460.0, 0.0),
                EntityObs::vehicle(2, 350.0, 0.0),
            ]
        };
        drive(&mut eng, &mut obs, 0..=60, &f);
        let report = eng.finalize(&mut obs);

        assert_eq!(obs.run_ends, 1);
        assert_eq!(report.ticks, 61);
        assert_eq!(report.metrics.vehicle_count, 2);
        // Both vehicles sit inside the 200 m decision zone (40 m and 150 m
        // out), so each gets its one-shot evaluation when the warning fires.
        assert_eq!(report.reroutes.len(), 2);

        // Both vehicles waited the whole run; their open intervals close at
        // the last-seen time (t = 60).
        assert_eq!(report.metrics.wait_events.len(), 2);
        assert!((report.metrics.wait.mean - 60.0).abs() < 1e-9);

        // Queue sampled at ticks 0, 10, …, 60.
        assert_eq!(report.metrics.queue.samples, 7);
        assert_eq!(report.metrics.queue.max_len, 2);

        // Constant speed through all sensors: both the built-in estimator and
        // the last-speed baseline predict the arrival exactly.
        let pred = report.metrics.prediction.unwrap();
        assert_eq!(pred.n, 1);
        assert!(pred.mae.abs() < 1e-9);
        assert!(pred.baseline_mae.unwrap().abs() < 1e-9);
    }
}

// ── Construction and queries ──────────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use super::*;

    #[test]
    fn builder_rejects_invalid_config() {
        let mut cfg = config();
        cfg.crossings.clear();
        assert!(EngineBuilder::new(cfg).build().is_err());
    }

    #[test]
    fn queries_on_unknown_ids_return_none() {
        let eng = engine();
        assert!(eng.gate_state(CrossingId(9)).is_none());
        assert!(eng.vehicle_flags(VehicleId(9)).is_none());
        assert!(eng.train_remaining_eta(TrainId(9)).is_none());
    }
}
