//! The `CrossingEngine` struct and its tick step.

use std::collections::hash_map::Entry;

use log::debug;
use rustc_hash::FxHashMap;

use lx_core::{
    CrossingGeometry, CrossingId, EngineConfig, EntityKind, EntityObs, TelemetrySnapshot,
    TickClock, TrainId, VehicleId,
};
use lx_gate::{Gate, GateEvent, GateQuery};
use lx_metrics::{MetricsReport, MetricsTracker, PredictionSample, VehicleRecord};
use lx_policy::{
    decline_reroute, evaluate_reroute, expected_remaining_wait, EngineOffPolicy, RerouteDecision,
};
use lx_track::{ArrivalEstimator, SensorTracker, Train};

use crate::EngineObserver;

// ── Run report ────────────────────────────────────────────────────────────────

/// Everything a run produced, assembled exactly once by
/// [`CrossingEngine::finalize`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    /// Ticks stepped before finalization.
    pub ticks: u64,
    pub metrics: MetricsReport,
    /// Every reroute evaluation that ran, accepted or declined, in decision
    /// order.
    pub reroutes: Vec<RerouteDecision>,
}

/// Per-vehicle decision flags, for external queries.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleFlags {
    pub engine_off: bool,
    pub rerouted: bool,
}

/// A committed prediction waiting for its train's observed arrival.
struct PendingPrediction {
    predicted: f64,
    baseline: Option<f64>,
    computed_at: f64,
}

// ── CrossingEngine ────────────────────────────────────────────────────────────

/// The level-crossing control engine.
///
/// Owns every piece of run state — train and vehicle records, gates, metrics
/// accumulators, decision logs — and reacts to one read-only
/// [`TelemetrySnapshot`] per tick.  It never moves an entity itself.
///
/// [`step`][Self::step] runs a fixed phase order each tick:
///
/// 1. **Sensor tracking** — record trigger crossings, commit one-shot
///    estimates, detect arrivals and departures.
/// 2. **Gate control** — drive every barrier's state machine; a reopening
///    gate releases the engine-off flags of its queued vehicles and prunes
///    its departed trains.
/// 3. **Engine shutdown** — evaluate every observed vehicle against the
///    stillness/grace/expected-wait rules.
/// 4. **Per-vehicle metrics** — wait intervals, fuel, emissions.
/// 5. **Queue sampling** — every K ticks, queue length and comfort.
/// 6. **Reroute** — one-shot evaluation for vehicles entering a warned
///    crossing's decision zone.
///
/// Create via [`EngineBuilder`][crate::EngineBuilder].
pub struct CrossingEngine {
    /// Validated run configuration, read-only for the engine's lifetime.
    pub config: EngineConfig,

    /// Tick counter; advanced once at the end of every `step`.
    pub clock: TickClock,

    /// Time of the most recent snapshot; queries evaluate at this instant.
    sim_time: f64,

    trains:   FxHashMap<TrainId, Train>,
    vehicles: FxHashMap<VehicleId, VehicleRecord>,

    /// One gate per crossing, indexed by `CrossingId`.
    gates: Vec<Gate>,

    metrics:  MetricsTracker,
    reroutes: Vec<RerouteDecision>,

    /// Optional reference predictor for the final comparison.
    baseline:    Option<Box<dyn ArrivalEstimator>>,
    pending:     FxHashMap<TrainId, PendingPrediction>,
    predictions: Vec<PredictionSample>,
}

impl CrossingEngine {
    pub(crate) fn from_parts(
        config: EngineConfig,
        baseline: Option<Box<dyn ArrivalEstimator>>,
    ) -> Self {
        let gates = config.crossings.iter().map(|c| Gate::new(c.id)).collect();
        Self {
            clock: TickClock::new(config.tick_len_secs),
            sim_time: 0.0,
            trains: FxHashMap::default(),
            vehicles: FxHashMap::default(),
            gates,
            metrics: MetricsTracker::new(&config),
            reroutes: Vec::new(),
            baseline,
            pending: FxHashMap::default(),
            predictions: Vec::new(),
            config,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// React to one tick's telemetry.
    ///
    /// Every phase runs even when the snapshot is empty: gates keep counting
    /// down their reopening lead and the queue sampler keeps its schedule.
    /// Entities absent from the snapshot are simply not updated this tick.
    pub fn step<O: EngineObserver>(&mut self, snapshot: &TelemetrySnapshot, observer: &mut O) {
        let now = snapshot.time;
        let tick = self.clock.current_tick;
        self.sim_time = now;
        observer.on_tick_start(tick, now);

        // ── Phase 1: sensor trigger tracking ──────────────────────────────
        for obs in &snapshot.entities {
            if obs.kind == EntityKind::Train {
                self.track_train(obs, now);
            }
        }

        // ── Phase 2: gate control ─────────────────────────────────────────
        let mut opened: Vec<CrossingId> = Vec::new();
        for gate in &mut self.gates {
            let at: Vec<&Train> = self
                .trains
                .values()
                .filter(|t| t.crossing == gate.crossing)
                .collect();
            for event in gate.step(&at, &self.config.thresholds, now) {
                if event == GateEvent::Opened {
                    opened.push(gate.crossing);
                }
                observer.on_gate_event(gate.crossing, event, now);
            }
        }
        for &crossing in &opened {
            // A reopening gate restarts every engine the policy shut off
            // here; the vehicles themselves may still be queued.
            for v in self.vehicles.values_mut() {
                if v.crossing == Some(crossing) {
                    v.engine_off = false;
                }
            }
            // Departed trains are finished with at this crossing.
            self.trains
                .retain(|_, t| !(t.crossing == crossing && t.departed));
        }

        // ── Phase 3: engine-shutdown policy ───────────────────────────────
        //
        // Runs before the metrics phase so this tick's fuel accrual already
        // reflects a freshly flipped engine-off flag.
        let waits = self.expected_waits(now);
        let crossings = &self.config.crossings;
        let policy = EngineOffPolicy::new(&self.config.thresholds);
        for obs in &snapshot.entities {
            if obs.kind != EntityKind::Vehicle {
                continue;
            }
            let record = self
                .vehicles
                .entry(VehicleId(obs.id))
                .or_insert_with(|| {
                    VehicleRecord::new(
                        VehicleId(obs.id),
                        crossing_ahead_on_road(crossings, obs.position),
                        obs.position,
                        obs.speed,
                        now,
                    )
                });
            let Some(cid) = record.crossing else { continue };
            let geo = &crossings[cid.index()];
            policy.evaluate(
                record,
                geo.road_position - obs.position,
                obs.speed,
                self.gates[cid.index()].is_closed(),
                waits[cid.index()],
                geo.engine_off_band,
                now,
            );
        }

        // ── Phase 4: per-vehicle metrics ──────────────────────────────────
        for obs in &snapshot.entities {
            if obs.kind != EntityKind::Vehicle {
                continue;
            }
            if let Some(record) = self.vehicles.get_mut(&VehicleId(obs.id)) {
                self.metrics.track(record, obs.position, obs.speed, now);
            }
        }

        // ── Phase 5: periodic queue/comfort sampling ──────────────────────
        if self.metrics.should_sample(tick) {
            self.metrics.sample_queue(self.vehicles.values(), now);
        }

        // ── Phase 6: one-shot reroute evaluation ──────────────────────────
        for obs in &snapshot.entities {
            if obs.kind != EntityKind::Vehicle {
                continue;
            }
            let Some(record) = self.vehicles.get_mut(&VehicleId(obs.id)) else {
                continue;
            };
            if record.reroute_decided {
                continue;
            }
            let Some(cid) = record.crossing else { continue };
            if !self.gates[cid.index()].notified {
                continue;
            }
            let geo = &self.config.crossings[cid.index()];
            let distance = geo.road_position - obs.position;
            if !(distance > 0.0 && distance <= geo.decision_distance) {
                continue;
            }
            let decision = match &geo.alternate {
                // No alternate exists: the one-shot is consumed as declined.
                None => decline_reroute(record, now),
                Some(alt) => {
                    // The wait here is unknown until a train carries an
                    // estimate; defer without consuming the one-shot.
                    let Some(wait_here) = waits[cid.index()] else {
                        continue;
                    };
                    let travel = alt.distance / self.config.thresholds.nominal_road_speed;
                    let wait_other = waits[alt.crossing.index()].unwrap_or(0.0);
                    evaluate_reroute(
                        record,
                        wait_here,
                        travel,
                        wait_other,
                        &self.config.thresholds,
                        now,
                    )
                }
            };
            observer.on_reroute(&decision);
            self.reroutes.push(decision);
        }

        observer.on_tick_end(tick);
        self.clock.advance();
    }

    /// Consume the engine and produce the run report.
    ///
    /// Open wait intervals are closed at each vehicle's last-seen time, then
    /// the metrics aggregator computes the summary statistics and prediction
    /// comparison.  `on_run_end` fires with the finished report.
    pub fn finalize<O: EngineObserver>(self, observer: &mut O) -> RunReport {
        let vehicles: Vec<VehicleRecord> = self.vehicles.into_values().collect();
        let report = RunReport {
            ticks: self.clock.current_tick.0,
            metrics: self.metrics.finalize(vehicles, &self.predictions),
            reroutes: self.reroutes,
        };
        observer.on_run_end(&report);
        report
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Barrier/warning state of one crossing.
    pub fn gate_state(&self, crossing: CrossingId) -> Option<GateQuery> {
        self.gates.get(crossing.index()).map(Gate::query)
    }

    /// Decision flags of one tracked vehicle.
    pub fn vehicle_flags(&self, id: VehicleId) -> Option<VehicleFlags> {
        self.vehicles.get(&id).map(|v| VehicleFlags {
            engine_off: v.engine_off,
            rerouted: v.reroute_decided && v.rerouted,
        })
    }

    /// Seconds until a train's front reaches its crossing, evaluated at the
    /// last stepped snapshot time.  `None` while no estimate is committed.
    pub fn train_remaining_eta(&self, id: TrainId) -> Option<f64> {
        self.trains.get(&id).and_then(|t| t.remaining_eta(self.sim_time))
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Apply one train observation: create the record on first sight, run
    /// the sensor tracker, and keep the prediction-comparison ledger.
    fn track_train(&mut self, obs: &EntityObs, now: f64) {
        let id = TrainId(obs.id);
        let crossings = &self.config.crossings;
        let th = &self.config.thresholds;

        let train = match self.trains.entry(id) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                // Bind the train to the nearest crossing still ahead of it.
                // A train past every crossing is not worth tracking.
                let Some(cid) = crossing_ahead_on_rail(crossings, obs.position) else {
                    debug!("train {} first seen past every crossing; ignored", obs.id);
                    return;
                };
                let geo = &crossings[cid.index()];
                e.insert(Train::new(
                    id,
                    cid,
                    obs.length.unwrap_or(th.default_train_length),
                    geo.sensor_count(),
                    obs.position,
                    obs.speed,
                    now,
                ))
            }
        };

        let geo = &crossings[train.crossing.index()];
        let had_attempt = train.estimate_attempted;
        let was_arrived = train.arrived;

        SensorTracker::new(geo, th).observe(train, obs.position, obs.speed, now);

        // The baseline prediction is pinned the instant the one-shot commits,
        // on the same triggers the built-in estimator saw.
        if !had_attempt && train.estimate_attempted {
            if let Some(est) = &train.estimate {
                let baseline = self
                    .baseline
                    .as_ref()
                    .and_then(|b| b.predict(&train.triggers, geo, th));
                self.pending.insert(
                    id,
                    PendingPrediction {
                        predicted: est.eta,
                        baseline,
                        computed_at: est.computed_at,
                    },
                );
            }
        }

        // Arrival closes the prediction with the observed travel time.
        if !was_arrived && train.arrived {
            if let (Some(p), Some(at)) = (self.pending.remove(&id), train.arrival_time) {
                self.predictions.push(PredictionSample {
                    predicted: p.predicted,
                    baseline: p.baseline,
                    actual: at - p.computed_at,
                });
            }
        }
    }

    /// Expected remaining wait per crossing, computed once per tick after the
    /// gate phase and shared by both policies.
    fn expected_waits(&self, now: f64) -> Vec<Option<f64>> {
        let th = &self.config.thresholds;
        self.gates
            .iter()
            .map(|g| {
                expected_remaining_wait(
                    self.trains.values().filter(|t| t.crossing == g.crossing),
                    th,
                    now,
                )
            })
            .collect()
    }
}

// ── Crossing assignment ───────────────────────────────────────────────────────

/// The nearest crossing whose rail coordinate is still ahead of `position`.
fn crossing_ahead_on_rail(crossings: &[CrossingGeometry], position: f64) -> Option<CrossingId> {
    crossings
        .iter()
        .filter(|c| c.rail_position >= position)
        .min_by(|a, b| a.rail_position.total_cmp(&b.rail_position))
        .map(|c| c.id)
}

/// The nearest crossing whose road coordinate is still ahead of `position`.
fn crossing_ahead_on_road(crossings: &[CrossingGeometry], position: f64) -> Option<CrossingId> {
    crossings
        .iter()
        .filter(|c| c.road_position >= position)
        .min_by(|a, b| a.road_position.total_cmp(&b.road_position))
        .map(|c| c.id)
}
