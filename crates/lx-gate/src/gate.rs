//! The per-crossing gate record and its tick evaluation.

use log::info;

use lx_core::{CrossingId, Thresholds};
use lx_track::Train;

/// Barrier position.  The warning flag is tracked separately on [`Gate`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GateState {
    Open,
    Closed,
}

/// State transition produced by one tick's evaluation.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GateEvent {
    /// The barrier came down.
    Closed,
    /// The intersection warning activated.
    WarningActivated,
    /// The barrier reopened (warning cleared alongside).
    Opened,
}

/// The externally queryable gate state (consumed by renderers / actuators).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GateQuery {
    pub closed: bool,
    pub notified: bool,
}

/// One crossing's barrier.
#[derive(Clone, Debug)]
pub struct Gate {
    pub crossing: CrossingId,
    pub state: GateState,
    /// When the barrier last came down; cleared on reopening.
    pub close_time: Option<f64>,
    /// Intersection-warning flag: one-way until the barrier reopens.
    pub notified: bool,
}

impl Gate {
    pub fn new(crossing: CrossingId) -> Self {
        Self {
            crossing,
            state: GateState::Open,
            close_time: None,
            notified: false,
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.state == GateState::Closed
    }

    #[inline]
    pub fn query(&self) -> GateQuery {
        GateQuery {
            closed: self.is_closed(),
            notified: self.notified,
        }
    }

    /// Evaluate one tick against every train tracked at this crossing.
    ///
    /// Returns the transitions that fired, in the order warning → close →
    /// open.  A train only participates once it carries an estimate; a train
    /// that has departed participates only through the reopening lead time.
    pub fn step(&mut self, trains: &[&Train], th: &Thresholds, now: f64) -> Vec<GateEvent> {
        let mut events = Vec::new();

        // ── Intersection warning (independent of barrier state) ───────────
        if !self.notified && self.any_within(trains, th.notification_time, now) {
            self.notified = true;
            events.push(GateEvent::WarningActivated);
            info!("crossing {}: warning activated t={now:.2}", self.crossing);
        }

        match self.state {
            // ── OPEN → CLOSED ─────────────────────────────────────────────
            GateState::Open => {
                if self.any_within(trains, th.closure_before_eta, now) {
                    self.state = GateState::Closed;
                    self.close_time = Some(now);
                    events.push(GateEvent::Closed);
                    info!("crossing {}: barrier closed t={now:.2}", self.crossing);
                }
            }

            // ── CLOSED → OPEN ─────────────────────────────────────────────
            //
            // Logical OR across trains: every estimated, un-departed train
            // blocks, as does every departed train still inside the
            // reopening lead time.  Reopening additionally requires that
            // some train actually cleared the crossing — a closed gate with
            // no departed train (e.g. the train vanished from telemetry)
            // stays closed.
            GateState::Closed => {
                let blocking = trains.iter().any(|t| {
                    (t.estimate.is_some() && !t.departed)
                        || t.departure_time
                            .is_some_and(|dep| now - dep < th.opening_after_etd)
                });
                let cleared = trains
                    .iter()
                    .any(|t| t.departure_time.is_some_and(|dep| now - dep >= th.opening_after_etd));
                if !blocking && cleared {
                    self.state = GateState::Open;
                    self.close_time = None;
                    self.notified = false;
                    events.push(GateEvent::Opened);
                    info!("crossing {}: barrier reopened t={now:.2}", self.crossing);
                }
            }
        }

        events
    }

    /// Does any estimated, un-departed train have `remaining_eta <= lead`?
    fn any_within(&self, trains: &[&Train], lead: f64, now: f64) -> bool {
        trains.iter().any(|t| {
            !t.departed
                && t.remaining_eta(now)
                    .is_some_and(|remaining| remaining <= lead)
        })
    }
}
