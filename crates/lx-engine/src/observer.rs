//! Engine observer trait for event streaming and reporting.

use lx_core::{CrossingId, Tick};
use lx_gate::GateEvent;
use lx_policy::RerouteDecision;

use crate::engine::RunReport;

/// Callbacks invoked by [`CrossingEngine::step`][crate::CrossingEngine::step]
/// and [`finalize`][crate::CrossingEngine::finalize] at key points in the
/// tick.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — gate event printer
///
/// ```rust,ignore
/// struct GatePrinter;
///
/// impl EngineObserver for GatePrinter {
///     fn on_gate_event(&mut self, crossing: CrossingId, event: GateEvent, time: f64) {
///         println!("crossing {crossing}: {event:?} at t={time:.1}");
///     }
/// }
/// ```
pub trait EngineObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick, _time: f64) {}

    /// Called for each gate transition this tick, in the order they fired.
    fn on_gate_event(&mut self, _crossing: CrossingId, _event: GateEvent, _time: f64) {}

    /// Called when a vehicle's one-shot reroute evaluation runs, whatever the
    /// verdict.
    fn on_reroute(&mut self, _decision: &RerouteDecision) {}

    /// Called at the end of each tick, after every phase has run.
    fn on_tick_end(&mut self, _tick: Tick) {}

    /// Called exactly once, from `finalize`, with the completed run report.
    fn on_run_end(&mut self, _report: &RunReport) {}
}

/// An [`EngineObserver`] that does nothing.  Use when you need to call `step`
/// but don't want callbacks.
pub struct NoopObserver;

impl EngineObserver for NoopObserver {}
