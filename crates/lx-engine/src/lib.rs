//! `lx-engine` — the tick-step orchestrator for the level-crossing control
//! engine.
//!
//! # Fixed phase order
//!
//! ```text
//! for each telemetry snapshot:
//!   ① Tracking  — record sensor triggers, commit one-shot ETA/ETD
//!                 estimates, detect arrivals and departures.
//!   ② Gates     — drive every barrier's warn/close/reopen machine;
//!                 reopening releases engine-off flags and prunes
//!                 departed trains.
//!   ③ Shutdown  — engine-off policy for every observed vehicle.
//!   ④ Metrics   — per-vehicle wait/fuel/emissions accounting.
//!   ⑤ Sampling  — every K ticks, queue length and comfort score.
//!   ⑥ Reroute   — one-shot evaluation for vehicles entering a warned
//!                 crossing's decision zone.
//! ```
//!
//! The engine is a pure reactor: it owns all decision state but never moves
//! an entity.  An external loop feeds it one [`lx_core::TelemetrySnapshot`]
//! per tick and consumes it once with [`CrossingEngine::finalize`].
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lx_engine::{EngineBuilder, NoopObserver};
//! use lx_track::LastSpeedEstimator;
//!
//! let mut engine = EngineBuilder::new(config)
//!     .baseline(Box::new(LastSpeedEstimator))
//!     .build()?;
//! for snapshot in telemetry {
//!     engine.step(&snapshot, &mut NoopObserver);
//! }
//! let report = engine.finalize(&mut NoopObserver);
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod observer;

#[cfg(test)]
mod tests;

pub use builder::EngineBuilder;
pub use engine::{CrossingEngine, RunReport, VehicleFlags};
pub use error::{EngineError, EngineResult};
pub use observer::{EngineObserver, NoopObserver};
