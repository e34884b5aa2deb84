//! `lx-track` — train-side observation for the level-crossing engine.
//!
//! Everything the engine knows about a train comes through here:
//!
//! 1. [`SensorTracker`] records the tick at which the train's leading edge
//!    crosses each virtual detection point, skip-ahead safe.
//! 2. Once the last sensor fires, the one-shot estimator commits an
//!    [`Estimate`] (ETA to the crossing, ETD until the rear clears).
//! 3. Callers derive remaining time by decay:
//!    `remaining = eta − (now − computed_at)`, which goes negative as a
//!    natural "arrival imminent or overdue" signal.
//!
//! No recomputation ever happens: triggers never re-fire and the estimate is
//! committed at most once per train.

pub mod estimator;
pub mod tracker;
pub mod train;


pub use estimator::{ArrivalEstimator, Estimate, KinematicEstimator, LastSpeedEstimator};
pub use tracker::SensorTracker;
pub use train::{SensorTrigger, Train};
