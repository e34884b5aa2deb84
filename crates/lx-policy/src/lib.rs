//! `lx-policy` — per-vehicle decision policies.
//!
//! Two decisions live here, both pure functions of read-only tracking state:
//!
//! - **Engine shutdown**: should a vehicle queued at a closed gate simulate
//!   switching its engine off?
//! - **Reroute**: should a vehicle approaching a warned crossing divert to
//!   the alternate one?  Evaluated exactly once per vehicle, never revisited.
//!
//! Both hang off [`expected_remaining_wait`], the shared estimate of how long
//! the barrier will stay down.

pub mod engine_off;
pub mod reroute;
pub mod wait;


pub use engine_off::EngineOffPolicy;
pub use reroute::{decline_reroute, evaluate_reroute, RerouteDecision};
pub use wait::expected_remaining_wait;
