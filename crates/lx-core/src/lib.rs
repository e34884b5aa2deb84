//! `lx-core` — foundational types for the level-crossing control engine.
//!
//! This crate is a dependency of every other `lx-*` crate.  It intentionally
//! has no `lx-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `TrainId`, `VehicleId`, `CrossingId`                    |
//! | [`time`]      | `Tick`, `TickClock`                                     |
//! | [`telemetry`] | `TelemetrySnapshot`, `EntityObs`, `EntityKind`          |
//! | [`config`]    | `Thresholds`, `FuelModel`, `CrossingGeometry`, …        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod ids;
pub mod telemetry;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    AlternateRoute, ConfigError, CrossingGeometry, EngineConfig, FuelModel, MetricsConfig,
    Thresholds,
};
pub use ids::{CrossingId, TrainId, VehicleId};
pub use telemetry::{EntityKind, EntityObs, TelemetrySnapshot};
pub use time::{Tick, TickClock};
