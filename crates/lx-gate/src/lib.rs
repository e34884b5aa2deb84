//! `lx-gate` — the barrier state machine.
//!
//! Two states (`Open`/`Closed`) plus an independent intersection-warning
//! flag, driven once per tick from the set of trains tracked against the
//! crossing.  The rules are deliberately hysteretic:
//!
//! - close the moment *any* estimated train's remaining ETA drops to the
//!   closure lead time;
//! - reopen only when *no* train is still blocking and at least one has
//!   cleared the crossing longer ago than the reopening lead time.
//!
//! Trains without an ETA never drive the machine — incomplete observation is
//! accepted under-coverage, not an error.

pub mod gate;


pub use gate::{Gate, GateEvent, GateQuery, GateState};
