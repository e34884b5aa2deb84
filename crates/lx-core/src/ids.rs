//! Strongly typed, zero-cost identifier wrappers.
//!
//! Telemetry reports raw integer entity IDs; the `kind` field of each
//! observation decides which namespace the ID belongs to.  Wrapping them in
//! distinct types means a `TrainId` can never be used to look up a vehicle.
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys without
//! ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to the type's MAX.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }
    };
}

typed_id! {
    /// Identifier of a tracked train, stable for the train's lifetime.
    pub struct TrainId(u32);
}

typed_id! {
    /// Identifier of a road vehicle under observation.
    pub struct VehicleId(u32);
}

typed_id! {
    /// Index of a level crossing in the run's geometry.
    /// `u16` because a run monitors a handful of crossings, not thousands.
    pub struct CrossingId(u16);
}
