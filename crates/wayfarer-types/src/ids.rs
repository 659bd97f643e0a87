//! Type-safe identifier wrappers around the database's `BIGINT` keys.
//!
//! Every persisted entity has a synthetic integer key assigned by
//! `PostgreSQL` (`GENERATED ALWAYS AS IDENTITY`). Wrapping each key in its
//! own newtype prevents passing an item id where a person id is expected.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around `i64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub i64);

        impl $name {
            /// Return the inner key value.
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a player character.
    PersonId
}

define_id! {
    /// Unique identifier for a location (node in the travel graph).
    LocationId
}

define_id! {
    /// Unique identifier for a catalog item.
    ItemId
}

define_id! {
    /// Unique identifier for an ownership edge between a person and an item.
    PersonItemId
}

define_id! {
    /// Unique identifier for a shop listing.
    ItemInLocationId
}

define_id! {
    /// Unique identifier for a directed path (edge in the travel graph).
    PathId
}

define_id! {
    /// Unique identifier for a journey record.
    JourneyId
}

define_id! {
    /// Unique identifier for a mob.
    MobId
}
