//! World generation for the Wayfarer game.
//!
//! The world is seeded once, before any character exists, and never changes
//! afterwards. Generation is a pure function of [`WorldConfig`]: the same seed
//! always yields the same [`WorldBlueprint`], which the data layer inserts in a
//! single transaction.
//!
//! # Modules
//!
//! - [`blueprint`] -- Id-free entity specs cross-referenced by index
//! - [`generator`] -- Seeded generation of locations, mobs, items, shops and paths
//! - [`error`] -- Error types for world generation
//!
//! [`WorldConfig`]: wayfarer_core::config::WorldConfig

pub mod blueprint;
pub mod error;
pub mod generator;

pub use blueprint::{ItemSpec, ListingSpec, LocationSpec, MobSpec, PathSpec, WorldBlueprint};
pub use error::WorldGenError;
pub use generator::generate;
