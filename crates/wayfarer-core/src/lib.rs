//! Game rules, configuration and the travel state machine for Wayfarer.
//!
//! Everything in this crate is pure: functions take freshly loaded entities
//! and return either a plan for the data layer to apply or a [`GameError`]
//! explaining why the action is refused. The engine crate wraps each plan in
//! a single database transaction.
//!
//! # Modules
//!
//! - [`config`] -- Typed configuration loaded from `wayfarer-config.yaml`
//! - [`clock`] -- Wall-clock abstraction used for journey timing
//! - [`economy`] -- Shop rules for buying, selling and stock listing
//! - [`equipment`] -- Slot exclusivity rules for equipping items
//! - [`journey`] -- Lazy travel state machine
//! - [`person`] -- Character creation rules
//! - [`statistics`] -- Base plus equipment stat breakdown
//! - [`error`] -- Player-facing rejection reasons

pub mod clock;
pub mod config;
pub mod economy;
pub mod equipment;
pub mod error;
pub mod journey;
pub mod person;
pub mod statistics;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, GameConfig};
pub use error::GameError;
pub use journey::TravelState;
pub use statistics::{EffectiveStats, PersonStatistics};
