//! `PostgreSQL` data layer for the Wayfarer game engine.
//!
//! Every store function takes `&mut PgConnection`, so it runs auto-committed
//! on a pooled connection or as one statement of a larger transaction.
//! Person-scoped writes open a transaction with [`PostgresPool::begin`], lock
//! the person row with [`person_store::lock_person`], and commit everything
//! together.
//!
//! ```text
//! Engine operation
//!     |
//!     +-- with_retry ------------------------- (40001 / 40P01)
//!         |
//!         +-- begin
//!             |-- lock_person                 SELECT ... FOR UPDATE
//!             |-- catalog / inventory / world / journey reads
//!             |-- writes
//!             +-- commit
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool, migrations and transactions
//! - [`entity`] -- Generic fetch and delete by primary key
//! - [`rows`] -- Row structs and conversions into domain types
//! - [`person_store`] -- Persons and the active-character pointer
//! - [`inventory_store`] -- Ownership edges between persons and items
//! - [`catalog_store`] -- Items, shop listings and spawn location
//! - [`world_store`] -- Paths, destinations and world seeding
//! - [`journey_store`] -- Journey records
//! - [`retry`] -- Re-running transactions after serialization conflicts
//! - [`error`] -- Shared error types

pub mod catalog_store;
pub mod entity;
pub mod error;
pub mod inventory_store;
pub mod journey_store;
pub mod person_store;
pub mod postgres;
pub mod retry;
pub mod rows;
pub mod world_store;

// Re-export primary types for convenience.
pub use entity::{Entity, delete_by_id, fetch_by_id};
pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
pub use retry::{Retryable, with_retry};
pub use world_store::WorldCounts;
