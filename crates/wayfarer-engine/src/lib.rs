//! Game service for Wayfarer.
//!
//! [`Game`] is the only entry point a front end needs. Each method is one
//! player action and runs as one `PostgreSQL` transaction:
//!
//! ```text
//!   front end ──► Game::buy(person, item, qty)
//!                   │
//!                   ├─ BEGIN; SELECT person FOR UPDATE
//!                   ├─ resolve finished journey / refuse while travelling
//!                   ├─ wayfarer-core rule ──► plan or GameError
//!                   ├─ wayfarer-db writes
//!                   └─ COMMIT  (retried on serialization conflict)
//! ```
//!
//! # Modules
//!
//! - `characters` -- character creation, lookup and statistics
//! - `gear` -- inventory listing, equip and unequip
//! - `trade` -- shop stock, buy and sell
//! - `travel` -- destinations, journeys and arrival
//! - [`error`] -- [`EngineError`]

mod characters;
pub mod error;
mod game;
mod gear;
mod trade;
mod travel;

pub use error::EngineError;
pub use game::Game;
pub use trade::TradeReceipt;
pub use travel::TravelNotice;
