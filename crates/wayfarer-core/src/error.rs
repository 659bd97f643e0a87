//! Player-facing rejection reasons.
//!
//! A [`GameError`] is an expected business outcome, not a system fault: the
//! action was refused and no state changed. The `Display` text is safe to
//! show to the player verbatim. [`GameError::IntegrityViolation`] is the one
//! exception and signals a bug that left stored data inconsistent.

use chrono::{DateTime, Utc};
use wayfarer_ledger::LedgerError;
use wayfarer_types::{LocationId, LocationType, PersonId};

/// Reasons a game action can be refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The referenced person does not exist.
    #[error("character {0} does not exist")]
    PersonNotFound(PersonId),

    /// Shops only operate in towns.
    #[error("there are no shops in a {location_type}")]
    NoShopHere {
        /// The type of the person's current location.
        location_type: LocationType,
    },

    /// The item is not sold here or the person's level is too low.
    #[error("no such item in this location")]
    ItemNotAvailable,

    /// The person does not own the item.
    #[error("no such item owned")]
    NotOwned,

    /// Buy and sell quantities must be positive.
    #[error("quantity must be positive")]
    InvalidQuantity,

    /// The balance cannot cover the purchase.
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        /// Coins required.
        required: u64,
        /// Coins held.
        available: u64,
    },

    /// The person owns fewer units than they tried to sell.
    #[error("insufficient quantity owned: want to sell {requested}, have {held}")]
    InsufficientQuantity {
        /// Units requested.
        requested: u32,
        /// Units held.
        held: u32,
    },

    /// The item is already equipped.
    #[error("item is already worn")]
    AlreadyWorn,

    /// The item is not equipped.
    #[error("item is not worn")]
    NotWorn,

    /// No path leads from the current location to the destination.
    #[error("location {to} can't be reached from here")]
    Unreachable {
        /// The requested destination.
        to: LocationId,
    },

    /// A journey is still in progress.
    #[error("already travelling, should arrive by {arrive_by}")]
    AlreadyTravelling {
        /// When the current journey ends.
        arrive_by: DateTime<Utc>,
    },

    /// The nickname failed validation.
    #[error("invalid nickname: {0}")]
    InvalidNickname(String),

    /// The external identity failed validation.
    #[error("invalid external identity: {0}")]
    InvalidExternalId(String),

    /// Character creation needs world data that has not been seeded.
    #[error("world is not seeded: {0}")]
    WorldNotSeeded(&'static str),

    /// A numeric computation overflowed.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Stored data breaks an invariant. Indicates a bug, not bad input.
    #[error("data integrity violation: {0}")]
    IntegrityViolation(String),
}

impl GameError {
    /// Whether this error reports corrupted state rather than a refused action.
    pub const fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::IntegrityViolation(_))
    }
}

impl From<LedgerError> for GameError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ZeroQuantity => Self::InvalidQuantity,
            LedgerError::InsufficientFunds {
                required,
                available,
            } => Self::InsufficientFunds {
                required,
                available,
            },
            LedgerError::InsufficientQuantity { requested, held } => {
                Self::InsufficientQuantity { requested, held }
            }
            LedgerError::NotHeld => Self::NotOwned,
            LedgerError::Overflow { context } => Self::Overflow(context),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_shop_message_names_location_type() {
        let err = GameError::NoShopHere {
            location_type: LocationType::Dungeon,
        };
        assert_eq!(err.to_string(), "there are no shops in a dungeon");
    }

    #[test]
    fn ledger_errors_map_to_player_reasons() {
        let err = GameError::from(LedgerError::InsufficientFunds {
            required: 300,
            available: 250,
        });
        assert_eq!(
            err,
            GameError::InsufficientFunds {
                required: 300,
                available: 250,
            }
        );
        assert_eq!(GameError::from(LedgerError::NotHeld), GameError::NotOwned);
        assert_eq!(
            GameError::from(LedgerError::ZeroQuantity),
            GameError::InvalidQuantity
        );
    }

    #[test]
    fn only_integrity_violations_are_flagged() {
        assert!(GameError::IntegrityViolation(String::from("two worn weapons")).is_integrity_violation());
        assert!(!GameError::AlreadyWorn.is_integrity_violation());
    }
}
