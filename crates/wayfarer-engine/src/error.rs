//! Error types for the game service.
//!
//! [`EngineError`] is what every [`Game`](crate::Game) operation returns. A
//! [`EngineError::Game`] is a refused action whose message can be shown to
//! the player; everything else is a system fault.

use wayfarer_core::GameError;
use wayfarer_db::{DbError, Retryable};
use wayfarer_ledger::LedgerError;

/// Top-level error for game operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The action was refused by a game rule. No state changed.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The data layer failed.
    #[error("database error: {0}")]
    Db(#[from] DbError),

    /// World generation rejected the configuration.
    #[error("world generation error: {0}")]
    World(#[from] wayfarer_world::WorldGenError),

    /// Concurrent operations on the same character kept conflicting.
    #[error("the character is busy, try again")]
    Conflict,
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        Self::Db(DbError::from(err))
    }
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        Self::Game(GameError::from(err))
    }
}

impl EngineError {
    /// The player-facing refusal, if this is one.
    pub const fn as_game(&self) -> Option<&GameError> {
        match self {
            Self::Game(err) => Some(err),
            Self::Db(_) | Self::World(_) | Self::Conflict => None,
        }
    }

    /// Whether stored data was found breaking an invariant.
    pub const fn is_integrity_violation(&self) -> bool {
        match self {
            Self::Game(err) => err.is_integrity_violation(),
            Self::Db(DbError::Corrupt { .. }) => true,
            Self::Db(_) | Self::World(_) | Self::Conflict => false,
        }
    }
}

impl Retryable for EngineError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Db(err) => err.is_transient(),
            Self::Game(_) | Self::World(_) | Self::Conflict => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusals_are_player_facing() {
        let err = EngineError::from(GameError::NotWorn);
        assert_eq!(err.to_string(), "item is not worn");
        assert_eq!(err.as_game(), Some(&GameError::NotWorn));
        assert!(!err.is_transient());
    }

    #[test]
    fn ledger_errors_become_refusals() {
        let err = EngineError::from(LedgerError::InsufficientFunds {
            required: 300,
            available: 250,
        });
        assert!(matches!(
            err,
            EngineError::Game(GameError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn corrupt_rows_are_integrity_violations() {
        assert!(EngineError::from(DbError::corrupt("person", "bad")).is_integrity_violation());
        assert!(
            EngineError::from(GameError::IntegrityViolation(String::from("x")))
                .is_integrity_violation()
        );
        assert!(!EngineError::Conflict.is_integrity_violation());
    }
}
