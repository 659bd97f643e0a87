//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`sqlx`] errors and reports rows that cannot be converted into domain
//! types.

/// SQLSTATE for a serialization failure.
const SERIALIZATION_FAILURE: &str = "40001";

/// SQLSTATE for a detected deadlock.
const DEADLOCK_DETECTED: &str = "40P01";

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row holds a value the domain model cannot represent.
    #[error("corrupt {table} row: {reason}")]
    Corrupt {
        /// Table the row came from.
        table: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// A domain value does not fit its column type.
    #[error("value out of range for column {0}")]
    OutOfRange(&'static str),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Build a [`DbError::Corrupt`] for `table`.
    pub fn corrupt(table: &'static str, reason: impl core::fmt::Display) -> Self {
        Self::Corrupt {
            table,
            reason: reason.to_string(),
        }
    }

    /// Whether re-running the whole transaction may succeed.
    ///
    /// True for serialization failures and deadlocks, which `PostgreSQL`
    /// resolves by aborting one of the competing transactions.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Postgres(sqlx::Error::Database(db)) => db
                .code()
                .is_some_and(|code| code == SERIALIZATION_FAILURE || code == DEADLOCK_DETECTED),
            _ => false,
        }
    }

    /// Whether the database rejected a write for breaking a `CHECK` constraint.
    pub fn is_check_violation(&self) -> bool {
        match self {
            Self::Postgres(sqlx::Error::Database(db)) => {
                matches!(db.kind(), sqlx::error::ErrorKind::CheckViolation)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_transient() {
        assert!(!DbError::Config(String::from("bad url")).is_transient());
        assert!(!DbError::Postgres(sqlx::Error::RowNotFound).is_transient());
        assert!(!DbError::corrupt("person", "negative money").is_transient());
    }

    #[test]
    fn corrupt_message_names_table() {
        let err = DbError::corrupt("person_item", "quantity 0");
        assert_eq!(err.to_string(), "corrupt person_item row: quantity 0");
    }
}
