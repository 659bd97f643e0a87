//! Generic single-entity reads and deletes.
//!
//! Each table's row struct implements [`Entity`], naming its table, its
//! column list and the domain type it converts into. [`fetch_by_id`] and
//! [`delete_by_id`] then work for any table. Store functions take
//! `&mut PgConnection`, so the same call runs auto-committed on a pooled
//! connection or inside a transaction.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection};

use crate::error::DbError;

/// A table row that converts into a domain model.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    /// Table name.
    const TABLE: &'static str;

    /// Comma-separated column list in `FromRow` order.
    const COLUMNS: &'static str;

    /// The domain type this row converts into.
    type Model: TryFrom<Self, Error = DbError>;
}

/// Load one entity by primary key.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails and
/// [`DbError::Corrupt`] if the row cannot be converted.
pub async fn fetch_by_id<E: Entity>(
    conn: &mut PgConnection,
    id: impl Into<i64>,
) -> Result<Option<E::Model>, DbError> {
    let sql = format!("SELECT {} FROM {} WHERE id = $1", E::COLUMNS, E::TABLE);
    let row = sqlx::query_as::<_, E>(&sql)
        .bind(id.into())
        .fetch_optional(&mut *conn)
        .await?;
    row.map(TryFrom::try_from).transpose()
}

/// Delete one entity by primary key. Returns whether a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the delete fails, including foreign-key
/// violations.
pub async fn delete_by_id<E: Entity>(
    conn: &mut PgConnection,
    id: impl Into<i64>,
) -> Result<bool, DbError> {
    let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
    let result = sqlx::query(&sql)
        .bind(id.into())
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Convert every row, failing on the first corrupt one.
pub(crate) fn convert_all<E: Entity>(rows: Vec<E>) -> Result<Vec<E::Model>, DbError> {
    rows.into_iter().map(TryFrom::try_from).collect()
}
