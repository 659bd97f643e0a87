//! Ownership edges between persons and items.
//!
//! A `person_item` row exists only while its quantity is positive; the
//! `quantity > 0` check and the `(person_id, item_id)` unique constraint back
//! up the rules applied by the engine.

use sqlx::PgConnection;
use wayfarer_ledger::HoldingChange;
use wayfarer_types::{ItemId, OwnedItem, PersonId, PersonItem, PersonItemId};

use crate::entity::{Entity, convert_all, delete_by_id};
use crate::error::DbError;
use crate::rows::{OwnedItemRow, PersonItemRow};

/// List a person's items with their catalog entries, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn owned_items(
    conn: &mut PgConnection,
    person_id: PersonId,
    only_worn: bool,
) -> Result<Vec<OwnedItem>, DbError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE pi.person_id = $1 AND (pi.worn OR NOT $2) ORDER BY pi.id",
        OwnedItemRow::COLUMNS,
        OwnedItemRow::TABLE
    );
    let rows = sqlx::query_as::<_, OwnedItemRow>(&sql)
        .bind(person_id.into_inner())
        .bind(only_worn)
        .fetch_all(&mut *conn)
        .await?;
    convert_all(rows)
}

/// Load one of a person's items with its catalog entry.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn owned_item(
    conn: &mut PgConnection,
    person_id: PersonId,
    item_id: ItemId,
) -> Result<Option<OwnedItem>, DbError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE pi.person_id = $1 AND pi.item_id = $2",
        OwnedItemRow::COLUMNS,
        OwnedItemRow::TABLE
    );
    let row = sqlx::query_as::<_, OwnedItemRow>(&sql)
        .bind(person_id.into_inner())
        .bind(item_id.into_inner())
        .fetch_optional(&mut *conn)
        .await?;
    row.map(OwnedItem::try_from).transpose()
}

/// Create an ownership edge.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the insert fails, for example when the
/// person already owns the item.
pub async fn insert_holding(
    conn: &mut PgConnection,
    person_id: PersonId,
    item_id: ItemId,
    quantity: u32,
    worn: bool,
) -> Result<PersonItem, DbError> {
    let sql = format!(
        "INSERT INTO person_item (person_id, item_id, quantity, worn) \
         VALUES ($1, $2, $3, $4) RETURNING {}",
        PersonItemRow::COLUMNS
    );
    let row = sqlx::query_as::<_, PersonItemRow>(&sql)
        .bind(person_id.into_inner())
        .bind(item_id.into_inner())
        .bind(i64::from(quantity))
        .bind(worn)
        .fetch_one(&mut *conn)
        .await?;
    PersonItem::try_from(row)
}

/// Overwrite the quantity of an existing edge.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the update fails, including the
/// `quantity > 0` check.
pub async fn set_quantity(
    conn: &mut PgConnection,
    holding_id: PersonItemId,
    quantity: u32,
) -> Result<(), DbError> {
    sqlx::query("UPDATE person_item SET quantity = $2 WHERE id = $1")
        .bind(holding_id.into_inner())
        .bind(i64::from(quantity))
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Set or clear the worn flag. Returns whether the edge exists.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the update fails.
pub async fn set_worn(
    conn: &mut PgConnection,
    holding_id: PersonItemId,
    worn: bool,
) -> Result<bool, DbError> {
    let result = sqlx::query("UPDATE person_item SET worn = $2 WHERE id = $1")
        .bind(holding_id.into_inner())
        .bind(worn)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Apply a settled holding change for `(person_id, item_id)`.
///
/// `existing` is the edge the change was computed against. Returns the edge
/// as it stands afterwards, or `None` if it was removed.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if a write fails and [`DbError::Corrupt`]
/// if `existing` is missing for an update or removal.
pub async fn apply_holding_change(
    conn: &mut PgConnection,
    person_id: PersonId,
    item_id: ItemId,
    existing: Option<PersonItem>,
    change: HoldingChange,
) -> Result<Option<PersonItem>, DbError> {
    match (change, existing) {
        (HoldingChange::Create { quantity }, None) => {
            insert_holding(conn, person_id, item_id, quantity, false)
                .await
                .map(Some)
        }
        (HoldingChange::Set { quantity }, Some(holding)) => {
            set_quantity(conn, holding.id, quantity).await?;
            Ok(Some(PersonItem {
                quantity,
                ..holding
            }))
        }
        (HoldingChange::Remove, Some(holding)) => {
            delete_by_id::<PersonItemRow>(conn, holding.id).await?;
            Ok(None)
        }
        (HoldingChange::Create { .. }, Some(holding)) => Err(DbError::corrupt(
            "person_item",
            format!("edge {} already exists", holding.id),
        )),
        (HoldingChange::Set { .. } | HoldingChange::Remove, None) => Err(DbError::corrupt(
            "person_item",
            format!("no edge for person {person_id} item {item_id}"),
        )),
    }
}
