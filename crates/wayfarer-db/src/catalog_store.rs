//! Read-only catalog queries: items, shop listings and locations.

use sqlx::PgConnection;
use wayfarer_types::{Item, ItemId, ItemInLocation, ItemType, Location, LocationId};

use crate::entity::{Entity, convert_all};
use crate::error::DbError;
use crate::rows::{ItemInLocationRow, ItemRow, LocationRow};

/// Item columns qualified with the `i` alias used in listing joins.
const LISTED_ITEM_COLUMNS: &str = "i.id, i.cost, i.cost_to_sale, i.item_type, i.hp, i.mana, \
                                   i.attack, i.magic_attack, i.armour, i.magic_armour, i.req_level";

/// Return `item_id` if the shop at `location_id` lists it.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn listed_item(
    conn: &mut PgConnection,
    location_id: LocationId,
    item_id: ItemId,
) -> Result<Option<Item>, DbError> {
    let sql = format!(
        "SELECT {LISTED_ITEM_COLUMNS} FROM item_in_location il \
         JOIN item i ON i.id = il.item_id \
         WHERE il.location_id = $1 AND il.item_id = $2"
    );
    let row = sqlx::query_as::<_, ItemRow>(&sql)
        .bind(location_id.into_inner())
        .bind(item_id.into_inner())
        .fetch_optional(&mut *conn)
        .await?;
    row.map(Item::try_from).transpose()
}

/// The listing rows of the shop at `location_id`, in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn listings(
    conn: &mut PgConnection,
    location_id: LocationId,
) -> Result<Vec<ItemInLocation>, DbError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE location_id = $1 ORDER BY id",
        ItemInLocationRow::COLUMNS,
        ItemInLocationRow::TABLE
    );
    let rows = sqlx::query_as::<_, ItemInLocationRow>(&sql)
        .bind(location_id.into_inner())
        .fetch_all(&mut *conn)
        .await?;
    convert_all(rows)
}

/// Every item listed at `location_id`, cheapest first.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn shop_items(
    conn: &mut PgConnection,
    location_id: LocationId,
) -> Result<Vec<Item>, DbError> {
    let sql = format!(
        "SELECT {LISTED_ITEM_COLUMNS} FROM item_in_location il \
         JOIN item i ON i.id = il.item_id \
         WHERE il.location_id = $1 \
         ORDER BY i.req_level, i.cost, i.id"
    );
    let rows = sqlx::query_as::<_, ItemRow>(&sql)
        .bind(location_id.into_inner())
        .fetch_all(&mut *conn)
        .await?;
    convert_all(rows)
}

/// Every catalog item of `item_type` requiring exactly `req_level`.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn items_of_type(
    conn: &mut PgConnection,
    item_type: ItemType,
    req_level: i32,
) -> Result<Vec<Item>, DbError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE item_type = $1 AND req_level = $2 ORDER BY id",
        ItemRow::COLUMNS,
        ItemRow::TABLE
    );
    let rows = sqlx::query_as::<_, ItemRow>(&sql)
        .bind(item_type.as_str())
        .bind(req_level)
        .fetch_all(&mut *conn)
        .await?;
    convert_all(rows)
}

/// The location with the lowest id, where new characters spawn.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn first_location(conn: &mut PgConnection) -> Result<Option<Location>, DbError> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY id LIMIT 1",
        LocationRow::COLUMNS,
        LocationRow::TABLE
    );
    let row = sqlx::query_as::<_, LocationRow>(&sql)
        .fetch_optional(&mut *conn)
        .await?;
    row.map(Location::try_from).transpose()
}
