//! The travel graph and world seeding.
//!
//! Locations and items are inserted row by row so their generated ids can be
//! matched back to blueprint positions. Mobs, listings and paths reference
//! those ids and are inserted in bulk with `UNNEST`.

use sqlx::PgConnection;
use wayfarer_types::{Destination, LocationId, Path};
use wayfarer_world::WorldBlueprint;

use crate::entity::{Entity, convert_all};
use crate::error::DbError;
use crate::rows::{DestinationRow, PathRow, to_bigint};

/// Row counts of the seeded catalog tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldCounts {
    /// Rows in `location`.
    pub locations: i64,
    /// Rows in `item`.
    pub items: i64,
    /// Rows in `mob`.
    pub mobs: i64,
    /// Rows in `item_in_location`.
    pub listings: i64,
    /// Rows in `path`.
    pub paths: i64,
}

impl WorldCounts {
    /// Whether the world has been generated.
    pub const fn is_seeded(&self) -> bool {
        self.locations > 0
    }
}

/// Outgoing paths from `from` with their destinations, nearest first.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn destinations(
    conn: &mut PgConnection,
    from: LocationId,
) -> Result<Vec<Destination>, DbError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE p.from_location_id = $1 ORDER BY p.distance, p.id",
        DestinationRow::COLUMNS,
        DestinationRow::TABLE
    );
    let rows = sqlx::query_as::<_, DestinationRow>(&sql)
        .bind(from.into_inner())
        .fetch_all(&mut *conn)
        .await?;
    convert_all(rows)
}

/// The directed path from `from` to `to`, if one exists.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn path_between(
    conn: &mut PgConnection,
    from: LocationId,
    to: LocationId,
) -> Result<Option<Path>, DbError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE from_location_id = $1 AND to_location_id = $2",
        PathRow::COLUMNS,
        PathRow::TABLE
    );
    let row = sqlx::query_as::<_, PathRow>(&sql)
        .bind(from.into_inner())
        .bind(to.into_inner())
        .fetch_optional(&mut *conn)
        .await?;
    row.map(Path::try_from).transpose()
}

/// Count rows in every catalog table.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn world_counts(conn: &mut PgConnection) -> Result<WorldCounts, DbError> {
    let (locations, items, mobs, listings, paths): (i64, i64, i64, i64, i64) = sqlx::query_as(
        r"SELECT
            (SELECT COUNT(*) FROM location),
            (SELECT COUNT(*) FROM item),
            (SELECT COUNT(*) FROM mob),
            (SELECT COUNT(*) FROM item_in_location),
            (SELECT COUNT(*) FROM path)",
    )
    .fetch_one(&mut *conn)
    .await?;

    Ok(WorldCounts {
        locations,
        items,
        mobs,
        listings,
        paths,
    })
}

/// Advisory lock key serializing concurrent seeders.
const SEED_LOCK_KEY: i64 = 0x5741_5946_4152_4552;

/// Insert `world` unless a world already exists. Returns the new counts, or
/// `None` if the catalog was already seeded.
///
/// Must run inside a transaction: the advisory lock it takes is released at
/// commit, so concurrent seeders wait and then find the world present.
///
/// # Errors
///
/// Returns any error from [`insert_blueprint`].
pub async fn seed_if_empty(
    conn: &mut PgConnection,
    world: &WorldBlueprint,
) -> Result<Option<WorldCounts>, DbError> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SEED_LOCK_KEY)
        .execute(&mut *conn)
        .await?;
    if world_counts(conn).await?.is_seeded() {
        tracing::debug!("World already seeded");
        return Ok(None);
    }
    insert_blueprint(conn, world).await.map(Some)
}

/// Look up the id generated for blueprint position `index`.
fn resolve(ids: &[i64], index: usize, what: &str) -> Result<i64, DbError> {
    ids.get(index)
        .copied()
        .ok_or_else(|| DbError::Config(format!("blueprint references missing {what} {index}")))
}

/// Insert a generated world. Run inside a transaction so a failure leaves
/// the catalog empty.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if any insert fails,
/// [`DbError::OutOfRange`] if a value does not fit its column and
/// [`DbError::Config`] if the blueprint references a missing entity.
pub async fn insert_blueprint(
    conn: &mut PgConnection,
    world: &WorldBlueprint,
) -> Result<WorldCounts, DbError> {
    let mut location_ids = Vec::with_capacity(world.locations.len());
    for location in &world.locations {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO location (x, y, location_type) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(location.x)
        .bind(location.y)
        .bind(location.location_type.as_str())
        .fetch_one(&mut *conn)
        .await?;
        location_ids.push(id);
    }

    let mut item_ids = Vec::with_capacity(world.items.len());
    for item in &world.items {
        let id: i64 = sqlx::query_scalar(
            r"INSERT INTO item (cost, cost_to_sale, item_type, hp, mana, attack, magic_attack,
                                armour, magic_armour, req_level)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
              RETURNING id",
        )
        .bind(to_bigint(item.cost, "item.cost")?)
        .bind(to_bigint(item.cost_to_sale, "item.cost_to_sale")?)
        .bind(item.item_type.as_str())
        .bind(item.bonus.hp)
        .bind(item.bonus.mana)
        .bind(item.bonus.attack)
        .bind(item.bonus.magic_attack)
        .bind(item.bonus.armour)
        .bind(item.bonus.magic_armour)
        .bind(item.req_level)
        .fetch_one(&mut *conn)
        .await?;
        item_ids.push(id);
    }

    let len = world.mobs.len();
    let mut hps = Vec::with_capacity(len);
    let mut xps = Vec::with_capacity(len);
    let mut levels = Vec::with_capacity(len);
    let mut attack_types = Vec::with_capacity(len);
    let mut attacks = Vec::with_capacity(len);
    let mut armours = Vec::with_capacity(len);
    let mut magic_armours = Vec::with_capacity(len);
    for mob in &world.mobs {
        hps.push(mob.hp);
        xps.push(mob.xp);
        levels.push(mob.req_level);
        attack_types.push(mob.attack_type.as_str().to_owned());
        attacks.push(mob.attack);
        armours.push(mob.armour);
        magic_armours.push(mob.magic_armour);
    }
    sqlx::query(
        r"INSERT INTO mob (hp, xp, req_level, attack_type, attack, armour, magic_armour)
          SELECT * FROM UNNEST($1::INTEGER[], $2::INTEGER[], $3::INTEGER[], $4::TEXT[],
                               $5::INTEGER[], $6::INTEGER[], $7::INTEGER[])",
    )
    .bind(&hps)
    .bind(&xps)
    .bind(&levels)
    .bind(&attack_types)
    .bind(&attacks)
    .bind(&armours)
    .bind(&magic_armours)
    .execute(&mut *conn)
    .await?;

    let mut listing_locations = Vec::with_capacity(world.listings.len());
    let mut listing_items = Vec::with_capacity(world.listings.len());
    for listing in &world.listings {
        listing_locations.push(resolve(&location_ids, listing.location, "location")?);
        listing_items.push(resolve(&item_ids, listing.item, "item")?);
    }
    sqlx::query(
        r"INSERT INTO item_in_location (location_id, item_id)
          SELECT * FROM UNNEST($1::BIGINT[], $2::BIGINT[])",
    )
    .bind(&listing_locations)
    .bind(&listing_items)
    .execute(&mut *conn)
    .await?;

    let mut froms = Vec::with_capacity(world.paths.len());
    let mut tos = Vec::with_capacity(world.paths.len());
    let mut distances = Vec::with_capacity(world.paths.len());
    for path in &world.paths {
        froms.push(resolve(&location_ids, path.from, "location")?);
        tos.push(resolve(&location_ids, path.to, "location")?);
        distances.push(
            i32::try_from(path.distance)
                .ok()
                .ok_or(DbError::OutOfRange("path.distance"))?,
        );
    }
    sqlx::query(
        r"INSERT INTO path (from_location_id, to_location_id, distance)
          SELECT * FROM UNNEST($1::BIGINT[], $2::BIGINT[], $3::INTEGER[])",
    )
    .bind(&froms)
    .bind(&tos)
    .bind(&distances)
    .execute(&mut *conn)
    .await?;

    let counts = world_counts(conn).await?;
    tracing::info!(
        locations = counts.locations,
        items = counts.items,
        mobs = counts.mobs,
        listings = counts.listings,
        paths = counts.paths,
        "Inserted world blueprint"
    );
    Ok(counts)
}
