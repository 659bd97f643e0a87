//! Person rows and the active-character pointer.
//!
//! An external identity may own several persons over time. The
//! `active_character` table maps each identity to exactly one of them, and
//! identity lookups go through that pointer rather than insertion order.

use sqlx::PgConnection;
use wayfarer_types::{LocationId, NewPerson, Person, PersonId};

use crate::entity::Entity;
use crate::error::DbError;
use crate::rows::{PersonRow, to_bigint};

/// Insert a person and return the stored row.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the insert fails (for example an unknown
/// location) and [`DbError::OutOfRange`] if the balance does not fit.
pub async fn insert_person(conn: &mut PgConnection, new: &NewPerson) -> Result<Person, DbError> {
    let sql = format!(
        "INSERT INTO person (nickname, external_id, level, hp, money, attack, magic, \
         magic_attack, armour, magic_armour, xp, location_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
         RETURNING {}",
        PersonRow::COLUMNS
    );
    let row = sqlx::query_as::<_, PersonRow>(&sql)
        .bind(&new.nickname)
        .bind(&new.external_id)
        .bind(new.level)
        .bind(new.hp)
        .bind(to_bigint(new.money, "person.money")?)
        .bind(new.attack)
        .bind(new.magic)
        .bind(new.magic_attack)
        .bind(new.armour)
        .bind(new.magic_armour)
        .bind(new.xp)
        .bind(new.location_id.into_inner())
        .fetch_one(&mut *conn)
        .await?;

    tracing::debug!(person_id = row.id, "Inserted person");
    Person::try_from(row)
}

/// Point `external_id` at `person_id`, replacing any previous character.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the upsert fails.
pub async fn set_active_character(
    conn: &mut PgConnection,
    external_id: &str,
    person_id: PersonId,
) -> Result<(), DbError> {
    sqlx::query(
        r"INSERT INTO active_character (external_id, person_id)
          VALUES ($1, $2)
          ON CONFLICT (external_id) DO UPDATE SET person_id = EXCLUDED.person_id",
    )
    .bind(external_id)
    .bind(person_id.into_inner())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Load the active character for `external_id`.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn active_person(
    conn: &mut PgConnection,
    external_id: &str,
) -> Result<Option<Person>, DbError> {
    let row = sqlx::query_as::<_, PersonRow>(
        r"SELECT p.id, p.nickname, p.external_id, p.level, p.hp, p.money, p.attack, p.magic,
                 p.magic_attack, p.armour, p.magic_armour, p.xp, p.location_id
          FROM active_character ac
          JOIN person p ON p.id = ac.person_id
          WHERE ac.external_id = $1",
    )
    .bind(external_id)
    .fetch_optional(&mut *conn)
    .await?;
    row.map(Person::try_from).transpose()
}

/// Load a person and lock the row until the transaction ends.
///
/// Every person-scoped write takes this lock first, which serializes
/// concurrent operations on the same person without blocking others.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn lock_person(
    conn: &mut PgConnection,
    person_id: PersonId,
) -> Result<Option<Person>, DbError> {
    let sql = format!(
        "SELECT {} FROM person WHERE id = $1 FOR UPDATE",
        PersonRow::COLUMNS
    );
    let row = sqlx::query_as::<_, PersonRow>(&sql)
        .bind(person_id.into_inner())
        .fetch_optional(&mut *conn)
        .await?;
    row.map(Person::try_from).transpose()
}

/// Overwrite a person's balance.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the update fails, including the
/// `money >= 0` check, and [`DbError::OutOfRange`] if the value does not fit.
pub async fn set_money(
    conn: &mut PgConnection,
    person_id: PersonId,
    money: u64,
) -> Result<(), DbError> {
    sqlx::query("UPDATE person SET money = $2 WHERE id = $1")
        .bind(person_id.into_inner())
        .bind(to_bigint(money, "person.money")?)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Move a person and set their health.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the update fails.
pub async fn set_position(
    conn: &mut PgConnection,
    person_id: PersonId,
    location_id: LocationId,
    hp: i32,
) -> Result<(), DbError> {
    sqlx::query("UPDATE person SET location_id = $2, hp = $3 WHERE id = $1")
        .bind(person_id.into_inner())
        .bind(location_id.into_inner())
        .bind(hp)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
