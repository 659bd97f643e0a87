//! Journey records. Rows are only ever inserted, never updated.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use wayfarer_types::{Journey, LocationId, PersonId};

use crate::entity::Entity;
use crate::error::DbError;
use crate::rows::JourneyRow;

/// Record a journey and return it.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the insert fails.
pub async fn insert_journey(
    conn: &mut PgConnection,
    person_id: PersonId,
    from: LocationId,
    to: LocationId,
    arrive_by: DateTime<Utc>,
) -> Result<Journey, DbError> {
    let sql = format!(
        "INSERT INTO journey (person_id, from_location_id, to_location_id, arrive_by) \
         VALUES ($1, $2, $3, $4) RETURNING {}",
        JourneyRow::COLUMNS
    );
    let row = sqlx::query_as::<_, JourneyRow>(&sql)
        .bind(person_id.into_inner())
        .bind(from.into_inner())
        .bind(to.into_inner())
        .bind(arrive_by)
        .fetch_one(&mut *conn)
        .await?;
    Journey::try_from(row)
}

/// The person's most relevant journey: latest arrival, newest on ties.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn latest_journey(
    conn: &mut PgConnection,
    person_id: PersonId,
) -> Result<Option<Journey>, DbError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE person_id = $1 ORDER BY arrive_by DESC, id DESC LIMIT 1",
        JourneyRow::COLUMNS,
        JourneyRow::TABLE
    );
    let row = sqlx::query_as::<_, JourneyRow>(&sql)
        .bind(person_id.into_inner())
        .fetch_optional(&mut *conn)
        .await?;
    row.map(Journey::try_from).transpose()
}
