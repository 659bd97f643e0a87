//! The [`Game`] service and the plumbing shared by its operations.
//!
//! Every person-scoped operation follows the same shape:
//!
//! 1. open a transaction and lock the person row,
//! 2. resolve a pending arrival and refuse to continue while in transit,
//! 3. load what the rule needs and ask `wayfarer-core` for a plan,
//! 4. apply the plan and commit.
//!
//! The whole sequence is retried when `PostgreSQL` aborts it for a
//! serialization conflict or deadlock.

use std::future::Future;
use std::sync::Arc;

use sqlx::PgConnection;
use tracing::{debug, info};
use wayfarer_core::journey::{self, TravelState};
use wayfarer_core::{Clock, GameConfig, GameError, SystemClock};
use wayfarer_db::rows::LocationRow;
use wayfarer_db::{
    PostgresConfig, PostgresPool, WorldCounts, fetch_by_id, journey_store, person_store,
    with_retry, world_store,
};
use wayfarer_types::{Location, LocationId, Person, PersonId};

use crate::error::EngineError;

/// Entry point for all game operations.
///
/// Holds no per-person state: every call re-reads what it needs inside its
/// own transaction, so one `Game` can serve any number of concurrent callers.
#[derive(Clone)]
pub struct Game {
    pub(crate) db: PostgresPool,
    pub(crate) config: GameConfig,
    pub(crate) clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for Game {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Game")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Build a game over an existing pool.
    pub const fn new(db: PostgresPool, config: GameConfig, clock: Arc<dyn Clock>) -> Self {
        Self { db, config, clock }
    }

    /// Connect to the configured database using the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Db`] if the connection fails.
    pub async fn connect(config: GameConfig) -> Result<Self, EngineError> {
        let db = PostgresPool::connect(&PostgresConfig::from(&config.database)).await?;
        Ok(Self::new(db, config, Arc::new(SystemClock)))
    }

    /// The loaded configuration.
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The underlying connection pool.
    pub const fn db(&self) -> &PostgresPool {
        &self.db
    }

    /// Apply pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Db`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), EngineError> {
        Ok(self.db.run_migrations().await?)
    }

    /// Generate the world from `world` config and insert it unless a world
    /// already exists. Returns the new row counts, or `None` if it existed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::World`] if the world config is unusable and
    /// [`EngineError::Db`] if the insert fails.
    pub async fn seed_world(&self) -> Result<Option<WorldCounts>, EngineError> {
        let blueprint = wayfarer_world::generate(&self.config.world)?;
        let mut tx = self.db.begin().await?;
        let counts = world_store::seed_if_empty(&mut tx, &blueprint).await?;
        tx.commit().await?;
        Ok(counts)
    }

    /// Row counts of the world catalog.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Db`] if the query fails.
    pub async fn world_counts(&self) -> Result<WorldCounts, EngineError> {
        let mut conn = self.db.pool().acquire().await?;
        Ok(world_store::world_counts(&mut conn).await?)
    }

    // -----------------------------------------------------------------------
    // Shared plumbing
    // -----------------------------------------------------------------------

    /// Run `op` with the configured retry limit, reporting exhausted retries
    /// as [`EngineError::Conflict`].
    pub(crate) async fn retrying<T, F, Fut>(&self, op: F) -> Result<T, EngineError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, EngineError>>,
    {
        let attempts = self.config.database.max_retries.max(1);
        match with_retry(attempts, op).await {
            Err(err) if wayfarer_db::Retryable::is_transient(&err) => Err(EngineError::Conflict),
            result => result,
        }
    }

    /// Lock the person row, resolve a finished journey, and return the
    /// person together with their travel state afterwards.
    pub(crate) async fn lock_and_resolve(
        &self,
        conn: &mut PgConnection,
        person_id: PersonId,
    ) -> Result<(Person, TravelState), EngineError> {
        let person = person_store::lock_person(conn, person_id)
            .await?
            .ok_or(GameError::PersonNotFound(person_id))?;
        let last = journey_store::latest_journey(conn, person_id).await?;

        match journey::travel_state(person.location_id, last.as_ref(), self.clock.now()) {
            TravelState::ArrivalPending { journey: finished } => {
                let destination = load_location(conn, finished.to_location_id).await?;
                let hp = journey::arrival_hp(
                    destination.location_type,
                    person.hp,
                    self.config.travel.max_hp,
                );
                person_store::set_position(conn, person_id, destination.id, hp).await?;
                info!(
                    person_id = %person_id,
                    journey_id = %finished.id,
                    location_id = %destination.id,
                    location_type = %destination.location_type,
                    hp,
                    "Journey resolved"
                );
                Ok((
                    Person {
                        location_id: destination.id,
                        hp,
                        ..person
                    },
                    TravelState::Idle,
                ))
            }
            state => Ok((person, state)),
        }
    }

    /// Enter a person-scoped action: lock, resolve arrival, and refuse while
    /// the person is still on the road.
    pub(crate) async fn enter(
        &self,
        conn: &mut PgConnection,
        person_id: PersonId,
    ) -> Result<Person, EngineError> {
        let (person, state) = self.lock_and_resolve(conn, person_id).await?;
        if let TravelState::InTransit { journey } = &state {
            debug!(person_id = %person_id, arrive_by = %journey.arrive_by, "Action refused while travelling");
        }
        journey::ensure_can_depart(&state)?;
        Ok(person)
    }
}

/// Load a location that foreign keys guarantee exists.
pub(crate) async fn load_location(
    conn: &mut PgConnection,
    id: LocationId,
) -> Result<Location, EngineError> {
    fetch_by_id::<LocationRow>(conn, id).await?.ok_or_else(|| {
        EngineError::Game(GameError::IntegrityViolation(format!(
            "location {id} is referenced but missing"
        )))
    })
}
