//! Character creation and read-only views of a character.

use tracing::{debug, info};
use wayfarer_core::{GameError, PersonStatistics, person};
use wayfarer_db::{catalog_store, inventory_store, person_store};
use wayfarer_types::{ItemType, Person, PersonId};

use crate::error::EngineError;
use crate::game::{Game, load_location};

/// Level whose weapons are eligible as the starter weapon.
const STARTER_LEVEL: i32 = 1;

impl Game {
    /// Create a character for `external_id` and make it their active one.
    ///
    /// The character starts at the first location with the configured stats
    /// and the weakest level 1 weapon already worn. A previous character of
    /// the same identity stays in storage but is no longer active.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidNickname`] or
    /// [`GameError::InvalidExternalId`] for bad input and
    /// [`GameError::WorldNotSeeded`] if there is nowhere to start.
    pub async fn init_person(
        &self,
        nickname: &str,
        external_id: &str,
    ) -> Result<Person, EngineError> {
        person::validate_nickname(nickname)?;
        person::validate_external_id(external_id)?;
        self.retrying(move || self.init_person_once(nickname, external_id))
            .await
    }

    async fn init_person_once(
        &self,
        nickname: &str,
        external_id: &str,
    ) -> Result<Person, EngineError> {
        let mut tx = self.db.begin().await?;

        let start = catalog_store::first_location(&mut tx)
            .await?
            .ok_or(GameError::WorldNotSeeded("no locations"))?;
        let weapons = catalog_store::items_of_type(&mut tx, ItemType::Weapon, STARTER_LEVEL).await?;
        let weapon = person::starter_weapon(&weapons)?;

        let new = self
            .config
            .starting
            .new_person(nickname, external_id, start.id);
        let created = person_store::insert_person(&mut tx, &new).await?;
        inventory_store::insert_holding(&mut tx, created.id, weapon.id, 1, true).await?;
        person_store::set_active_character(&mut tx, external_id, created.id).await?;

        tx.commit().await?;
        info!(
            person_id = %created.id,
            location_id = %start.id,
            weapon_id = %weapon.id,
            "Person created"
        );
        Ok(created)
    }

    /// The active character of `external_id`, if they have one.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Db`] if the query fails.
    pub async fn person_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Person>, EngineError> {
        let mut conn = self.db.pool().acquire().await?;
        Ok(person_store::active_person(&mut conn, external_id).await?)
    }

    /// Base stats, the bonus from worn items and their sum, together with
    /// the character's current location.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PersonNotFound`] for an unknown id and
    /// [`GameError::AlreadyTravelling`] while on the road.
    pub async fn statistics(&self, person_id: PersonId) -> Result<PersonStatistics, EngineError> {
        self.retrying(move || self.statistics_once(person_id))
            .await
    }

    async fn statistics_once(&self, person_id: PersonId) -> Result<PersonStatistics, EngineError> {
        let mut tx = self.db.begin().await?;
        let person = self.enter(&mut tx, person_id).await?;
        let location = load_location(&mut tx, person.location_id).await?;
        let worn = inventory_store::owned_items(&mut tx, person_id, true).await?;
        tx.commit().await?;

        debug!(person_id = %person_id, worn = worn.len(), "Statistics computed");
        Ok(PersonStatistics::compute(person, location, &worn))
    }
}
