//! Travel between locations.
//!
//! Arrival is never scheduled. Each call reads the latest journey under the
//! person row lock and, once `arrive_by` has passed, moves the character as
//! part of whatever operation noticed it first.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use wayfarer_core::{GameError, TravelState, journey};
use wayfarer_db::{journey_store, world_store};
use wayfarer_types::{Destination, LocationId, PersonId};

use crate::error::EngineError;
use crate::game::Game;

/// A journey still under way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TravelNotice {
    /// Where the character is heading.
    pub destination: LocationId,
    /// When they get there.
    pub arrive_by: DateTime<Utc>,
}

impl Game {
    /// Locations reachable from the character's current location, nearest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::AlreadyTravelling`] while on the road.
    pub async fn available_destinations(
        &self,
        person_id: PersonId,
    ) -> Result<Vec<Destination>, EngineError> {
        self.retrying(move || async move {
            let mut tx = self.db.begin().await?;
            let person = self.enter(&mut tx, person_id).await?;
            let destinations = world_store::destinations(&mut tx, person.location_id).await?;
            tx.commit().await?;
            debug!(
                person_id = %person_id,
                location_id = %person.location_id,
                count = destinations.len(),
                "Destinations listed"
            );
            Ok(destinations)
        })
        .await
    }

    /// Set off towards `to` and return the arrival time as stored, which is
    /// the value later travel checks report.
    ///
    /// The character stays at the origin until the arrival is resolved.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::AlreadyTravelling`] while a journey is in
    /// progress and [`GameError::Unreachable`] if no path leads to `to`.
    pub async fn start_journey(
        &self,
        person_id: PersonId,
        to: LocationId,
    ) -> Result<DateTime<Utc>, EngineError> {
        self.retrying(move || self.start_journey_once(person_id, to))
            .await
    }

    async fn start_journey_once(
        &self,
        person_id: PersonId,
        to: LocationId,
    ) -> Result<DateTime<Utc>, EngineError> {
        let mut tx = self.db.begin().await?;
        let person = self.enter(&mut tx, person_id).await?;

        let path = world_store::path_between(&mut tx, person.location_id, to)
            .await?
            .ok_or(GameError::Unreachable { to })?;
        let arrive_by = journey::plan_arrival(
            self.clock.now(),
            path.distance,
            self.config.travel.seconds_per_unit,
        )?;
        let started =
            journey_store::insert_journey(&mut tx, person_id, person.location_id, to, arrive_by)
                .await?;
        tx.commit().await?;

        info!(
            person_id = %person_id,
            journey_id = %started.id,
            from = %person.location_id,
            to = %to,
            distance = path.distance,
            arrive_by = %started.arrive_by,
            "Journey started"
        );
        Ok(started.arrive_by)
    }

    /// Resolve a finished journey and report one still under way.
    ///
    /// Returns `None` when the character is free to act.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PersonNotFound`] for an unknown id.
    pub async fn check_travel_state(
        &self,
        person_id: PersonId,
    ) -> Result<Option<TravelNotice>, EngineError> {
        self.retrying(move || async move {
            let mut tx = self.db.begin().await?;
            let (_, state) = self.lock_and_resolve(&mut tx, person_id).await?;
            tx.commit().await?;

            Ok(match state {
                TravelState::InTransit { journey } => Some(TravelNotice {
                    destination: journey.to_location_id,
                    arrive_by: journey.arrive_by,
                }),
                TravelState::Idle | TravelState::ArrivalPending { .. } => None,
            })
        })
        .await
    }
}
