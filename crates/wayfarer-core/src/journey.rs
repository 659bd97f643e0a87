//! Lazy travel state machine.
//!
//! A person is never moved by a timer. Each journey records an absolute
//! `arrive_by`, and the person's state is derived from their latest journey
//! and the current time whenever they are next inspected:
//!
//! ```text
//!   Idle ──start──► InTransit ──now ≥ arrive_by──► ArrivalPending ──resolve──► Idle
//! ```
//!
//! Resolution moves the person to the destination. A journey whose origin no
//! longer matches the person's location has already been resolved and is
//! treated as idle, so resolving twice is a no-op.

use chrono::{DateTime, TimeDelta, Utc};
use wayfarer_types::{Journey, LocationId, LocationType};

use crate::error::GameError;

/// Where a person stands relative to their latest journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelState {
    /// Not travelling.
    Idle,
    /// On the road until `journey.arrive_by`.
    InTransit {
        /// The journey in progress.
        journey: Journey,
    },
    /// Arrived, but the person's location has not been updated yet.
    ArrivalPending {
        /// The journey to resolve.
        journey: Journey,
    },
}

impl TravelState {
    /// Whether person-scoped actions must be refused.
    pub const fn is_in_transit(&self) -> bool {
        matches!(self, Self::InTransit { .. })
    }
}

/// Derive the travel state from the person's location and latest journey.
pub fn travel_state(
    current_location: LocationId,
    last: Option<&Journey>,
    now: DateTime<Utc>,
) -> TravelState {
    let Some(journey) = last else {
        return TravelState::Idle;
    };
    if now < journey.arrive_by {
        return TravelState::InTransit { journey: *journey };
    }
    if journey.from_location_id == current_location {
        TravelState::ArrivalPending { journey: *journey }
    } else {
        TravelState::Idle
    }
}

/// Health after arriving at a location of `destination` type.
///
/// Towns heal to `max_hp`; anywhere else leaves health unchanged.
pub const fn arrival_hp(destination: LocationType, hp: i32, max_hp: i32) -> i32 {
    match destination {
        LocationType::Town => max_hp,
        LocationType::Dungeon => hp,
    }
}

/// Compute the arrival time of a journey starting at `now`.
///
/// # Errors
///
/// Returns [`GameError::Overflow`] if the arrival time is out of range.
pub fn plan_arrival(
    now: DateTime<Utc>,
    distance: u32,
    seconds_per_unit: u32,
) -> Result<DateTime<Utc>, GameError> {
    let seconds = i64::from(distance)
        .checked_mul(i64::from(seconds_per_unit))
        .ok_or(GameError::Overflow("journey duration"))?;
    let duration = TimeDelta::try_seconds(seconds).ok_or(GameError::Overflow("journey duration"))?;
    now.checked_add_signed(duration)
        .ok_or(GameError::Overflow("arrival time"))
}

/// Refuse to depart while a journey is still in progress.
///
/// # Errors
///
/// Returns [`GameError::AlreadyTravelling`] when `state` is in transit.
pub const fn ensure_can_depart(state: &TravelState) -> Result<(), GameError> {
    match state {
        TravelState::InTransit { journey } => Err(GameError::AlreadyTravelling {
            arrive_by: journey.arrive_by,
        }),
        TravelState::Idle | TravelState::ArrivalPending { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use wayfarer_types::{JourneyId, PersonId};

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap_or_default()
    }

    fn journey(arrive_by: DateTime<Utc>) -> Journey {
        Journey {
            id: JourneyId(1),
            person_id: PersonId(1),
            from_location_id: LocationId(1),
            to_location_id: LocationId(2),
            arrive_by,
        }
    }

    #[test]
    fn no_journey_is_idle() {
        assert_eq!(travel_state(LocationId(1), None, at(0)), TravelState::Idle);
    }

    #[test]
    fn before_arrival_is_in_transit() {
        let j = journey(at(1_000_005));
        let state = travel_state(LocationId(1), Some(&j), at(1_000_004));
        assert_eq!(state, TravelState::InTransit { journey: j });
        assert!(state.is_in_transit());
    }

    #[test]
    fn at_arrival_time_is_pending() {
        let j = journey(at(1_000_005));
        let state = travel_state(LocationId(1), Some(&j), at(1_000_005));
        assert_eq!(state, TravelState::ArrivalPending { journey: j });
    }

    #[test]
    fn resolved_journey_is_idle() {
        // The person already moved to the destination.
        let j = journey(at(1_000_005));
        let state = travel_state(LocationId(2), Some(&j), at(1_000_010));
        assert_eq!(state, TravelState::Idle);
    }

    #[test]
    fn town_heals_dungeon_does_not() {
        assert_eq!(arrival_hp(LocationType::Town, 12, 100), 100);
        assert_eq!(arrival_hp(LocationType::Dungeon, 12, 100), 12);
    }

    #[test]
    fn arrival_scales_with_distance() {
        assert_eq!(plan_arrival(at(1_000), 5, 1), Ok(at(1_005)));
        assert_eq!(plan_arrival(at(1_000), 5, 60), Ok(at(1_300)));
        assert_eq!(plan_arrival(at(1_000), 0, 60), Ok(at(1_000)));
    }

    #[test]
    fn arrival_overflow_is_an_error() {
        let result = plan_arrival(DateTime::<Utc>::MAX_UTC, 1, 1);
        assert_eq!(result, Err(GameError::Overflow("arrival time")));
    }

    #[test]
    fn departure_blocked_only_in_transit() {
        let j = journey(at(50));
        assert_eq!(
            ensure_can_depart(&TravelState::InTransit { journey: j }),
            Err(GameError::AlreadyTravelling { arrive_by: at(50) })
        );
        assert_eq!(ensure_can_depart(&TravelState::Idle), Ok(()));
        assert_eq!(
            ensure_can_depart(&TravelState::ArrivalPending { journey: j }),
            Ok(())
        );
    }
}
