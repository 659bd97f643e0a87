//! Core entity structs for the Wayfarer game.
//!
//! These mirror the relational schema in `wayfarer-db/migrations`. Catalog
//! entities (locations, items, listings, paths, mobs) are written once by
//! world generation and never mutated. Persons, ownership edges and journeys
//! are written by the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AttackType, ItemType, LocationType};
use crate::ids::{ItemId, ItemInLocationId, JourneyId, LocationId, MobId, PathId, PersonId, PersonItemId};

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A node in the travel graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Location {
    /// Unique location identifier.
    pub id: LocationId,
    /// Grid x coordinate.
    pub x: i32,
    /// Grid y coordinate.
    pub y: i32,
    /// Town or dungeon.
    pub location_type: LocationType,
}

// ---------------------------------------------------------------------------
// Person
// ---------------------------------------------------------------------------

/// A player character.
///
/// Several persons may share an `external_id`; only the one referenced by the
/// active-character pointer is returned by identity lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Person {
    /// Unique person identifier.
    pub id: PersonId,
    /// Display name.
    pub nickname: String,
    /// Opaque identity of the external actor controlling this person.
    pub external_id: String,
    /// Character level.
    pub level: i32,
    /// Current health.
    pub hp: i32,
    /// Coin balance. Never negative.
    pub money: u64,
    /// Base physical attack.
    pub attack: i32,
    /// Base magic pool.
    pub magic: i32,
    /// Base magic attack.
    pub magic_attack: i32,
    /// Base physical armour.
    pub armour: i32,
    /// Base magic armour.
    pub magic_armour: i32,
    /// Accumulated experience.
    pub xp: i32,
    /// Where the person currently is.
    pub location_id: LocationId,
}

/// Column values for inserting a new [`Person`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    /// Display name.
    pub nickname: String,
    /// Opaque identity of the external actor.
    pub external_id: String,
    /// Starting level.
    pub level: i32,
    /// Starting health.
    pub hp: i32,
    /// Starting balance.
    pub money: u64,
    /// Base physical attack.
    pub attack: i32,
    /// Base magic pool.
    pub magic: i32,
    /// Base magic attack.
    pub magic_attack: i32,
    /// Base physical armour.
    pub armour: i32,
    /// Base magic armour.
    pub magic_armour: i32,
    /// Starting experience.
    pub xp: i32,
    /// Spawn location.
    pub location_id: LocationId,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Stat bonuses granted by a worn item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StatBonus {
    /// Health bonus.
    pub hp: i32,
    /// Mana bonus.
    pub mana: i32,
    /// Physical attack bonus.
    pub attack: i32,
    /// Magic attack bonus.
    pub magic_attack: i32,
    /// Physical armour bonus.
    pub armour: i32,
    /// Magic armour bonus.
    pub magic_armour: i32,
}

/// An immutable catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,
    /// Price when buying from a shop.
    pub cost: u64,
    /// Price when selling to a shop. Never above `cost`.
    pub cost_to_sale: u64,
    /// Equipment slot.
    pub item_type: ItemType,
    /// Bonuses applied while worn.
    pub bonus: StatBonus,
    /// Minimum person level required to buy the item.
    pub req_level: i32,
}

/// The ownership edge between a person and an item.
///
/// At most one exists per (person, item) pair and `quantity` is always
/// positive; the row is deleted when the last unit is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PersonItem {
    /// Unique edge identifier.
    pub id: PersonItemId,
    /// Owner.
    pub person_id: PersonId,
    /// Owned item.
    pub item_id: ItemId,
    /// Units owned.
    pub quantity: u32,
    /// Whether the item is currently equipped.
    pub worn: bool,
}

/// A [`PersonItem`] loaded together with its catalog [`Item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OwnedItem {
    /// The ownership edge.
    pub holding: PersonItem,
    /// The catalog entry.
    pub item: Item,
}

/// Declares an item purchasable at a location (unlimited stock).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ItemInLocation {
    /// Unique listing identifier.
    pub id: ItemInLocationId,
    /// The shop location.
    pub location_id: LocationId,
    /// The listed item.
    pub item_id: ItemId,
}

// ---------------------------------------------------------------------------
// Travel
// ---------------------------------------------------------------------------

/// A directed, weighted edge between two locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Path {
    /// Unique path identifier.
    pub id: PathId,
    /// Origin.
    pub from_location_id: LocationId,
    /// Destination.
    pub to_location_id: LocationId,
    /// Travel time in time units.
    pub distance: u32,
}

/// A reachable destination: a [`Path`] together with its target [`Location`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Destination {
    /// The outgoing path.
    pub path: Path,
    /// Where the path leads.
    pub location: Location,
}

/// A travel record. Never updated once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Journey {
    /// Unique journey identifier.
    pub id: JourneyId,
    /// The travelling person.
    pub person_id: PersonId,
    /// Where the journey started.
    pub from_location_id: LocationId,
    /// Where the journey ends.
    pub to_location_id: LocationId,
    /// Absolute arrival time.
    pub arrive_by: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Mobs
// ---------------------------------------------------------------------------

/// A hostile creature seeded by world generation. Read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Mob {
    /// Unique mob identifier.
    pub id: MobId,
    /// Health.
    pub hp: i32,
    /// Experience granted on defeat.
    pub xp: i32,
    /// Minimum person level the mob is intended for.
    pub req_level: i32,
    /// Damage kind.
    pub attack_type: AttackType,
    /// Damage per hit.
    pub attack: i32,
    /// Physical armour.
    pub armour: i32,
    /// Magic armour.
    pub magic_armour: i32,
}
