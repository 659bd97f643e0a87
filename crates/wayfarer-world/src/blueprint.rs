//! Id-free descriptions of a generated world.
//!
//! Keys are assigned by the database on insert, so cross-references between
//! specs are positions in the blueprint's vectors. Location index `0` becomes
//! the lowest location id, which is where new characters spawn.

use serde::Serialize;
use wayfarer_types::{AttackType, ItemType, LocationType, StatBonus};

/// A location to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocationSpec {
    /// Grid x coordinate.
    pub x: i32,
    /// Grid y coordinate.
    pub y: i32,
    /// Town or dungeon.
    pub location_type: LocationType,
}

/// A mob to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MobSpec {
    /// Health.
    pub hp: i32,
    /// Experience granted on defeat.
    pub xp: i32,
    /// Intended person level.
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

/// A catalog item to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemSpec {
    /// Buy price.
    pub cost: u64,
    /// Sell price.
    pub cost_to_sale: u64,
    /// Equipment slot.
    pub item_type: ItemType,
    /// Bonuses while worn.
    pub bonus: StatBonus,
    /// Minimum level to buy.
    pub req_level: i32,
}

/// A shop listing, by position in [`WorldBlueprint::locations`] and
/// [`WorldBlueprint::items`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListingSpec {
    /// Index of the town.
    pub location: usize,
    /// Index of the item.
    pub item: usize,
}

/// A directed path, by position in [`WorldBlueprint::locations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PathSpec {
    /// Index of the origin.
    pub from: usize,
    /// Index of the destination.
    pub to: usize,
    /// Manhattan distance between the two.
    pub distance: u32,
}

/// Everything world generation produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorldBlueprint {
    /// Locations in insertion order.
    pub locations: Vec<LocationSpec>,
    /// Mobs in insertion order.
    pub mobs: Vec<MobSpec>,
    /// Items in insertion order.
    pub items: Vec<ItemSpec>,
    /// Shop listings.
    pub listings: Vec<ListingSpec>,
    /// Directed paths.
    pub paths: Vec<PathSpec>,
}

impl WorldBlueprint {
    /// Number of locations of the given type.
    pub fn count_locations(&self, location_type: LocationType) -> usize {
        self.locations
            .iter()
            .filter(|l| l.location_type == location_type)
            .count()
    }
}
