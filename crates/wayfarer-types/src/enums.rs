//! Enumeration types for the Wayfarer game.
//!
//! Each enum is stored in `PostgreSQL` as a lowercase `TEXT` value guarded by
//! a `CHECK` constraint. [`as_str`](LocationType::as_str) and
//! [`FromStr`](core::str::FromStr) convert between the two representations.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A stored enum value did not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    /// The enum being parsed.
    pub kind: &'static str,
    /// The offending value.
    pub value: String,
}

// ---------------------------------------------------------------------------
// Location types
// ---------------------------------------------------------------------------

/// The kind of place a location is.
///
/// Shops exist only in towns, and arriving in a town heals a person to full
/// health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LocationType {
    /// A settlement with a shop.
    Town,
    /// A hostile area without a shop.
    Dungeon,
}

impl LocationType {
    /// Every location type, in generation order.
    pub const ALL: [Self; 2] = [Self::Town, Self::Dungeon];

    /// Return the database representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Town => "town",
            Self::Dungeon => "dungeon",
        }
    }

    /// Whether a shop can operate at this kind of location.
    pub const fn has_shop(self) -> bool {
        matches!(self, Self::Town)
    }
}

impl FromStr for LocationType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "town" => Ok(Self::Town),
            "dungeon" => Ok(Self::Dungeon),
            other => Err(UnknownVariant {
                kind: "location_type",
                value: other.to_owned(),
            }),
        }
    }
}

impl core::fmt::Display for LocationType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Item types
// ---------------------------------------------------------------------------

/// The equipment slot an item occupies.
///
/// A person can wear at most one item per slot, except [`ItemType::Potion`]
/// which is exempt from slot exclusivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ItemType {
    /// Held weapon.
    Weapon,
    /// Body armor.
    Armor,
    /// Head protection.
    Helmet,
    /// Footwear.
    Boots,
    /// Arm protection.
    Bracers,
    /// Consumable buff; any number may be worn at once.
    Potion,
}

impl ItemType {
    /// Every item type, in catalog order.
    pub const ALL: [Self; 6] = [
        Self::Weapon,
        Self::Armor,
        Self::Helmet,
        Self::Boots,
        Self::Bracers,
        Self::Potion,
    ];

    /// Return the database representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Helmet => "helmet",
            Self::Boots => "boots",
            Self::Bracers => "bracers",
            Self::Potion => "potion",
        }
    }

    /// Whether wearing this item excludes other worn items of the same type.
    pub const fn occupies_slot(self) -> bool {
        !matches!(self, Self::Potion)
    }
}

impl FromStr for ItemType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "item_type",
                value: s.to_owned(),
            })
    }
}

impl core::fmt::Display for ItemType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Attack types
// ---------------------------------------------------------------------------

/// How a mob deals damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AttackType {
    /// Mitigated by armour.
    Physical,
    /// Mitigated by magic armour.
    Magical,
}

impl AttackType {
    /// Every attack type.
    pub const ALL: [Self; 2] = [Self::Physical, Self::Magical];

    /// Return the database representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Magical => "magical",
        }
    }
}

impl FromStr for AttackType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "physical" => Ok(Self::Physical),
            "magical" => Ok(Self::Magical),
            other => Err(UnknownVariant {
                kind: "attack_type",
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_db_strings_roundtrip() {
        for item_type in ItemType::ALL {
            assert_eq!(item_type.as_str().parse::<ItemType>().ok(), Some(item_type));
        }
    }

    #[test]
    fn unknown_item_type_is_rejected() {
        let err = "shield".parse::<ItemType>().err();
        assert!(matches!(err, Some(UnknownVariant { kind: "item_type", .. })));
    }

    #[test]
    fn only_potions_skip_slots() {
        assert!(!ItemType::Potion.occupies_slot());
        assert!(ItemType::Weapon.occupies_slot());
        assert!(ItemType::Bracers.occupies_slot());
    }

    #[test]
    fn only_towns_have_shops() {
        assert!(LocationType::Town.has_shop());
        assert!(!LocationType::Dungeon.has_shop());
        assert_eq!("dungeon".parse::<LocationType>().ok(), Some(LocationType::Dungeon));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&AttackType::Magical).ok();
        assert_eq!(json.as_deref(), Some("\"magical\""));
    }
}
