//! Row structs for every table and their conversions into domain types.
//!
//! Enums are stored as `TEXT` and money and quantities as `BIGINT`. A row
//! that fails conversion (unknown enum text, negative money, zero quantity)
//! is reported as [`DbError::Corrupt`] instead of being silently clamped.

use chrono::{DateTime, Utc};
use wayfarer_types::{
    AttackType, Destination, Item, ItemId, ItemInLocation, ItemInLocationId, ItemType, Journey, JourneyId, Location, LocationId,
    LocationType, Mob, MobId, OwnedItem, Path, PathId, Person, PersonId, PersonItem,
    PersonItemId, StatBonus,
};

use crate::entity::Entity;
use crate::error::DbError;

/// Convert a domain amount into a `BIGINT` parameter.
pub(crate) fn to_bigint(value: u64, column: &'static str) -> Result<i64, DbError> {
    i64::try_from(value).ok().ok_or(DbError::OutOfRange(column))
}

fn money(value: i64, table: &'static str) -> Result<u64, DbError> {
    u64::try_from(value).map_err(|e| DbError::corrupt(table, format!("amount {value}: {e}")))
}

fn quantity(value: i64) -> Result<u32, DbError> {
    match u32::try_from(value) {
        Ok(q) if q > 0 => Ok(q),
        _ => Err(DbError::corrupt("person_item", format!("quantity {value}"))),
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A row from the `location` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LocationRow {
    /// Location id.
    pub id: i64,
    /// Grid x.
    pub x: i32,
    /// Grid y.
    pub y: i32,
    /// `town` or `dungeon`.
    pub location_type: String,
}

impl Entity for LocationRow {
    const TABLE: &'static str = "location";
    const COLUMNS: &'static str = "id, x, y, location_type";
    type Model = Location;
}

impl TryFrom<LocationRow> for Location {
    type Error = DbError;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: LocationId(row.id),
            x: row.x,
            y: row.y,
            location_type: row
                .location_type
                .parse::<LocationType>()
                .map_err(|e| DbError::corrupt("location", e))?,
        })
    }
}

// ---------------------------------------------------------------------------
// Person
// ---------------------------------------------------------------------------

/// A row from the `person` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PersonRow {
    /// Person id.
    pub id: i64,
    /// Display name.
    pub nickname: String,
    /// External identity.
    pub external_id: String,
    /// Level.
    pub level: i32,
    /// Health.
    pub hp: i32,
    /// Balance.
    pub money: i64,
    /// Physical attack.
    pub attack: i32,
    /// Magic pool.
    pub magic: i32,
    /// Magic attack.
    pub magic_attack: i32,
    /// Physical armour.
    pub armour: i32,
    /// Magic armour.
    pub magic_armour: i32,
    /// Experience.
    pub xp: i32,
    /// Current location.
    pub location_id: i64,
}

impl Entity for PersonRow {
    const TABLE: &'static str = "person";
    const COLUMNS: &'static str = "id, nickname, external_id, level, hp, money, attack, magic, \
                                   magic_attack, armour, magic_armour, xp, location_id";
    type Model = Person;
}

impl TryFrom<PersonRow> for Person {
    type Error = DbError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PersonId(row.id),
            nickname: row.nickname,
            external_id: row.external_id,
            level: row.level,
            hp: row.hp,
            money: money(row.money, "person")?,
            attack: row.attack,
            magic: row.magic,
            magic_attack: row.magic_attack,
            armour: row.armour,
            magic_armour: row.magic_armour,
            xp: row.xp,
            location_id: LocationId(row.location_id),
        })
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// A row from the `item` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemRow {
    /// Item id.
    pub id: i64,
    /// Buy price.
    pub cost: i64,
    /// Sell price.
    pub cost_to_sale: i64,
    /// Slot name.
    pub item_type: String,
    /// Health bonus.
    pub hp: i32,
    /// Mana bonus.
    pub mana: i32,
    /// Attack bonus.
    pub attack: i32,
    /// Magic attack bonus.
    pub magic_attack: i32,
    /// Armour bonus.
    pub armour: i32,
    /// Magic armour bonus.
    pub magic_armour: i32,
    /// Required level.
    pub req_level: i32,
}

impl Entity for ItemRow {
    const TABLE: &'static str = "item";
    const COLUMNS: &'static str = "id, cost, cost_to_sale, item_type, hp, mana, attack, \
                                   magic_attack, armour, magic_armour, req_level";
    type Model = Item;
}

impl TryFrom<ItemRow> for Item {
    type Error = DbError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ItemId(row.id),
            cost: money(row.cost, "item")?,
            cost_to_sale: money(row.cost_to_sale, "item")?,
            item_type: row
                .item_type
                .parse::<ItemType>()
                .map_err(|e| DbError::corrupt("item", e))?,
            bonus: StatBonus {
                hp: row.hp,
                mana: row.mana,
                attack: row.attack,
                magic_attack: row.magic_attack,
                armour: row.armour,
                magic_armour: row.magic_armour,
            },
            req_level: row.req_level,
        })
    }
}

/// A row from the `person_item` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PersonItemRow {
    /// Edge id.
    pub id: i64,
    /// Owner.
    pub person_id: i64,
    /// Owned item.
    pub item_id: i64,
    /// Units held.
    pub quantity: i64,
    /// Equipped flag.
    pub worn: bool,
}

impl Entity for PersonItemRow {
    const TABLE: &'static str = "person_item";
    const COLUMNS: &'static str = "id, person_id, item_id, quantity, worn";
    type Model = PersonItem;
}

impl TryFrom<PersonItemRow> for PersonItem {
    type Error = DbError;

    fn try_from(row: PersonItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PersonItemId(row.id),
            person_id: PersonId(row.person_id),
            item_id: ItemId(row.item_id),
            quantity: quantity(row.quantity)?,
            worn: row.worn,
        })
    }
}

/// A `person_item` row joined with its `item`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnedItemRow {
    /// The ownership edge.
    #[sqlx(flatten)]
    pub holding: PersonItemRow,
    /// The catalog entry.
    #[sqlx(flatten)]
    pub item: JoinedItemRow,
}

/// The `item` half of an [`OwnedItemRow`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JoinedItemRow {
    /// Buy price.
    pub cost: i64,
    /// Sell price.
    pub cost_to_sale: i64,
    /// Slot name.
    pub item_type: String,
    /// Health bonus.
    pub hp: i32,
    /// Mana bonus.
    pub mana: i32,
    /// Attack bonus.
    pub attack: i32,
    /// Magic attack bonus.
    pub magic_attack: i32,
    /// Armour bonus.
    pub armour: i32,
    /// Magic armour bonus.
    pub magic_armour: i32,
    /// Required level.
    pub req_level: i32,
}

impl Entity for OwnedItemRow {
    const TABLE: &'static str = "person_item pi JOIN item i ON i.id = pi.item_id";
    const COLUMNS: &'static str = "pi.id, pi.person_id, pi.item_id, pi.quantity, pi.worn, \
                                   i.cost, i.cost_to_sale, i.item_type, i.hp, i.mana, i.attack, \
                                   i.magic_attack, i.armour, i.magic_armour, i.req_level";
    type Model = OwnedItem;
}

impl TryFrom<OwnedItemRow> for OwnedItem {
    type Error = DbError;

    fn try_from(row: OwnedItemRow) -> Result<Self, Self::Error> {
        let item = ItemRow {
            id: row.holding.item_id,
            cost: row.item.cost,
            cost_to_sale: row.item.cost_to_sale,
            item_type: row.item.item_type,
            hp: row.item.hp,
            mana: row.item.mana,
            attack: row.item.attack,
            magic_attack: row.item.magic_attack,
            armour: row.item.armour,
            magic_armour: row.item.magic_armour,
            req_level: row.item.req_level,
        };
        Ok(Self {
            holding: PersonItem::try_from(row.holding)?,
            item: Item::try_from(item)?,
        })
    }
}

/// A row from the `item_in_location` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemInLocationRow {
    /// Listing id.
    pub id: i64,
    /// Shop location.
    pub location_id: i64,
    /// Listed item.
    pub item_id: i64,
}

impl Entity for ItemInLocationRow {
    const TABLE: &'static str = "item_in_location";
    const COLUMNS: &'static str = "id, location_id, item_id";
    type Model = ItemInLocation;
}

impl TryFrom<ItemInLocationRow> for ItemInLocation {
    type Error = DbError;

    fn try_from(row: ItemInLocationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ItemInLocationId(row.id),
            location_id: LocationId(row.location_id),
            item_id: ItemId(row.item_id),
        })
    }
}

// ---------------------------------------------------------------------------
// Travel
// ---------------------------------------------------------------------------

/// A row from the `path` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PathRow {
    /// Path id.
    pub id: i64,
    /// Origin.
    pub from_location_id: i64,
    /// Destination.
    pub to_location_id: i64,
    /// Travel time units.
    pub distance: i32,
}

impl Entity for PathRow {
    const TABLE: &'static str = "path";
    const COLUMNS: &'static str = "id, from_location_id, to_location_id, distance";
    type Model = Path;
}

impl TryFrom<PathRow> for Path {
    type Error = DbError;

    fn try_from(row: PathRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PathId(row.id),
            from_location_id: LocationId(row.from_location_id),
            to_location_id: LocationId(row.to_location_id),
            distance: u32::try_from(row.distance).map_err(|e| DbError::corrupt("path", e))?,
        })
    }
}

/// A `path` row joined with its destination `location`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DestinationRow {
    /// The path.
    #[sqlx(flatten)]
    pub path: PathRow,
    /// Destination x.
    pub x: i32,
    /// Destination y.
    pub y: i32,
    /// Destination type.
    pub location_type: String,
}

impl Entity for DestinationRow {
    const TABLE: &'static str = "path p JOIN location l ON l.id = p.to_location_id";
    const COLUMNS: &'static str =
        "p.id, p.from_location_id, p.to_location_id, p.distance, l.x, l.y, l.location_type";
    type Model = Destination;
}

impl TryFrom<DestinationRow> for Destination {
    type Error = DbError;

    fn try_from(row: DestinationRow) -> Result<Self, Self::Error> {
        let location = Location::try_from(LocationRow {
            id: row.path.to_location_id,
            x: row.x,
            y: row.y,
            location_type: row.location_type,
        })?;
        Ok(Self {
            path: Path::try_from(row.path)?,
            location,
        })
    }
}

/// A row from the `journey` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JourneyRow {
    /// Journey id.
    pub id: i64,
    /// Traveller.
    pub person_id: i64,
    /// Origin.
    pub from_location_id: i64,
    /// Destination.
    pub to_location_id: i64,
    /// Arrival time.
    pub arrive_by: DateTime<Utc>,
}

impl Entity for JourneyRow {
    const TABLE: &'static str = "journey";
    const COLUMNS: &'static str = "id, person_id, from_location_id, to_location_id, arrive_by";
    type Model = Journey;
}

impl TryFrom<JourneyRow> for Journey {
    type Error = DbError;

    fn try_from(row: JourneyRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: JourneyId(row.id),
            person_id: PersonId(row.person_id),
            from_location_id: LocationId(row.from_location_id),
            to_location_id: LocationId(row.to_location_id),
            arrive_by: row.arrive_by,
        })
    }
}

// ---------------------------------------------------------------------------
// Mob
// ---------------------------------------------------------------------------

/// A row from the `mob` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MobRow {
    /// Mob id.
    pub id: i64,
    /// Health.
    pub hp: i32,
    /// Experience granted.
    pub xp: i32,
    /// Intended level.
    pub req_level: i32,
    /// `physical` or `magical`.
    pub attack_type: String,
    /// Damage.
    pub attack: i32,
    /// Physical armour.
    pub armour: i32,
    /// Magic armour.
    pub magic_armour: i32,
}

impl Entity for MobRow {
    const TABLE: &'static str = "mob";
    const COLUMNS: &'static str = "id, hp, xp, req_level, attack_type, attack, armour, magic_armour";
    type Model = Mob;
}

impl TryFrom<MobRow> for Mob {
    type Error = DbError;

    fn try_from(row: MobRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MobId(row.id),
            hp: row.hp,
            xp: row.xp,
            req_level: row.req_level,
            attack_type: row
                .attack_type
                .parse::<AttackType>()
                .map_err(|e| DbError::corrupt("mob", e))?,
            attack: row.attack,
            armour: row.armour,
            magic_armour: row.magic_armour,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_row(money: i64) -> PersonRow {
        PersonRow {
            id: 1,
            nickname: String::from("alice"),
            external_id: String::from("ext-1"),
            level: 1,
            hp: 100,
            money,
            attack: 50,
            magic: 50,
            magic_attack: 50,
            armour: 0,
            magic_armour: 0,
            xp: 0,
            location_id: 3,
        }
    }

    #[test]
    fn listing_row_converts() {
        let listing = ItemInLocation::try_from(ItemInLocationRow {
            id: 9,
            location_id: 2,
            item_id: 5,
        });
        assert_eq!(
            listing.ok(),
            Some(ItemInLocation {
                id: ItemInLocationId(9),
                location_id: LocationId(2),
                item_id: ItemId(5),
            })
        );
    }

    #[test]
    fn person_row_converts() {
        let person = Person::try_from(person_row(250));
        assert!(person.is_ok());
        let person = person.ok();
        assert_eq!(person.as_ref().map(|p| p.money), Some(250));
        assert_eq!(person.map(|p| p.location_id), Some(LocationId(3)));
    }

    #[test]
    fn negative_money_is_corrupt() {
        let result = Person::try_from(person_row(-1));
        assert!(matches!(result, Err(DbError::Corrupt { table: "person", .. })));
    }

    #[test]
    fn zero_quantity_is_corrupt() {
        let row = PersonItemRow {
            id: 1,
            person_id: 1,
            item_id: 1,
            quantity: 0,
            worn: false,
        };
        assert!(matches!(
            PersonItem::try_from(row),
            Err(DbError::Corrupt { table: "person_item", .. })
        ));
    }

    #[test]
    fn unknown_enum_text_is_corrupt() {
        let row = LocationRow {
            id: 1,
            x: 0,
            y: 0,
            location_type: String::from("castle"),
        };
        assert!(matches!(Location::try_from(row), Err(DbError::Corrupt { .. })));
    }

    #[test]
    fn destination_takes_location_from_path_target() {
        let row = DestinationRow {
            path: PathRow {
                id: 9,
                from_location_id: 1,
                to_location_id: 2,
                distance: 5,
            },
            x: 3,
            y: 2,
            location_type: String::from("dungeon"),
        };
        let destination = Destination::try_from(row).ok();
        assert_eq!(destination.map(|d| d.location.id), Some(LocationId(2)));
    }

    #[test]
    fn big_amounts_do_not_fit_bigint() {
        assert!(matches!(to_bigint(u64::MAX, "money"), Err(DbError::OutOfRange("money"))));
        assert_eq!(to_bigint(250, "money").ok(), Some(250));
    }
}
