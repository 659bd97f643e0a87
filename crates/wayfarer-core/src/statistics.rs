//! Base plus equipment stat breakdown.

use serde::Serialize;
use wayfarer_types::{Location, OwnedItem, Person, StatBonus};

/// A person's stats split into base values and worn-item bonuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonStatistics {
    /// The person as stored.
    pub person: Person,
    /// Where the person currently is.
    pub location: Location,
    /// Sum of bonuses from every worn item.
    pub bonus: StatBonus,
    /// Base stats plus bonuses.
    pub effective: EffectiveStats,
}

/// Stats after applying equipment bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectiveStats {
    /// Health.
    pub hp: i32,
    /// Magic pool.
    pub magic: i32,
    /// Physical attack.
    pub attack: i32,
    /// Magic attack.
    pub magic_attack: i32,
    /// Physical armour.
    pub armour: i32,
    /// Magic armour.
    pub magic_armour: i32,
}

/// Sum the bonuses of all worn items. Unworn holdings are ignored.
pub fn worn_bonus(items: &[OwnedItem]) -> StatBonus {
    items
        .iter()
        .filter(|o| o.holding.worn)
        .fold(StatBonus::default(), |acc, o| StatBonus {
            hp: acc.hp.saturating_add(o.item.bonus.hp),
            mana: acc.mana.saturating_add(o.item.bonus.mana),
            attack: acc.attack.saturating_add(o.item.bonus.attack),
            magic_attack: acc.magic_attack.saturating_add(o.item.bonus.magic_attack),
            armour: acc.armour.saturating_add(o.item.bonus.armour),
            magic_armour: acc.magic_armour.saturating_add(o.item.bonus.magic_armour),
        })
}

impl PersonStatistics {
    /// Build the breakdown for `person` standing at `location` with `items`.
    pub fn compute(person: Person, location: Location, items: &[OwnedItem]) -> Self {
        let bonus = worn_bonus(items);
        let effective = EffectiveStats {
            hp: person.hp.saturating_add(bonus.hp),
            magic: person.magic.saturating_add(bonus.mana),
            attack: person.attack.saturating_add(bonus.attack),
            magic_attack: person.magic_attack.saturating_add(bonus.magic_attack),
            armour: person.armour.saturating_add(bonus.armour),
            magic_armour: person.magic_armour.saturating_add(bonus.magic_armour),
        };
        Self {
            person,
            location,
            bonus,
            effective,
        }
    }
}

#[cfg(test)]
mod tests {
    use wayfarer_types::{
        Item, ItemId, ItemType, LocationId, LocationType, PersonId, PersonItem, PersonItemId,
    };

    use super::*;

    fn person() -> Person {
        Person {
            id: PersonId(1),
            nickname: String::from("alice"),
            external_id: String::from("ext-1"),
            level: 1,
            hp: 80,
            money: 250,
            attack: 50,
            magic: 50,
            magic_attack: 50,
            armour: 0,
            magic_armour: 0,
            xp: 0,
            location_id: LocationId(1),
        }
    }

    fn location() -> Location {
        Location {
            id: LocationId(1),
            x: 4,
            y: 7,
            location_type: LocationType::Town,
        }
    }

    fn owned(edge: i64, item_type: ItemType, bonus: StatBonus, worn: bool) -> OwnedItem {
        OwnedItem {
            holding: PersonItem {
                id: PersonItemId(edge),
                person_id: PersonId(1),
                item_id: ItemId(edge),
                quantity: 1,
                worn,
            },
            item: Item {
                id: ItemId(edge),
                cost: 50,
                cost_to_sale: 40,
                item_type,
                bonus,
                req_level: 1,
            },
        }
    }

    #[test]
    fn only_worn_items_contribute() {
        let sword = owned(
            1,
            ItemType::Weapon,
            StatBonus {
                attack: 12,
                ..StatBonus::default()
            },
            true,
        );
        let potion = owned(
            2,
            ItemType::Potion,
            StatBonus {
                hp: 10,
                mana: 10,
                ..StatBonus::default()
            },
            true,
        );
        let spare = owned(
            3,
            ItemType::Armor,
            StatBonus {
                armour: 8,
                ..StatBonus::default()
            },
            false,
        );

        let stats = PersonStatistics::compute(person(), location(), &[sword, potion, spare]);
        assert_eq!(stats.bonus.attack, 12);
        assert_eq!(stats.bonus.armour, 0);
        assert_eq!(stats.effective.attack, 62);
        assert_eq!(stats.effective.hp, 90);
        assert_eq!(stats.effective.magic, 60);
        assert_eq!(stats.effective.armour, 0);
        assert_eq!(stats.location.x, 4);
    }

    #[test]
    fn no_items_means_base_stats() {
        let stats = PersonStatistics::compute(person(), location(), &[]);
        assert_eq!(stats.bonus, StatBonus::default());
        assert_eq!(stats.effective.magic_attack, 50);
    }
}
