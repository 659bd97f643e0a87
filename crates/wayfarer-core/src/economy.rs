//! Shop rules for buying, selling and stock listing.
//!
//! Shops exist only in towns and carry unlimited stock of the items listed at
//! their location. A person may buy a listed item if their level meets the
//! item's requirement, and may sell back anything they own at the item's
//! sale price, regardless of whether this shop lists it.
//!
//! These functions validate a request and produce a [`Transfer`]. Checking
//! the transfer against the live balance happens in [`Transfer::settle`],
//! under the person row lock held by the caller.

use wayfarer_ledger::Transfer;
use wayfarer_types::{Item, Location, OwnedItem, Person};

use crate::error::GameError;

/// Reject shop actions outside towns.
///
/// # Errors
///
/// Returns [`GameError::NoShopHere`] if the location has no shop.
pub const fn ensure_shop(location: &Location) -> Result<(), GameError> {
    if location.location_type.has_shop() {
        Ok(())
    } else {
        Err(GameError::NoShopHere {
            location_type: location.location_type,
        })
    }
}

/// Whether a person of `level` may buy `item`.
pub const fn meets_level(level: i32, item: &Item) -> bool {
    level >= item.req_level
}

/// Filter a shop's listed items down to those the person may buy.
pub fn visible_stock(person: &Person, listed: Vec<Item>) -> Vec<Item> {
    listed
        .into_iter()
        .filter(|item| meets_level(person.level, item))
        .collect()
}

/// Validate a purchase of `quantity` units.
///
/// `listed` is the item if the person's current shop lists it.
///
/// # Errors
///
/// Returns [`GameError::NoShopHere`] outside towns,
/// [`GameError::InvalidQuantity`] for zero, and
/// [`GameError::ItemNotAvailable`] if the item is not listed here or the
/// person's level is too low.
pub fn purchase(
    person: &Person,
    location: &Location,
    listed: Option<&Item>,
    quantity: u32,
) -> Result<Transfer, GameError> {
    ensure_shop(location)?;
    if quantity == 0 {
        return Err(GameError::InvalidQuantity);
    }
    let item = listed
        .filter(|item| meets_level(person.level, item))
        .ok_or(GameError::ItemNotAvailable)?;

    Ok(Transfer::purchase(item.cost, quantity)?)
}

/// Validate a sale of `quantity` units.
///
/// `owned` is the person's holding of the item, if any.
///
/// # Errors
///
/// Returns [`GameError::NoShopHere`] outside towns,
/// [`GameError::InvalidQuantity`] for zero, [`GameError::NotOwned`] if the
/// item is not held, and [`GameError::InsufficientQuantity`] if fewer units
/// are held than requested.
pub fn sale(
    location: &Location,
    owned: Option<&OwnedItem>,
    quantity: u32,
) -> Result<Transfer, GameError> {
    ensure_shop(location)?;
    if quantity == 0 {
        return Err(GameError::InvalidQuantity);
    }
    let owned = owned.ok_or(GameError::NotOwned)?;
    if quantity > owned.holding.quantity {
        return Err(GameError::InsufficientQuantity {
            requested: quantity,
            held: owned.holding.quantity,
        });
    }

    Ok(Transfer::sale(owned.item.cost_to_sale, quantity)?)
}

#[cfg(test)]
mod tests {
    use wayfarer_types::{
        ItemId, ItemType, LocationId, LocationType, PersonId, PersonItem, PersonItemId, StatBonus,
    };

    use super::*;

    fn town() -> Location {
        Location {
            id: LocationId(1),
            x: 0,
            y: 0,
            location_type: LocationType::Town,
        }
    }

    fn dungeon() -> Location {
        Location {
            id: LocationId(2),
            x: 3,
            y: 4,
            location_type: LocationType::Dungeon,
        }
    }

    fn person(level: i32, money: u64) -> Person {
        Person {
            id: PersonId(1),
            nickname: String::from("alice"),
            external_id: String::from("ext-1"),
            level,
            hp: 100,
            money,
            attack: 50,
            magic: 50,
            magic_attack: 50,
            armour: 0,
            magic_armour: 0,
            xp: 0,
            location_id: LocationId(1),
        }
    }

    fn potion(req_level: i32) -> Item {
        Item {
            id: ItemId(10),
            cost: 50,
            cost_to_sale: 40,
            item_type: ItemType::Potion,
            bonus: StatBonus::default(),
            req_level,
        }
    }

    fn owned(quantity: u32) -> OwnedItem {
        OwnedItem {
            holding: PersonItem {
                id: PersonItemId(5),
                person_id: PersonId(1),
                item_id: ItemId(10),
                quantity,
                worn: false,
            },
            item: potion(1),
        }
    }

    #[test]
    fn purchase_in_town_builds_debit() {
        let item = potion(1);
        let transfer = purchase(&person(1, 250), &town(), Some(&item), 2);
        assert_eq!(transfer, Ok(Transfer::Purchase { debit: 100, gain: 2 }));
    }

    #[test]
    fn shop_actions_fail_in_dungeon_regardless_of_item() {
        let item = potion(1);
        let expected = Err(GameError::NoShopHere {
            location_type: LocationType::Dungeon,
        });
        assert_eq!(purchase(&person(1, 250), &dungeon(), Some(&item), 1), expected);
        assert_eq!(purchase(&person(1, 250), &dungeon(), None, 0), expected);
        assert_eq!(sale(&dungeon(), Some(&owned(1)), 1), expected);
        assert_eq!(sale(&dungeon(), None, 1), expected);
        assert_eq!(ensure_shop(&dungeon()), expected.map(|_: Transfer| ()));
    }

    #[test]
    fn purchase_of_unlisted_item_rejected() {
        let result = purchase(&person(1, 250), &town(), None, 1);
        assert_eq!(result, Err(GameError::ItemNotAvailable));
    }

    #[test]
    fn purchase_above_level_rejected() {
        let item = potion(3);
        let result = purchase(&person(2, 1000), &town(), Some(&item), 1);
        assert_eq!(result, Err(GameError::ItemNotAvailable));
    }

    #[test]
    fn zero_quantity_rejected() {
        let item = potion(1);
        assert_eq!(
            purchase(&person(1, 250), &town(), Some(&item), 0),
            Err(GameError::InvalidQuantity)
        );
        assert_eq!(sale(&town(), Some(&owned(1)), 0), Err(GameError::InvalidQuantity));
    }

    #[test]
    fn sale_builds_credit_at_sale_price() {
        let transfer = sale(&town(), Some(&owned(2)), 1);
        assert_eq!(transfer, Ok(Transfer::Sale { credit: 40, loss: 1 }));
    }

    #[test]
    fn sale_of_unowned_item_rejected() {
        assert_eq!(sale(&town(), None, 1), Err(GameError::NotOwned));
    }

    #[test]
    fn sale_beyond_holding_rejected() {
        assert_eq!(
            sale(&town(), Some(&owned(2)), 3),
            Err(GameError::InsufficientQuantity {
                requested: 3,
                held: 2,
            })
        );
    }

    #[test]
    fn visible_stock_hides_high_level_items() {
        let stock = visible_stock(&person(2, 0), vec![potion(1), potion(2), potion(3)]);
        let levels: Vec<i32> = stock.iter().map(|i| i.req_level).collect();
        assert_eq!(levels, vec![1, 2]);
    }
}
