//! Slot exclusivity rules for equipping items.
//!
//! Every non-potion item type is a slot: a person wears at most one weapon,
//! one armor, and so on. Potions are passive buffs and never conflict.
//! Equipping into an occupied slot takes the occupant off first; the data
//! layer applies both flag changes in one transaction so no observer ever
//! sees two items worn in the same slot.

use tracing::error;
use wayfarer_types::{OwnedItem, PersonItemId};

use crate::error::GameError;

/// The worn-flag changes needed to equip an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipPlan {
    /// Item currently occupying the slot, to be unequipped first.
    pub take_off: Option<PersonItemId>,
    /// Item to mark worn.
    pub put_on: PersonItemId,
}

/// Plan equipping `target` given everything the person currently wears.
///
/// # Errors
///
/// Returns [`GameError::NotOwned`] if `target` is `None`,
/// [`GameError::AlreadyWorn`] if it is already equipped, and
/// [`GameError::IntegrityViolation`] if the slot already holds more than one
/// worn item.
pub fn plan_equip(target: Option<&OwnedItem>, worn: &[OwnedItem]) -> Result<EquipPlan, GameError> {
    let target = target.ok_or(GameError::NotOwned)?;
    if target.holding.worn {
        return Err(GameError::AlreadyWorn);
    }

    let slot = target.item.item_type;
    if !slot.occupies_slot() {
        return Ok(EquipPlan {
            take_off: None,
            put_on: target.holding.id,
        });
    }

    let occupants: Vec<PersonItemId> = worn
        .iter()
        .filter(|o| o.holding.worn && o.item.item_type == slot)
        .map(|o| o.holding.id)
        .collect();
    debug_assert!(occupants.len() <= 1, "more than one worn {slot}");
    if occupants.len() > 1 {
        error!(
            person_id = %target.holding.person_id,
            item_type = %slot,
            worn = occupants.len(),
            "Multiple worn items in one slot"
        );
        return Err(GameError::IntegrityViolation(format!(
            "person {} wears more than one {slot}",
            target.holding.person_id
        )));
    }

    Ok(EquipPlan {
        take_off: occupants.first().copied(),
        put_on: target.holding.id,
    })
}

/// Check that `target` can be unequipped and return its edge id.
///
/// # Errors
///
/// Returns [`GameError::NotOwned`] if `target` is `None` and
/// [`GameError::NotWorn`] if it is not equipped.
pub fn plan_unequip(target: Option<&OwnedItem>) -> Result<PersonItemId, GameError> {
    let target = target.ok_or(GameError::NotOwned)?;
    if target.holding.worn {
        Ok(target.holding.id)
    } else {
        Err(GameError::NotWorn)
    }
}

#[cfg(test)]
mod tests {
    use wayfarer_types::{Item, ItemId, ItemType, PersonId, PersonItem, StatBonus};

    use super::*;

    fn owned(edge: i64, item_type: ItemType, worn: bool) -> OwnedItem {
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
                bonus: StatBonus::default(),
                req_level: 1,
            },
        }
    }

    #[test]
    fn equip_into_empty_slot() {
        let sword = owned(1, ItemType::Weapon, false);
        let helmet = owned(2, ItemType::Helmet, true);
        let plan = plan_equip(Some(&sword), &[helmet]);
        assert_eq!(
            plan,
            Ok(EquipPlan {
                take_off: None,
                put_on: PersonItemId(1),
            })
        );
    }

    #[test]
    fn equip_replaces_occupant_of_same_slot() {
        let old = owned(1, ItemType::Weapon, true);
        let new = owned(2, ItemType::Weapon, false);
        let plan = plan_equip(Some(&new), &[old]);
        assert_eq!(
            plan,
            Ok(EquipPlan {
                take_off: Some(PersonItemId(1)),
                put_on: PersonItemId(2),
            })
        );
    }

    #[test]
    fn potions_never_displace_anything() {
        let worn_potion = owned(1, ItemType::Potion, true);
        let sword = owned(2, ItemType::Weapon, true);
        let potion = owned(3, ItemType::Potion, false);
        let plan = plan_equip(Some(&potion), &[worn_potion, sword]);
        assert_eq!(
            plan,
            Ok(EquipPlan {
                take_off: None,
                put_on: PersonItemId(3),
            })
        );
    }

    #[test]
    fn equip_rejects_unowned_and_worn() {
        assert_eq!(plan_equip(None, &[]), Err(GameError::NotOwned));
        let sword = owned(1, ItemType::Weapon, true);
        assert_eq!(
            plan_equip(Some(&sword), std::slice::from_ref(&sword)),
            Err(GameError::AlreadyWorn)
        );
    }

    #[test]
    fn unequip_requires_worn_item() {
        assert_eq!(plan_unequip(None), Err(GameError::NotOwned));
        let off = owned(1, ItemType::Boots, false);
        assert_eq!(plan_unequip(Some(&off)), Err(GameError::NotWorn));
        let on = owned(2, ItemType::Boots, true);
        assert_eq!(plan_unequip(Some(&on)), Ok(PersonItemId(2)));
    }
}
