//! Character creation rules.

use wayfarer_types::{Item, ItemType};

use crate::error::GameError;

/// Longest accepted nickname, in characters.
pub const MAX_NICKNAME_LEN: usize = 256;

/// Longest accepted external identity, in bytes.
pub const MAX_EXTERNAL_ID_LEN: usize = 128;

/// Check a nickname: 1 to 256 ASCII letters or digits.
///
/// # Errors
///
/// Returns [`GameError::InvalidNickname`] describing the problem.
pub fn validate_nickname(nickname: &str) -> Result<(), GameError> {
    if nickname.is_empty() {
        return Err(GameError::InvalidNickname(String::from("must not be empty")));
    }
    if nickname.len() > MAX_NICKNAME_LEN {
        return Err(GameError::InvalidNickname(format!(
            "must be at most {MAX_NICKNAME_LEN} characters"
        )));
    }
    if !nickname.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(GameError::InvalidNickname(String::from(
            "may only contain letters and digits",
        )));
    }
    Ok(())
}

/// Check an external identity: non-empty, at most 128 bytes.
///
/// # Errors
///
/// Returns [`GameError::InvalidExternalId`] describing the problem.
pub fn validate_external_id(external_id: &str) -> Result<(), GameError> {
    if external_id.trim().is_empty() {
        return Err(GameError::InvalidExternalId(String::from("must not be empty")));
    }
    if external_id.len() > MAX_EXTERNAL_ID_LEN {
        return Err(GameError::InvalidExternalId(format!(
            "must be at most {MAX_EXTERNAL_ID_LEN} bytes"
        )));
    }
    Ok(())
}

/// Pick the starter weapon: the weakest level-1 weapon, lowest id on ties.
///
/// # Errors
///
/// Returns [`GameError::WorldNotSeeded`] if the catalog has no level-1 weapon.
pub fn starter_weapon(catalog: &[Item]) -> Result<&Item, GameError> {
    catalog
        .iter()
        .filter(|item| item.item_type == ItemType::Weapon && item.req_level == 1)
        .min_by_key(|item| (item.bonus.attack, item.id))
        .ok_or(GameError::WorldNotSeeded("no level 1 weapon"))
}

#[cfg(test)]
mod tests {
    use wayfarer_types::{ItemId, StatBonus};

    use super::*;

    fn item(id: i64, item_type: ItemType, req_level: i32, attack: i32) -> Item {
        Item {
            id: ItemId(id),
            cost: 50,
            cost_to_sale: 40,
            item_type,
            bonus: StatBonus {
                attack,
                ..StatBonus::default()
            },
            req_level,
        }
    }

    #[test]
    fn nickname_rules() {
        assert!(validate_nickname("Alice42").is_ok());
        assert!(validate_nickname("").is_err());
        assert!(validate_nickname("two words").is_err());
        assert!(validate_nickname("émile").is_err());
        assert!(validate_nickname(&"a".repeat(256)).is_ok());
        assert!(validate_nickname(&"a".repeat(257)).is_err());
    }

    #[test]
    fn external_id_rules() {
        assert!(validate_external_id("tg:12345").is_ok());
        assert!(validate_external_id("   ").is_err());
        assert!(validate_external_id(&"x".repeat(129)).is_err());
    }

    #[test]
    fn starter_weapon_is_weakest_level_one_weapon() {
        let catalog = vec![
            item(1, ItemType::Weapon, 1, 14),
            item(2, ItemType::Armor, 1, 0),
            item(3, ItemType::Weapon, 2, 5),
            item(4, ItemType::Weapon, 1, 11),
            item(5, ItemType::Weapon, 1, 11),
        ];
        let weapon = starter_weapon(&catalog);
        assert_eq!(weapon.map(|w| w.id), Ok(ItemId(4)));
    }

    #[test]
    fn starter_weapon_requires_seeded_catalog() {
        let catalog = vec![item(1, ItemType::Potion, 1, 0)];
        assert!(matches!(
            starter_weapon(&catalog),
            Err(GameError::WorldNotSeeded(_))
        ));
    }
}
