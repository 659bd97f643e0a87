//! Inventory views and equipping.

use tracing::{debug, error, info};
use wayfarer_core::{GameError, equipment};
use wayfarer_db::inventory_store;
use wayfarer_types::{ItemId, OwnedItem, PersonId, PersonItemId};

use crate::error::EngineError;
use crate::game::Game;

impl Game {
    /// Everything the character owns, or only what they wear.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PersonNotFound`] for an unknown id and
    /// [`GameError::AlreadyTravelling`] while on the road.
    pub async fn inventory(
        &self,
        person_id: PersonId,
        only_worn: bool,
    ) -> Result<Vec<OwnedItem>, EngineError> {
        self.retrying(move || async move {
            let mut tx = self.db.begin().await?;
            self.enter(&mut tx, person_id).await?;
            let items = inventory_store::owned_items(&mut tx, person_id, only_worn).await?;
            tx.commit().await?;
            debug!(person_id = %person_id, only_worn, count = items.len(), "Inventory listed");
            Ok(items)
        })
        .await
    }

    /// One owned item with its full catalog entry.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotOwned`] if the character does not hold it.
    pub async fn owned_item(
        &self,
        person_id: PersonId,
        item_id: ItemId,
    ) -> Result<OwnedItem, EngineError> {
        self.retrying(move || async move {
            let mut tx = self.db.begin().await?;
            self.enter(&mut tx, person_id).await?;
            let owned = inventory_store::owned_item(&mut tx, person_id, item_id)
                .await?
                .ok_or(GameError::NotOwned)?;
            tx.commit().await?;
            Ok(owned)
        })
        .await
    }

    /// Wear an owned item, taking off whatever occupied its slot.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotOwned`], [`GameError::AlreadyWorn`], or
    /// [`GameError::IntegrityViolation`] if the slot was already overfull.
    pub async fn equip(&self, person_id: PersonId, item_id: ItemId) -> Result<(), EngineError> {
        self.retrying(move || self.equip_once(person_id, item_id))
            .await
    }

    async fn equip_once(&self, person_id: PersonId, item_id: ItemId) -> Result<(), EngineError> {
        let mut tx = self.db.begin().await?;
        self.enter(&mut tx, person_id).await?;

        let target = inventory_store::owned_item(&mut tx, person_id, item_id).await?;
        let worn = inventory_store::owned_items(&mut tx, person_id, true).await?;
        let plan = equipment::plan_equip(target.as_ref(), &worn)?;

        if let Some(previous) = plan.take_off {
            let updated = inventory_store::set_worn(&mut tx, previous, false).await?;
            ensure_updated(updated, previous)?;
        }
        let updated = inventory_store::set_worn(&mut tx, plan.put_on, true).await?;
        ensure_updated(updated, plan.put_on)?;
        tx.commit().await?;

        info!(
            person_id = %person_id,
            item_id = %item_id,
            replaced = ?plan.take_off,
            "Item equipped"
        );
        Ok(())
    }

    /// Take off a worn item.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotOwned`] or [`GameError::NotWorn`].
    pub async fn unequip(&self, person_id: PersonId, item_id: ItemId) -> Result<(), EngineError> {
        self.retrying(move || async move {
            let mut tx = self.db.begin().await?;
            self.enter(&mut tx, person_id).await?;

            let target = inventory_store::owned_item(&mut tx, person_id, item_id).await?;
            let holding = equipment::plan_unequip(target.as_ref())?;
            let updated = inventory_store::set_worn(&mut tx, holding, false).await?;
            ensure_updated(updated, holding)?;
            tx.commit().await?;

            info!(person_id = %person_id, item_id = %item_id, "Item unequipped");
            Ok(())
        })
        .await
    }
}

/// A holding read under the person lock must still exist when its worn flag
/// is written.
fn ensure_updated(updated: bool, holding: PersonItemId) -> Result<(), GameError> {
    if updated {
        Ok(())
    } else {
        error!(holding_id = %holding, "Worn flag update matched no row");
        Err(GameError::IntegrityViolation(format!(
            "holding {holding} disappeared while its owner was locked"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_flag_passes() {
        assert_eq!(ensure_updated(true, PersonItemId(4)), Ok(()));
    }

    #[test]
    fn missing_row_is_an_integrity_violation() {
        let err = ensure_updated(false, PersonItemId(4));
        assert!(err.as_ref().is_err_and(GameError::is_integrity_violation));
        assert_eq!(
            err,
            Err(GameError::IntegrityViolation(String::from(
                "holding 4 disappeared while its owner was locked"
            )))
        );
    }
}
