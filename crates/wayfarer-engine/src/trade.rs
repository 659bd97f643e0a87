//! Buying and selling at the local shop.
//!
//! Both directions run the same sequence under the person row lock: validate
//! the request into a [`Transfer`], settle it against the locked balance and
//! holding, then write the new balance and holding in the same transaction.
//! Two racing purchases therefore see each other's debit and the second is
//! refused instead of overdrawing.

use serde::Serialize;
use sqlx::PgConnection;
use tracing::{debug, info};
use wayfarer_core::economy;
use wayfarer_db::{catalog_store, inventory_store, person_store};
use wayfarer_ledger::Transfer;
use wayfarer_types::{Item, ItemId, OwnedItem, Person, PersonId};

use crate::error::EngineError;
use crate::game::{Game, load_location};

/// Outcome of a completed buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TradeReceipt {
    /// The traded item.
    pub item_id: ItemId,
    /// What moved.
    pub transfer: Transfer,
    /// Balance after the trade.
    pub balance: u64,
    /// Units of the item held after the trade; zero once sold out.
    pub quantity: u32,
}

impl Game {
    /// Items the local shop sells that the character's level allows.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoShopHere`](wayfarer_core::GameError::NoShopHere)
    /// outside towns.
    pub async fn shop_stock(&self, person_id: PersonId) -> Result<Vec<Item>, EngineError> {
        self.retrying(move || async move {
            let mut tx = self.db.begin().await?;
            let person = self.enter(&mut tx, person_id).await?;
            let location = load_location(&mut tx, person.location_id).await?;
            economy::ensure_shop(&location)?;
            let listed = catalog_store::shop_items(&mut tx, location.id).await?;
            tx.commit().await?;

            let stock = economy::visible_stock(&person, listed);
            debug!(person_id = %person_id, location_id = %location.id, count = stock.len(), "Shop stock listed");
            Ok(stock)
        })
        .await
    }

    /// Buy `quantity` units of an item listed at the local shop.
    ///
    /// # Errors
    ///
    /// Refused with `NoShopHere`, `InvalidQuantity`, `ItemNotAvailable` or
    /// `InsufficientFunds`; no state changes on refusal.
    pub async fn buy(
        &self,
        person_id: PersonId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<TradeReceipt, EngineError> {
        self.retrying(move || async move {
            let mut tx = self.db.begin().await?;
            let person = self.enter(&mut tx, person_id).await?;
            let location = load_location(&mut tx, person.location_id).await?;
            let listed = catalog_store::listed_item(&mut tx, location.id, item_id).await?;
            let transfer = economy::purchase(&person, &location, listed.as_ref(), quantity)?;
            let owned = inventory_store::owned_item(&mut tx, person_id, item_id).await?;

            let receipt = settle(&mut tx, &person, item_id, transfer, owned).await?;
            tx.commit().await?;

            info!(
                person_id = %person_id,
                item_id = %item_id,
                quantity,
                debit = transfer.amount(),
                balance = receipt.balance,
                "Item bought"
            );
            Ok(receipt)
        })
        .await
    }

    /// Sell `quantity` owned units at the local shop.
    ///
    /// # Errors
    ///
    /// Refused with `NoShopHere`, `InvalidQuantity`, `NotOwned` or
    /// `InsufficientQuantity`; no state changes on refusal.
    pub async fn sell(
        &self,
        person_id: PersonId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<TradeReceipt, EngineError> {
        self.retrying(move || async move {
            let mut tx = self.db.begin().await?;
            let person = self.enter(&mut tx, person_id).await?;
            let location = load_location(&mut tx, person.location_id).await?;
            let owned = inventory_store::owned_item(&mut tx, person_id, item_id).await?;
            let transfer = economy::sale(&location, owned.as_ref(), quantity)?;

            let receipt = settle(&mut tx, &person, item_id, transfer, owned).await?;
            tx.commit().await?;

            info!(
                person_id = %person_id,
                item_id = %item_id,
                quantity,
                credit = transfer.amount(),
                balance = receipt.balance,
                "Item sold"
            );
            Ok(receipt)
        })
        .await
    }
}

/// Settle `transfer` against the locked balance and holding and write both
/// results.
async fn settle(
    conn: &mut PgConnection,
    person: &Person,
    item_id: ItemId,
    transfer: Transfer,
    owned: Option<OwnedItem>,
) -> Result<TradeReceipt, EngineError> {
    let holding = owned.map(|o| o.holding);
    let settlement = transfer.settle(person.money, holding.map(|h| h.quantity))?;

    person_store::set_money(conn, person.id, settlement.balance).await?;
    inventory_store::apply_holding_change(conn, person.id, item_id, holding, settlement.holding)
        .await?;

    Ok(TradeReceipt {
        item_id,
        transfer,
        balance: settlement.balance,
        quantity: settlement.holding.quantity_after(),
    })
}
