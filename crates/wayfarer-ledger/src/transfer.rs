//! Transfer construction and settlement.
//!
//! A [`Transfer`] is validated when it is built (positive quantity, no price
//! overflow) and checked against the current balance and holding when it is
//! settled. Settlement is pure: the caller applies the resulting
//! [`Settlement`] to storage inside one transaction.

use serde::{Deserialize, Serialize};

use crate::LedgerError;

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

/// A paired coin and item movement.
///
/// Only the two legal shapes exist: coins out with items in, or items out
/// with coins in. A same-direction or zero-quantity transfer cannot be
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transfer {
    /// Buying from a shop.
    Purchase {
        /// Coins removed from the balance.
        debit: u64,
        /// Units added to the holding.
        gain: u32,
    },
    /// Selling to a shop.
    Sale {
        /// Coins added to the balance.
        credit: u64,
        /// Units removed from the holding.
        loss: u32,
    },
}

impl Transfer {
    /// Build a purchase of `quantity` units at `unit_price` each.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroQuantity`] if `quantity` is zero.
    /// Returns [`LedgerError::Overflow`] if the total price overflows.
    pub fn purchase(unit_price: u64, quantity: u32) -> Result<Self, LedgerError> {
        let debit = total_price(unit_price, quantity)?;
        Ok(Self::Purchase {
            debit,
            gain: quantity,
        })
    }

    /// Build a sale of `quantity` units at `unit_price` each.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroQuantity`] if `quantity` is zero.
    /// Returns [`LedgerError::Overflow`] if the total price overflows.
    pub fn sale(unit_price: u64, quantity: u32) -> Result<Self, LedgerError> {
        let credit = total_price(unit_price, quantity)?;
        Ok(Self::Sale {
            credit,
            loss: quantity,
        })
    }

    /// Units moved by this transfer.
    pub const fn quantity(&self) -> u32 {
        match *self {
            Self::Purchase { gain, .. } => gain,
            Self::Sale { loss, .. } => loss,
        }
    }

    /// Coins moved by this transfer (always non-negative).
    pub const fn amount(&self) -> u64 {
        match *self {
            Self::Purchase { debit, .. } => debit,
            Self::Sale { credit, .. } => credit,
        }
    }

    /// Apply the transfer to a balance and an optional existing holding.
    ///
    /// `held` is the current quantity of the item, or `None` when no
    /// ownership row exists.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] if a purchase exceeds the
    /// balance, [`LedgerError::NotHeld`] or
    /// [`LedgerError::InsufficientQuantity`] if a sale exceeds the holding,
    /// and [`LedgerError::Overflow`] if a sum overflows.
    pub fn settle(self, balance: u64, held: Option<u32>) -> Result<Settlement, LedgerError> {
        match self {
            Self::Purchase { debit, gain } => {
                let new_balance =
                    balance
                        .checked_sub(debit)
                        .ok_or(LedgerError::InsufficientFunds {
                            required: debit,
                            available: balance,
                        })?;
                let holding = match held {
                    None => HoldingChange::Create { quantity: gain },
                    Some(current) => HoldingChange::Set {
                        quantity: current.checked_add(gain).ok_or(LedgerError::Overflow {
                            context: "holding quantity",
                        })?,
                    },
                };
                Ok(Settlement {
                    balance: new_balance,
                    holding,
                })
            }
            Self::Sale { credit, loss } => {
                let current = held.ok_or(LedgerError::NotHeld)?;
                let remaining =
                    current
                        .checked_sub(loss)
                        .ok_or(LedgerError::InsufficientQuantity {
                            requested: loss,
                            held: current,
                        })?;
                let new_balance = balance.checked_add(credit).ok_or(LedgerError::Overflow {
                    context: "balance",
                })?;
                let holding = if remaining == 0 {
                    HoldingChange::Remove
                } else {
                    HoldingChange::Set {
                        quantity: remaining,
                    }
                };
                Ok(Settlement {
                    balance: new_balance,
                    holding,
                })
            }
        }
    }
}

/// Multiply a unit price by a positive quantity.
fn total_price(unit_price: u64, quantity: u32) -> Result<u64, LedgerError> {
    if quantity == 0 {
        return Err(LedgerError::ZeroQuantity);
    }
    unit_price
        .checked_mul(u64::from(quantity))
        .ok_or(LedgerError::Overflow {
            context: "total price",
        })
}

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

/// What must happen to the ownership row after a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldingChange {
    /// No row existed; insert one (not worn).
    Create {
        /// Units in the new row.
        quantity: u32,
    },
    /// Overwrite the quantity of the existing row.
    Set {
        /// New unit count, always positive.
        quantity: u32,
    },
    /// The last unit left; delete the row.
    Remove,
}

impl HoldingChange {
    /// Units held after the change.
    pub const fn quantity_after(&self) -> u32 {
        match *self {
            Self::Create { quantity } | Self::Set { quantity } => quantity,
            Self::Remove => 0,
        }
    }
}

/// The outcome of settling a [`Transfer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Balance after the transfer.
    pub balance: u64,
    /// Required change to the ownership row.
    pub holding: HoldingChange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_creates_holding_and_debits() {
        let settled = Transfer::purchase(50, 2).and_then(|t| t.settle(250, None));
        assert_eq!(
            settled,
            Ok(Settlement {
                balance: 150,
                holding: HoldingChange::Create { quantity: 2 },
            })
        );
    }

    #[test]
    fn purchase_stacks_onto_existing_holding() {
        let settled = Transfer::purchase(10, 3).and_then(|t| t.settle(100, Some(4)));
        assert_eq!(
            settled.map(|s| s.holding),
            Ok(HoldingChange::Set { quantity: 7 })
        );
    }

    #[test]
    fn purchase_of_exact_balance_leaves_zero() {
        let settled = Transfer::purchase(125, 2).and_then(|t| t.settle(250, None));
        assert_eq!(settled.map(|s| s.balance), Ok(0));
    }

    #[test]
    fn purchase_beyond_balance_rejected() {
        let settled = Transfer::purchase(100, 3).and_then(|t| t.settle(250, None));
        assert_eq!(
            settled,
            Err(LedgerError::InsufficientFunds {
                required: 300,
                available: 250,
            })
        );
    }

    #[test]
    fn zero_quantity_rejected_both_ways() {
        assert_eq!(Transfer::purchase(50, 0), Err(LedgerError::ZeroQuantity));
        assert_eq!(Transfer::sale(40, 0), Err(LedgerError::ZeroQuantity));
    }

    #[test]
    fn price_overflow_rejected() {
        let result = Transfer::purchase(u64::MAX, 2);
        assert!(matches!(result, Err(LedgerError::Overflow { .. })));
    }

    #[test]
    fn sale_credits_and_shrinks_holding() {
        let settled = Transfer::sale(40, 1).and_then(|t| t.settle(150, Some(2)));
        assert_eq!(
            settled,
            Ok(Settlement {
                balance: 190,
                holding: HoldingChange::Set { quantity: 1 },
            })
        );
    }

    #[test]
    fn selling_everything_removes_holding() {
        let settled = Transfer::sale(40, 2).and_then(|t| t.settle(0, Some(2)));
        assert_eq!(settled.map(|s| s.holding), Ok(HoldingChange::Remove));
        assert_eq!(HoldingChange::Remove.quantity_after(), 0);
    }

    #[test]
    fn sale_beyond_holding_rejected() {
        let settled = Transfer::sale(40, 3).and_then(|t| t.settle(0, Some(2)));
        assert_eq!(
            settled,
            Err(LedgerError::InsufficientQuantity {
                requested: 3,
                held: 2,
            })
        );
    }

    #[test]
    fn sale_of_unowned_item_rejected() {
        let settled = Transfer::sale(40, 1).and_then(|t| t.settle(0, None));
        assert_eq!(settled, Err(LedgerError::NotHeld));
    }

    #[test]
    fn buy_then_partial_sell_conserves_quantity() {
        let bought = Transfer::purchase(50, 5).and_then(|t| t.settle(500, None));
        let held = bought.map(|s| s.holding.quantity_after()).ok();
        let sold = Transfer::sale(40, 3).and_then(|t| t.settle(250, held));
        assert_eq!(sold.map(|s| s.holding.quantity_after()), Ok(2));
    }

    #[test]
    fn amount_and_quantity_report_both_sides() {
        let sale = Transfer::sale(40, 3).ok();
        assert_eq!(sale.map(|t| t.amount()), Some(120));
        assert_eq!(sale.map(|t| t.quantity()), Some(3));
    }
}
