//! Money and item transfer settlement for the Wayfarer game engine.
//!
//! Every shop interaction moves coins and items in opposite directions: a
//! purchase debits the balance and grows a holding, a sale shrinks a holding
//! and credits the balance. [`Transfer`] makes those two shapes the only
//! representable ones, and [`Transfer::settle`] computes the resulting balance
//! and holding change without touching storage.
//!
//! # Invariants
//!
//! - Balances never go negative: a debit larger than the balance is rejected.
//! - Holdings never go negative: a loss larger than the holding is rejected.
//! - A holding that reaches zero is removed, never stored as zero.
//! - Quantities are strictly positive.
//!
//! # Usage
//!
//! ```
//! use wayfarer_ledger::{HoldingChange, Transfer};
//!
//! let buy = Transfer::purchase(50, 2).ok();
//! let settled = buy.and_then(|t| t.settle(250, None).ok());
//! assert_eq!(settled.map(|s| s.balance), Some(150));
//! assert_eq!(settled.map(|s| s.holding), Some(HoldingChange::Create { quantity: 2 }));
//! ```

pub mod transfer;

pub use transfer::{HoldingChange, Settlement, Transfer};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when building or settling a transfer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Quantity must be strictly positive.
    #[error("transfer quantity must be positive")]
    ZeroQuantity,

    /// The balance cannot cover the debit.
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        /// Coins the debit requires.
        required: u64,
        /// Coins currently held.
        available: u64,
    },

    /// The holding cannot cover the loss.
    #[error("insufficient quantity owned: need {requested}, have {held}")]
    InsufficientQuantity {
        /// Units the loss requires.
        requested: u32,
        /// Units currently held.
        held: u32,
    },

    /// A sale was settled against an item that is not held at all.
    #[error("item is not owned")]
    NotHeld,

    /// A price or quantity computation overflowed.
    #[error("arithmetic overflow: {context}")]
    Overflow {
        /// What was being computed.
        context: &'static str,
    },
}
