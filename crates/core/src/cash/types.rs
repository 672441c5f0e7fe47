//! Movement types and amount sign normalization.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kinds of cash movements recorded against a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Seed movement recording the opening float. Exactly one per session,
    /// always the first movement.
    Initial,
    /// Cash put into the drawer outside a sale.
    Income,
    /// Cash taken out of the drawer. Stored with a negative amount.
    Expense,
    /// Cash received for a storefront sale.
    Sale,
}

/// Error returned when parsing an unknown movement type string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown movement type: {0}")]
pub struct ParseMovementTypeError(pub String);

impl MovementType {
    /// Normalizes a user-supplied amount into the signed amount stored in
    /// the ledger: expenses are outflows (negative), everything else is an
    /// inflow (positive).
    #[must_use]
    pub fn signed_amount(self, amount: Decimal) -> Decimal {
        match self {
            Self::Expense => -amount.abs(),
            Self::Initial | Self::Income | Self::Sale => amount.abs(),
        }
    }

    /// Returns true for the seed movement type.
    #[must_use]
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::Initial)
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
            Self::Sale => write!(f, "sale"),
        }
    }
}

impl std::str::FromStr for MovementType {
    type Err = ParseMovementTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "initial" => Ok(Self::Initial),
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "sale" => Ok(Self::Sale),
            _ => Err(ParseMovementTypeError(s.to_string())),
        }
    }
}
