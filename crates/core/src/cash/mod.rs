//! Cash-register domain logic.
//!
//! A session is opened with a float, accumulates signed movements, and is
//! closed against a physically counted amount. The arithmetic here is pure;
//! persistence and locking live in the db crate.

mod reconcile;
mod types;

pub use reconcile::{Reconciliation, calculated_balance, difference, reconcile};
pub use types::{MovementType, ParseMovementTypeError};
