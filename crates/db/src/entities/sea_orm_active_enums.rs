//! `SeaORM` active enums backed by Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a cash session.
///
/// `open -> closed` is the only transition; `closed` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "cash_session_status"
)]
#[serde(rename_all = "lowercase")]
pub enum CashSessionStatus {
    /// Session is accepting movements.
    #[sea_orm(string_value = "open")]
    Open,
    /// Session has been reconciled and frozen.
    #[sea_orm(string_value = "closed")]
    Closed,
}
