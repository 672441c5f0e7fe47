//! `SeaORM` Entity for the cash_movements table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single recorded cash inflow or outflow within a session. Write-once:
/// no update or delete path exists anywhere in the codebase.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub session_id: Uuid,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub movement_type: String,
    /// Signed amount: positive for inflow, negative for outflow.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub description: String,
    pub created_by_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_sessions::Entity",
        from = "Column::SessionId",
        to = "super::cash_sessions::Column::Id"
    )]
    CashSessions,
}

impl Related<super::cash_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
