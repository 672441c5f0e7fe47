//! `SeaORM` Entity for the cash_sessions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CashSessionStatus;

/// One continuous cash-register operating period, bounded by an open and a
/// close. Closing fields stay null while the session is open and are written
/// exactly once at close time. Rows are never deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub start_amount: Decimal,
    pub opened_by_id: Uuid,
    pub status: CashSessionStatus,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub end_amount: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub calculated_end_amount: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub difference: Option<Decimal>,
    pub closed_by_id: Option<Uuid>,
    pub closed_at: Option<DateTimeWithTimeZone>,
    pub notes: Option<String>,
    pub opened_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cash_movements::Entity")]
    CashMovements,
}

impl Related<super::cash_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
