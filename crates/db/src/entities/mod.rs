//! `SeaORM` entity definitions.

pub mod cash_movements;
pub mod cash_sessions;
pub mod sea_orm_active_enums;
