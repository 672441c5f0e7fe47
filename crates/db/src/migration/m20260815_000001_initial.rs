//! Initial database migration.
//!
//! Creates the cash-register tables and the partial unique index that lets
//! the database itself enforce the single-open-session invariant.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(CASH_SESSIONS_SQL).await?;
        db.execute_unprepared(CASH_MOVEMENTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Session lifecycle status
CREATE TYPE cash_session_status AS ENUM ('open', 'closed');
";

const CASH_SESSIONS_SQL: &str = r"
CREATE TABLE cash_sessions (
    id UUID PRIMARY KEY,
    start_amount NUMERIC(14, 2) NOT NULL,
    opened_by_id UUID NOT NULL,
    status cash_session_status NOT NULL DEFAULT 'open',
    end_amount NUMERIC(14, 2),
    calculated_end_amount NUMERIC(14, 2),
    difference NUMERIC(14, 2),
    closed_by_id UUID,
    closed_at TIMESTAMPTZ,
    notes TEXT,
    opened_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- A closed session carries its full reconciliation record.
    CONSTRAINT chk_closed_fields CHECK (
        status = 'open'
        OR (
            end_amount IS NOT NULL
            AND calculated_end_amount IS NOT NULL
            AND difference IS NOT NULL
            AND closed_by_id IS NOT NULL
            AND closed_at IS NOT NULL
        )
    )
);

-- At most one open session system-wide. The application also checks inside
-- a serializable transaction; this index is the final arbiter under
-- concurrent opens.
CREATE UNIQUE INDEX uq_cash_sessions_single_open
    ON cash_sessions (status)
    WHERE status = 'open';

CREATE INDEX idx_cash_sessions_opened_at ON cash_sessions (opened_at DESC);
";

const CASH_MOVEMENTS_SQL: &str = r"
CREATE TABLE cash_movements (
    id UUID PRIMARY KEY,
    session_id UUID NOT NULL REFERENCES cash_sessions(id) ON DELETE RESTRICT,
    type TEXT NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    description TEXT NOT NULL,
    created_by_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_cash_movements_session ON cash_movements (session_id, created_at);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS cash_movements;
DROP TABLE IF EXISTS cash_sessions;
DROP TYPE IF EXISTS cash_session_status;
";
