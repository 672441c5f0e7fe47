//! Cash-register repository: session lifecycle and the movement ledger.
//!
//! All multi-step writes run inside database transactions:
//! - `open` checks-then-inserts under a serializable transaction, with the
//!   partial unique index on `status = 'open'` as the final arbiter.
//! - `close` holds `FOR UPDATE` on the session row while summing movements,
//!   so an in-flight register can never be excluded from the calculated
//!   balance yet still appear in the audit trail.
//! - `register_movement` takes a shared lock on the session row, which
//!   serializes it against a concurrent close without blocking other
//!   registers.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IsolationLevel,
    QueryFilter, QueryOrder, QuerySelect, RuntimeErr, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use caja_core::cash::{self, MovementType};

use crate::entities::{
    cash_movements, cash_sessions, sea_orm_active_enums::CashSessionStatus,
};

/// Description recorded on every seed movement.
const OPENING_DESCRIPTION: &str = "opening";

/// Error types for cash-register operations.
#[derive(Debug, thiserror::Error)]
pub enum CashRegisterError {
    /// A session is already open.
    #[error("a cash session is already open")]
    AlreadyOpen,

    /// No open session exists to close or register against.
    #[error("no open cash session")]
    NoOpenSession,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// An open session together with its ordered movement ledger.
#[derive(Debug, Clone)]
pub struct SessionWithMovements {
    /// Session header.
    pub session: cash_sessions::Model,
    /// Movements ordered by creation time ascending.
    pub movements: Vec<cash_movements::Model>,
}

/// Cash-register repository.
#[derive(Debug, Clone)]
pub struct CashRegisterRepository {
    db: DatabaseConnection,
}

impl CashRegisterRepository {
    /// Creates a new cash-register repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a new cash session with the given opening float.
    ///
    /// Atomically inserts the session and its seed `initial` movement; the
    /// seed amount always equals `start_amount`. A session is never persisted
    /// without its seed movement.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyOpen` if a session with status `open` exists, whether
    /// detected by the pre-check, by the unique index, or by a serialization
    /// failure under a concurrent open. Anything else is `Database`.
    pub async fn open(
        &self,
        start_amount: Decimal,
        opened_by: Uuid,
    ) -> Result<cash_sessions::Model, CashRegisterError> {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        let existing = cash_sessions::Entity::find()
            .filter(cash_sessions::Column::Status.eq(CashSessionStatus::Open))
            .one(&txn)
            .await
            .map_err(map_open_err)?;

        if existing.is_some() {
            txn.rollback().await?;
            return Err(CashRegisterError::AlreadyOpen);
        }

        let now = Utc::now().into();
        let session_id = Uuid::new_v4();

        let session = cash_sessions::ActiveModel {
            id: Set(session_id),
            start_amount: Set(start_amount),
            opened_by_id: Set(opened_by),
            status: Set(CashSessionStatus::Open),
            end_amount: Set(None),
            calculated_end_amount: Set(None),
            difference: Set(None),
            closed_by_id: Set(None),
            closed_at: Set(None),
            notes: Set(None),
            opened_at: Set(now),
        };

        let session = session.insert(&txn).await.map_err(map_open_err)?;

        let seed = cash_movements::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(session_id),
            movement_type: Set(MovementType::Initial.to_string()),
            amount: Set(start_amount),
            description: Set(OPENING_DESCRIPTION.to_string()),
            created_by_id: Set(opened_by),
            created_at: Set(now),
        };
        seed.insert(&txn).await.map_err(map_open_err)?;

        txn.commit().await.map_err(map_open_err)?;

        Ok(session)
    }

    /// Closes the currently open session against a counted drawer amount.
    ///
    /// Locks the session row, sums its movements, and freezes the
    /// reconciliation on the row in a single transaction. A stale close
    /// racing a committed one finds no open session and gets `NoOpenSession`.
    ///
    /// # Errors
    ///
    /// Returns `NoOpenSession` if no session has status `open`.
    pub async fn close(
        &self,
        end_amount: Decimal,
        notes: Option<String>,
        closed_by: Uuid,
    ) -> Result<cash_sessions::Model, CashRegisterError> {
        let txn = self.db.begin().await?;

        let session = cash_sessions::Entity::find()
            .filter(cash_sessions::Column::Status.eq(CashSessionStatus::Open))
            .order_by_desc(cash_sessions::Column::OpenedAt)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CashRegisterError::NoOpenSession)?;

        let movements = cash_movements::Entity::find()
            .filter(cash_movements::Column::SessionId.eq(session.id))
            .order_by_asc(cash_movements::Column::CreatedAt)
            .all(&txn)
            .await?;

        let amounts: Vec<Decimal> = movements.iter().map(|m| m.amount).collect();
        let outcome = cash::reconcile(end_amount, &amounts);

        let mut active: cash_sessions::ActiveModel = session.into();
        active.status = Set(CashSessionStatus::Closed);
        active.end_amount = Set(Some(end_amount));
        active.calculated_end_amount = Set(Some(outcome.calculated));
        active.difference = Set(Some(outcome.difference));
        active.closed_by_id = Set(Some(closed_by));
        active.closed_at = Set(Some(Utc::now().into()));
        active.notes = Set(notes);

        let closed = active.update(&txn).await?;
        txn.commit().await?;

        Ok(closed)
    }

    /// Appends a movement to the currently open session.
    ///
    /// The amount is sign-normalized by movement type (expenses negative,
    /// inflows positive). The ledger is write-once: no update or delete
    /// operation exists for movements.
    ///
    /// # Errors
    ///
    /// Returns `NoOpenSession` if no session has status `open`.
    pub async fn register_movement(
        &self,
        kind: MovementType,
        amount: Decimal,
        description: String,
        created_by: Uuid,
    ) -> Result<cash_movements::Model, CashRegisterError> {
        let txn = self.db.begin().await?;

        let session = cash_sessions::Entity::find()
            .filter(cash_sessions::Column::Status.eq(CashSessionStatus::Open))
            .order_by_desc(cash_sessions::Column::OpenedAt)
            .lock_shared()
            .one(&txn)
            .await?
            .ok_or(CashRegisterError::NoOpenSession)?;

        let movement = cash_movements::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(session.id),
            movement_type: Set(kind.to_string()),
            amount: Set(kind.signed_amount(amount)),
            description: Set(description),
            created_by_id: Set(created_by),
            created_at: Set(Utc::now().into()),
        };

        let inserted = movement.insert(&txn).await?;
        txn.commit().await?;

        Ok(inserted)
    }

    /// Returns the currently open session with its ordered movements, or
    /// `None` when no session is open (a normal empty state, not an error).
    pub async fn current_session(
        &self,
    ) -> Result<Option<SessionWithMovements>, CashRegisterError> {
        let session = cash_sessions::Entity::find()
            .filter(cash_sessions::Column::Status.eq(CashSessionStatus::Open))
            .order_by_desc(cash_sessions::Column::OpenedAt)
            .one(&self.db)
            .await?;

        let Some(session) = session else {
            return Ok(None);
        };

        let movements = cash_movements::Entity::find()
            .filter(cash_movements::Column::SessionId.eq(session.id))
            .order_by_asc(cash_movements::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(Some(SessionWithMovements { session, movements }))
    }
}

// SQLSTATE codes raised when a concurrent open wins the race: unique-index
// violation on the single-open index, and serialization failure between the
// two serializable transactions.
const UNIQUE_VIOLATION: &str = "23505";
const SERIALIZATION_FAILURE: &str = "40001";

/// Maps errors that mean "another open won the race" to `AlreadyOpen`:
/// a violation of the single-open unique index, or a serialization failure
/// when the concurrent serializable transactions collide before the
/// pre-check sees the winner's row. Everything else stays a database error.
fn map_open_err(e: DbErr) -> CashRegisterError {
    let lost_race = matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || sql_state(&e)
            .is_some_and(|code| code == UNIQUE_VIOLATION || code == SERIALIZATION_FAILURE);

    if lost_race {
        CashRegisterError::AlreadyOpen
    } else {
        CashRegisterError::Database(e)
    }
}

/// Extracts the SQLSTATE code from a database-reported error, if any.
fn sql_state(e: &DbErr) -> Option<String> {
    match e {
        DbErr::Conn(RuntimeErr::SqlxError(err))
        | DbErr::Exec(RuntimeErr::SqlxError(err))
        | DbErr::Query(RuntimeErr::SqlxError(err)) => err
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code.to_string()),
        _ => None,
    }
}
