//! Cash-register session and movement routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{AppState, error::ApiError, extractors::AuthUser};
use caja_core::cash::MovementType;
use caja_db::CashRegisterRepository;
use caja_shared::AppError;

/// Creates the cash-register routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cash-register/session",
            get(get_session).post(open_session).put(close_session),
        )
        .route("/cash-register/session/movements", post(register_movement))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for opening a session.
#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    /// Opening float counted into the drawer.
    pub start_amount: Decimal,
}

/// Request body for closing the open session.
#[derive(Debug, Deserialize)]
pub struct CloseSessionRequest {
    /// Physically counted drawer amount.
    pub end_amount: Decimal,
    /// Free-text closing notes.
    pub notes: Option<String>,
}

/// Request body for registering a movement.
#[derive(Debug, Deserialize)]
pub struct RegisterMovementRequest {
    /// Movement type (`income`, `expense`, `sale`).
    #[serde(rename = "type")]
    pub movement_type: String,
    /// Amount; the sign is normalized from the movement type.
    pub amount: Decimal,
    /// What the cash moved for.
    pub description: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/cash-register/session` - Current open session with its movements.
///
/// `{"session": null}` is a normal empty state, not an error.
async fn get_session(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = CashRegisterRepository::new((*state.db).clone());

    match repo.current_session().await? {
        Some(current) => Ok((
            StatusCode::OK,
            Json(json!({
                "session": current.session,
                "movements": current.movements
            })),
        )),
        None => Ok((StatusCode::OK, Json(json!({ "session": null })))),
    }
}

/// POST `/cash-register/session` - Open a new session.
async fn open_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<OpenSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.start_amount < Decimal::ZERO {
        return Err(AppError::Validation("start_amount must not be negative".to_string()).into());
    }

    let repo = CashRegisterRepository::new((*state.db).clone());
    let session = repo.open(payload.start_amount, auth.user_id()).await?;

    info!(
        session_id = %session.id,
        start_amount = %session.start_amount,
        opened_by = %auth.user_id(),
        "Cash session opened"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Cash session opened",
            "session": session
        })),
    ))
}

/// PUT `/cash-register/session` - Close the open session with a counted
/// amount and freeze the reconciliation.
async fn close_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CloseSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CashRegisterRepository::new((*state.db).clone());
    let session = repo
        .close(payload.end_amount, payload.notes, auth.user_id())
        .await?;

    info!(
        session_id = %session.id,
        end_amount = %payload.end_amount,
        difference = ?session.difference,
        closed_by = %auth.user_id(),
        "Cash session closed"
    );

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Cash session closed" })),
    ))
}

/// POST `/cash-register/session/movements` - Append a movement to the open
/// session.
async fn register_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RegisterMovementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let kind: MovementType = payload
        .movement_type
        .parse()
        .map_err(|_| AppError::Validation("invalid movement type".to_string()))?;

    // The seed movement is created by open, never through this endpoint.
    if kind.is_initial() {
        return Err(AppError::Validation("movement type cannot be initial".to_string()).into());
    }

    let repo = CashRegisterRepository::new((*state.db).clone());
    let movement = repo
        .register_movement(kind, payload.amount, payload.description, auth.user_id())
        .await?;

    info!(
        session_id = %movement.session_id,
        movement_id = %movement.id,
        amount = %movement.amount,
        "Cash movement registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Movement registered",
            "movement": movement
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    use caja_db::entities::{cash_movements, cash_sessions, sea_orm_active_enums::CashSessionStatus};
    use caja_shared::{AUTH_COOKIE, JwtConfig, JwtService};

    fn jwt_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            token_expires_hours: 12,
        })
    }

    fn app(db: sea_orm::DatabaseConnection) -> axum::Router {
        let state = AppState {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service()),
        };
        crate::create_router(state)
    }

    fn auth_cookie() -> String {
        let token = jwt_service().generate_token(Uuid::new_v4()).unwrap();
        format!("{AUTH_COOKIE}={token}")
    }

    fn open_session_model() -> cash_sessions::Model {
        cash_sessions::Model {
            id: Uuid::new_v4(),
            start_amount: dec!(100),
            opened_by_id: Uuid::new_v4(),
            status: CashSessionStatus::Open,
            end_amount: None,
            calculated_end_amount: None,
            difference: None,
            closed_by_id: None,
            closed_at: None,
            notes: None,
            opened_at: Utc::now().into(),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_session_empty() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<cash_sessions::Model>::new()])
            .into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .uri("/api/cash-register/session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["session"].is_null());
    }

    #[tokio::test]
    async fn test_get_session_with_movements() {
        let session = open_session_model();
        let movement = cash_movements::Model {
            id: Uuid::new_v4(),
            session_id: session.id,
            movement_type: "initial".to_string(),
            amount: dec!(100),
            description: "opening".to_string(),
            created_by_id: session.opened_by_id,
            created_at: session.opened_at,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![session.clone()]])
            .append_query_results([vec![movement]])
            .into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .uri("/api/cash-register/session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["session"]["id"], json!(session.id));
        assert_eq!(body["movements"].as_array().unwrap().len(), 1);
        assert_eq!(body["movements"][0]["type"], json!("initial"));
    }

    #[tokio::test]
    async fn test_open_without_cookie_is_unauthorized() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/cash-register/session")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"start_amount": "100"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], json!("missing_token"));
    }

    #[tokio::test]
    async fn test_open_with_garbage_token_is_unauthorized() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/cash-register/session")
                    .header(header::COOKIE, format!("{AUTH_COOKIE}=not-a-jwt"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"start_amount": "100"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], json!("invalid_token"));
    }

    #[tokio::test]
    async fn test_open_negative_amount_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/cash-register/session")
                    .header(header::COOKIE, auth_cookie())
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"start_amount": "-5"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], json!("VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn test_register_unknown_type_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/cash-register/session/movements")
                    .header(header::COOKIE, auth_cookie())
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"type": "refund", "amount": "10", "description": "x"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_initial_type_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/cash-register/session/movements")
                    .header(header::COOKIE, auth_cookie())
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"type": "initial", "amount": "10", "description": "x"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_check() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], json!("healthy"));
    }
}
