//! Authenticated-user extractor for protected routes.
//!
//! The credential is a signed JWT carried in the `auth_token` cookie,
//! verified against the server-held secret. Extraction runs before the
//! request body is touched, so an unauthenticated call never reaches a
//! handler and produces no state change.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::AppState;
use caja_shared::{AUTH_COOKIE, Claims, JwtError};

/// Extractor for the authenticated user behind the auth cookie.
///
/// Use this in handlers that require authentication:
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let user_id = auth.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> uuid::Uuid {
        self.0.user_id()
    }

    /// Returns the inner claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(token) = jar.get(AUTH_COOKIE).map(|c| c.value().to_owned()) else {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "missing_token",
                    "message": "Authentication cookie is required"
                })),
            ));
        };

        state.jwt_service.validate_token(&token).map(AuthUser).map_err(|e| {
            let (error, message) = match e {
                JwtError::Expired => ("token_expired", "Token has expired"),
                _ => ("invalid_token", "Invalid or malformed token"),
            };

            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
        })
    }
}
