//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use glucotrack_core::credential::extract_credential;
use glucotrack_core::error::CoreError;
use glucotrack_core::types::DbId;
use glucotrack_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the request credential.
///
/// The credential is taken from `Authorization: Bearer <token>` or, failing
/// that, the `token` cookie. The token must validate and its subject must be
/// an existing account in the `active` state.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// Display name, used to identify the patient in alert messages.
    pub full_name: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let cookies = parts.headers.get(COOKIE).and_then(|v| v.to_str().ok());

        let credential = extract_credential(authorization, cookies).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Access token required".into()))
        })?;

        let claims = validate_token(&credential.token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User not found".into())))?;

        if !user.is_active() {
            tracing::warn!(user_id = user.id, status = %user.account_status, "Rejected inactive account");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Account is not active".into(),
            )));
        }

        Ok(AuthUser {
            user_id: user.id,
            full_name: user.full_name,
        })
    }
}
