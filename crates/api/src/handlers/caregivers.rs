//! Handlers for the `/caregivers` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use glucotrack_core::contact::{validate_access_level, validate_phone, validate_relationship};
use glucotrack_db::models::caregiver::{Caregiver, CreateCaregiver};
use glucotrack_db::repositories::CaregiverRepo;
use serde::Serialize;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::json_body;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CaregiverListResponse {
    pub caregivers: Vec<Caregiver>,
}

#[derive(Debug, Serialize)]
pub struct CaregiverCreatedResponse {
    pub message: &'static str,
    pub caregiver: Caregiver,
}

/// GET /api/caregivers
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<CaregiverListResponse>> {
    let caregivers = CaregiverRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(CaregiverListResponse { caregivers }))
}

/// POST /api/caregivers
///
/// A duplicate email for the same user is rejected with 409.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateCaregiver>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CaregiverCreatedResponse>)> {
    let input = json_body(payload)?;
    input.validate()?;
    validate_relationship(&input.relationship)?;
    if let Some(level) = input.access_level.as_deref() {
        validate_access_level(level)?;
    }
    let phone = validate_phone(&input.phone)?;

    let caregiver = CaregiverRepo::create(&state.pool, auth.user_id, &input, &phone).await?;

    tracing::info!(
        user_id = auth.user_id,
        caregiver_id = caregiver.id,
        emergency_contact = caregiver.emergency_contact,
        "Caregiver added"
    );

    Ok((
        StatusCode::CREATED,
        Json(CaregiverCreatedResponse {
            message: "Caregiver added successfully",
            caregiver,
        }),
    ))
}
