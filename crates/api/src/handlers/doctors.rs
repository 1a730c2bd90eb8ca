//! Handlers for the `/doctors` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use glucotrack_core::contact::{validate_phone, validate_report_frequency, validate_specialty};
use glucotrack_db::models::doctor::{CreateDoctor, Doctor};
use glucotrack_db::repositories::DoctorRepo;
use serde::Serialize;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::json_body;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DoctorListResponse {
    pub doctors: Vec<Doctor>,
}

#[derive(Debug, Serialize)]
pub struct DoctorCreatedResponse {
    pub message: &'static str,
    pub doctor: Doctor,
}

/// GET /api/doctors
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DoctorListResponse>> {
    let doctors = DoctorRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DoctorListResponse { doctors }))
}

/// POST /api/doctors
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateDoctor>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DoctorCreatedResponse>)> {
    let input = json_body(payload)?;
    input.validate()?;
    validate_specialty(&input.specialty)?;
    if let Some(freq) = input.report_frequency.as_deref() {
        validate_report_frequency(freq)?;
    }
    let phone = validate_phone(&input.phone)?;

    let doctor = DoctorRepo::create(&state.pool, auth.user_id, &input, &phone).await?;

    tracing::info!(
        user_id = auth.user_id,
        doctor_id = doctor.id,
        verified = doctor.verified,
        "Doctor added"
    );

    Ok((
        StatusCode::CREATED,
        Json(DoctorCreatedResponse {
            message: "Doctor added successfully",
            doctor,
        }),
    ))
}
