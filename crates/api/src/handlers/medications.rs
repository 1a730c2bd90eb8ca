//! Handlers for the `/medications` resource.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use glucotrack_core::error::CoreError;
use glucotrack_core::types::DbId;
use glucotrack_db::models::medication::{
    CreateMedication, Medication, MedicationInput, VALID_MEDICATION_TYPES,
};
use glucotrack_db::repositories::MedicationRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::{json_body, path_params, query_params};
use crate::middleware::auth::AuthUser;
use crate::query::ActiveOnlyParams;
use crate::state::AppState;

const MAX_NAME_LENGTH: usize = 100;
const MAX_INSTRUCTIONS_LENGTH: usize = 500;

#[derive(Debug, Serialize)]
pub struct MedicationView {
    #[serde(flatten)]
    pub medication: Medication,
    /// Human-readable dose, e.g. `"10 units"`.
    pub dose_display: String,
}

impl From<Medication> for MedicationView {
    fn from(medication: Medication) -> Self {
        let dose_display = medication.dose.0.to_string();
        Self {
            medication,
            dose_display,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MedicationListResponse {
    pub medications: Vec<MedicationView>,
}

#[derive(Debug, Serialize)]
pub struct MedicationCreatedResponse {
    pub message: &'static str,
    pub medication: MedicationView,
}

#[derive(Debug, Serialize)]
pub struct MedicationResponse {
    pub medication: MedicationView,
}

/// GET /api/medications?active_only=
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    params: Result<Query<ActiveOnlyParams>, QueryRejection>,
) -> AppResult<Json<MedicationListResponse>> {
    let params = query_params(params)?;
    let medications =
        MedicationRepo::list_for_user(&state.pool, auth.user_id, params.active_only).await?;
    Ok(Json(MedicationListResponse {
        medications: medications.into_iter().map(MedicationView::from).collect(),
    }))
}

/// POST /api/medications
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<MedicationInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MedicationCreatedResponse>)> {
    let input = validate_medication(json_body(payload)?)?;
    let medication = MedicationRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        medication_id = medication.id,
        dose = %input.dose,
        "Medication added"
    );

    Ok((
        StatusCode::CREATED,
        Json(MedicationCreatedResponse {
            message: "Medication added successfully",
            medication: medication.into(),
        }),
    ))
}

/// GET /api/medications/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<MedicationResponse>> {
    let id = path_params(id)?;
    let medication = MedicationRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(MedicationResponse {
        medication: medication.into(),
    }))
}

/// PUT /api/medications/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<MedicationInput>, JsonRejection>,
) -> AppResult<Json<MedicationCreatedResponse>> {
    let id = path_params(id)?;
    let input = json_body(payload)?;
    let is_active = input.is_active;
    let input = validate_medication(input)?;

    let medication = MedicationRepo::update(&state.pool, id, auth.user_id, &input, is_active)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        user_id = auth.user_id,
        medication_id = medication.id,
        dose = %input.dose,
        is_active = medication.is_active,
        "Medication updated"
    );

    Ok(Json(MedicationCreatedResponse {
        message: "Medication updated successfully",
        medication: medication.into(),
    }))
}

/// DELETE /api/medications/{id}
///
/// Deactivates rather than deletes; the medication drops out of
/// `?active_only=true` listings.
pub async fn deactivate(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<MedicationCreatedResponse>> {
    let id = path_params(id)?;
    let medication = MedicationRepo::deactivate(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        user_id = auth.user_id,
        medication_id = medication.id,
        "Medication deactivated"
    );

    Ok(Json(MedicationCreatedResponse {
        message: "Medication deactivated successfully",
        medication: medication.into(),
    }))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Medication",
        id,
    })
}

/// Check the request and normalize its dose.
fn validate_medication(input: MedicationInput) -> Result<CreateMedication, CoreError> {
    let name = input.name.trim().to_string();
    if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Medication name must be between 1 and {MAX_NAME_LENGTH} characters"
        )));
    }

    let medication_type = input
        .medication_type
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "other".to_string());
    if !VALID_MEDICATION_TYPES.contains(&medication_type.as_str()) {
        return Err(CoreError::Validation(format!(
            "Invalid medication type '{medication_type}'. Must be one of: {}",
            VALID_MEDICATION_TYPES.join(", ")
        )));
    }

    let times_per_day = input.times_per_day.unwrap_or(1);
    if !(1..=6).contains(&times_per_day) {
        return Err(CoreError::Validation(
            "Times per day must be between 1 and 6".to_string(),
        ));
    }

    let instructions = input
        .instructions
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty());
    if instructions
        .as_deref()
        .is_some_and(|i| i.chars().count() > MAX_INSTRUCTIONS_LENGTH)
    {
        return Err(CoreError::Validation(format!(
            "Instructions exceed maximum length of {MAX_INSTRUCTIONS_LENGTH} characters"
        )));
    }

    Ok(CreateMedication {
        name,
        medication_type,
        dose: input.dosage.normalize()?,
        times_per_day,
        instructions,
    })
}
