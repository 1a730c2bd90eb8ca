//! Handlers for the `/glucose` resource.
//!
//! Recording a reading applies the threshold policy in
//! [`glucotrack_core::glucose`]; an out-of-range value raises an alert through
//! the same path as `POST /api/alerts`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use glucotrack_core::alert::AlertData;
use glucotrack_core::glucose::{self, GlucoseStatus, MealContext};
use glucotrack_db::models::glucose_reading::{
    CreateGlucoseReading, GlucoseReading, GlucoseReadingInput,
};
use glucotrack_db::repositories::GlucoseReadingRepo;
use glucotrack_db::{clamp_limit, clamp_offset};
use serde::Serialize;

use crate::alerting::{self, CreatedAlert, NewAlert};
use crate::error::AppResult;
use crate::handlers::{json_body, query_params};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 500;

#[derive(Debug, Serialize)]
pub struct ReadingView {
    #[serde(flatten)]
    pub reading: GlucoseReading,
    pub status: GlucoseStatus,
}

impl From<GlucoseReading> for ReadingView {
    fn from(reading: GlucoseReading) -> Self {
        let status = glucose::classify(reading.value);
        Self { reading, status }
    }
}

#[derive(Debug, Serialize)]
pub struct ReadingListResponse {
    pub readings: Vec<ReadingView>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct ReadingCreatedResponse {
    pub message: &'static str,
    pub reading: ReadingView,
    /// The alert raised by this reading, if it crossed a threshold.
    pub alert: Option<CreatedAlert>,
}

/// GET /api/glucose?limit=&offset=
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> AppResult<Json<ReadingListResponse>> {
    let params = query_params(params)?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);

    let readings =
        GlucoseReadingRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;
    let total = GlucoseReadingRepo::count_for_user(&state.pool, auth.user_id).await?;

    Ok(Json(ReadingListResponse {
        readings: readings.into_iter().map(ReadingView::from).collect(),
        total,
    }))
}

/// POST /api/glucose
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<GlucoseReadingInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ReadingCreatedResponse>)> {
    let input = json_body(payload)?;
    let notes = input
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    glucose::validate_reading(input.value, notes.as_deref())?;

    let meal_context = match input.meal_context.as_deref() {
        Some(raw) => raw.parse::<MealContext>()?,
        None => MealContext::default(),
    };

    let reading = GlucoseReadingRepo::create(
        &state.pool,
        auth.user_id,
        &CreateGlucoseReading {
            value: input.value,
            meal_context,
            notes,
            recorded_at: input.timestamp,
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        reading_id = reading.id,
        value = reading.value,
        "Glucose reading recorded"
    );

    let alert = match glucose::alert_for(reading.value) {
        Some((alert_type, category)) => {
            let (title, message) = glucose::alert_text_for(reading.value, alert_type);
            let new = NewAlert {
                alert_type,
                category,
                title,
                message,
                data: AlertData {
                    glucose_value: Some(reading.value),
                    ..AlertData::default()
                },
                send_to_contacts: true,
            };
            // The reading is already stored; a failed alert must not hide it.
            match alerting::create_alert(&state, &auth, new).await {
                Ok(created) => Some(created),
                Err(e) => {
                    tracing::error!(
                        user_id = auth.user_id,
                        reading_id = reading.id,
                        error = %e,
                        "Failed to raise glucose alert"
                    );
                    None
                }
            }
        }
        None => None,
    };

    Ok((
        StatusCode::CREATED,
        Json(ReadingCreatedResponse {
            message: "Glucose reading saved successfully",
            reading: reading.into(),
            alert,
        }),
    ))
}
