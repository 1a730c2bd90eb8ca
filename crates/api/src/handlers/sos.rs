//! Emergency SOS: a one-tap emergency alert to every eligible contact.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use glucotrack_core::alert::{AlertCategory, AlertData, AlertLocation, AlertType};
use serde::Deserialize;

use crate::alerting::{self, NewAlert};
use crate::error::{AppError, AppResult};
use crate::handlers::alerts::CreateAlertResponse;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const SOS_TITLE: &str = "Emergency SOS";
const SOS_DEFAULT_MESSAGE: &str = "Emergency SOS activated. Immediate assistance needed.";

/// Body of `POST /api/sos`. Every field is optional and the body may be
/// empty.
#[derive(Debug, Default, Deserialize)]
pub struct SosRequest {
    pub message: Option<String>,
    pub location: Option<AlertLocation>,
    pub glucose_value: Option<f64>,
}

/// POST /api/sos
pub async fn trigger(
    auth: AuthUser,
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<CreateAlertResponse>)> {
    let req: SosRequest = if body.iter().all(u8::is_ascii_whitespace) {
        SosRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid SOS request body: {e}")))?
    };

    let message = req
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| SOS_DEFAULT_MESSAGE.to_string());

    glucotrack_core::alert::validate_alert_text(SOS_TITLE, &message)?;

    let new = NewAlert {
        alert_type: AlertType::Emergency,
        category: AlertCategory::Emergency,
        title: SOS_TITLE.to_string(),
        message,
        data: AlertData {
            glucose_value: req.glucose_value,
            location: req.location,
            ..AlertData::default()
        },
        send_to_contacts: true,
    };

    tracing::warn!(user_id = auth.user_id, "Emergency SOS triggered");

    let created = alerting::create_alert(&state, &auth, new).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateAlertResponse::new("Emergency alert sent", created)),
    ))
}
