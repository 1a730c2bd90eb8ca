//! Handlers for the `/alerts` resource.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use glucotrack_core::alert::AlertType;
use glucotrack_core::types::DbId;
use glucotrack_db::models::alert::AlertWithRecipients;
use serde::Serialize;

use crate::alerting::{self, CreateAlertRequest, CreatedAlert, DeliverySummary, NewAlert};
use crate::error::AppResult;
use crate::handlers::{json_body, path_params, query_params};
use crate::middleware::auth::AuthUser;
use crate::query::AlertListParams;
use crate::state::AppState;

/// Body of a successful alert creation.
#[derive(Debug, Serialize)]
pub struct CreateAlertResponse {
    pub message: &'static str,
    pub alert: AlertWithRecipients,
    pub delivery: DeliverySummary,
}

impl CreateAlertResponse {
    pub fn new(message: &'static str, created: CreatedAlert) -> Self {
        Self {
            message,
            alert: created.alert,
            delivery: created.delivery,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AlertListResponse {
    pub alerts: Vec<AlertWithRecipients>,
}

#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub alert: AlertWithRecipients,
}

/// POST /api/alerts
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateAlertRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreateAlertResponse>)> {
    let new = NewAlert::try_from(json_body(payload)?)?;
    let created = alerting::create_alert(&state, &auth, new).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateAlertResponse::new("Alert created successfully", created)),
    ))
}

/// GET /api/alerts?type=&resolved=&limit=
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    params: Result<Query<AlertListParams>, QueryRejection>,
) -> AppResult<Json<AlertListResponse>> {
    let params = query_params(params)?;
    let alert_type = params
        .alert_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(str::parse::<AlertType>)
        .transpose()?;

    let alerts =
        alerting::list_alerts(&state, auth.user_id, alert_type, params.resolved, params.limit)
            .await?;
    Ok(Json(AlertListResponse { alerts }))
}

/// GET /api/alerts/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<AlertResponse>> {
    let id = path_params(id)?;
    let alert = alerting::get_alert(&state, auth.user_id, id).await?;
    Ok(Json(AlertResponse { alert }))
}

/// POST /api/alerts/{id}/recipients/{recipient_id}/acknowledge
pub async fn acknowledge(
    auth: AuthUser,
    State(state): State<AppState>,
    ids: Result<Path<(DbId, DbId)>, PathRejection>,
) -> AppResult<Json<AlertResponse>> {
    let (id, recipient_id) = path_params(ids)?;
    let alert = alerting::acknowledge(&state, auth.user_id, id, recipient_id).await?;
    Ok(Json(AlertResponse { alert }))
}

/// POST /api/alerts/{id}/resolve
pub async fn resolve(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<AlertResponse>> {
    let id = path_params(id)?;
    let alert = alerting::resolve(&state, auth.user_id, id).await?;
    Ok(Json(AlertResponse { alert }))
}
