//! Request handlers, one module per resource.
//!
//! Handlers authenticate via [`AuthUser`](crate::middleware::auth::AuthUser),
//! validate input, and delegate to `glucotrack_db` repositories or to the
//! alert service in [`crate::alerting`].

pub mod alerts;
pub mod caregivers;
pub mod dashboard;
pub mod doctors;
pub mod glucose;
pub mod medications;
pub mod sos;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::Json;

use crate::error::AppError;

/// Unwrap a JSON body, turning extractor rejections into a 400 with a JSON
/// error body.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Unwrap query parameters; a malformed query string is a JSON 400.
pub(crate) fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Unwrap path parameters; a non-numeric id is a JSON 400.
pub(crate) fn path_params<T>(params: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    params
        .map(|Path(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}
