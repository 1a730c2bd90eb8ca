//! Handler for the dashboard summary.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{Duration, Utc};
use glucotrack_core::types::Timestamp;
use glucotrack_db::models::glucose_reading::GlucoseStats;
use glucotrack_db::repositories::{GlucoseReadingRepo, MedicationRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::query_params;
use crate::middleware::auth::AuthUser;
use crate::query::StatsParams;
use crate::state::AppState;

const DEFAULT_DAYS: i64 = 7;
const MAX_DAYS: i64 = 365;

#[derive(Debug, Serialize)]
pub struct GlucoseSummary {
    pub total_readings: i64,
    /// Mean reading rounded to whole mg/dL; 0 without readings.
    pub avg_glucose: i64,
    /// Percentage of readings within 70-140 mg/dL, rounded.
    pub time_in_range: i64,
    pub low_readings: i64,
    pub high_readings: i64,
}

impl From<GlucoseStats> for GlucoseSummary {
    fn from(stats: GlucoseStats) -> Self {
        let time_in_range = if stats.total_readings > 0 {
            (stats.in_range as f64 * 100.0 / stats.total_readings as f64).round() as i64
        } else {
            0
        };
        Self {
            total_readings: stats.total_readings,
            avg_glucose: stats.avg_glucose.map_or(0, |avg| avg.round() as i64),
            time_in_range,
            low_readings: stats.low_readings,
            high_readings: stats.high_readings,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MedicationSummary {
    pub active_medications: i64,
}

#[derive(Debug, Serialize)]
pub struct StatsPeriod {
    pub days: i64,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct DashboardStatsResponse {
    pub glucose_stats: GlucoseSummary,
    pub medication_stats: MedicationSummary,
    pub period: StatsPeriod,
}

/// GET /api/dashboard/stats?days=
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
    params: Result<Query<StatsParams>, QueryRejection>,
) -> AppResult<Json<DashboardStatsResponse>> {
    let days = query_params(params)?
        .days
        .unwrap_or(DEFAULT_DAYS)
        .clamp(1, MAX_DAYS);
    let end_date = Utc::now();
    let start_date = end_date - Duration::days(days);

    let glucose = GlucoseReadingRepo::stats_since(&state.pool, auth.user_id, start_date).await?;
    let active_medications = MedicationRepo::count_active(&state.pool, auth.user_id).await?;

    Ok(Json(DashboardStatsResponse {
        glucose_stats: glucose.into(),
        medication_stats: MedicationSummary { active_medications },
        period: StatsPeriod {
            days,
            start_date,
            end_date,
        },
    }))
}
