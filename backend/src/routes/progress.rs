//! Progress chart and dashboard routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::{today, ProgressService};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use nutrigen_shared::progress::{DayProgress, FilteredProgress};
use nutrigen_shared::types::{ApiResponse, DashboardResponse, ProgressQuery};

pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/weekly", get(weekly))
        .route("/filter", get(filtered))
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/full", get(full_dashboard))
}

/// GET /api/v1/progress/weekly
async fn weekly(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ApiResponse<Vec<DayProgress>>>> {
    let days = ProgressService::weekly(state.db(), auth.user_id, today()).await?;
    Ok(Json(ApiResponse::ok(days)))
}

/// GET /api/v1/progress/filter?timeframe=week|month|year&metric=calories|...
async fn filtered(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ProgressQuery>,
) -> ApiResult<Json<ApiResponse<FilteredProgress>>> {
    let progress = ProgressService::filtered(state.db(), auth.user_id, &query, today()).await?;
    Ok(Json(ApiResponse::ok(progress)))
}

/// GET /api/v1/dashboard/full
async fn full_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<DashboardResponse>>> {
    let dashboard = ProgressService::dashboard(state.db(), auth.user_id, today()).await?;
    Ok(Json(ApiResponse::ok(dashboard)))
}
