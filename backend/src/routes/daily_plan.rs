//! Daily plan routes
//!
//! All operations act on the plan for the current UTC date.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::{today, DailyPlanService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use nutrigen_shared::daily_plan::{DailyPlan, LogIntake, PlanState};
use nutrigen_shared::types::ApiResponse;
use uuid::Uuid;

pub fn daily_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/today", get(get_today))
        .route("/state", get(get_state))
        .route("/generate", post(generate))
        .route("/log", post(log_intake))
        .route("/log/:item_id", delete(delete_item))
}

/// GET /api/v1/daily-plan/today
async fn get_today(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ApiResponse<DailyPlan>>> {
    let plan = DailyPlanService::get(state.db(), auth.user_id, today()).await?;
    Ok(Json(ApiResponse::ok(plan)))
}

/// GET /api/v1/daily-plan/state
async fn get_state(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ApiResponse<PlanState>>> {
    let plan_state = DailyPlanService::state(state.db(), auth.user_id, today()).await?;
    Ok(Json(ApiResponse::ok(plan_state)))
}

/// POST /api/v1/daily-plan/generate
async fn generate(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<(StatusCode, Json<ApiResponse<DailyPlan>>)> {
    let plan = DailyPlanService::generate(state.db(), auth.user_id, today()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(plan))))
}

/// POST /api/v1/daily-plan/log
async fn log_intake(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(intake): Json<LogIntake>,
) -> ApiResult<Json<ApiResponse<DailyPlan>>> {
    let plan = DailyPlanService::log_intake(state.db(), auth.user_id, today(), &intake).await?;
    Ok(Json(ApiResponse::ok(plan)))
}

/// DELETE /api/v1/daily-plan/log/:item_id
async fn delete_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(item_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<DailyPlan>>> {
    let plan = DailyPlanService::remove_item(state.db(), auth.user_id, today(), item_id).await?;
    Ok(Json(ApiResponse::ok(plan)))
}
