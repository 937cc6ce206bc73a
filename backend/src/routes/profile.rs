//! Health profile routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use nutrigen_shared::health_metrics::TargetBreakdown;
use nutrigen_shared::profile::ProfileUpdate;
use nutrigen_shared::types::{ApiResponse, ProfileResponse};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/targets", get(preview_targets))
}

/// GET /api/v1/profile
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ApiResponse<ProfileResponse>>> {
    let profile = ProfileService::get(state.db(), auth.user_id).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// PUT /api/v1/profile - section-wise upsert
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<ApiResponse<ProfileResponse>>> {
    let profile = ProfileService::upsert(state.db(), auth.user_id, update).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// GET /api/v1/profile/targets - what a plan generated now would target
async fn preview_targets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<TargetBreakdown>>> {
    let breakdown = ProfileService::preview_targets(state.db(), auth.user_id).await?;
    Ok(Json(ApiResponse::ok(breakdown)))
}
