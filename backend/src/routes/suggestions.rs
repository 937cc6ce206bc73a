//! Exercise and food suggestion routes

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::{today, SuggestionService};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use nutrigen_shared::meals::MealSuggestion;
use nutrigen_shared::types::{ApiResponse, DateQuery};

pub fn exercise_routes() -> Router<AppState> {
    Router::new().route("/suggest", get(suggest_exercises))
}

pub fn food_routes() -> Router<AppState> {
    Router::new().route("/suggest", get(suggest_meals))
}

/// `?date=YYYY-MM-DD`, today when omitted
fn requested_date(query: Result<Query<DateQuery>, QueryRejection>) -> ApiResult<NaiveDate> {
    let Query(query) = query.map_err(|_| ApiError::BadRequest("Invalid date. Use YYYY-MM-DD.".to_string()))?;
    Ok(query.date.unwrap_or_else(today))
}

/// GET /api/v1/exercises/suggest
///
/// Carries the flat `exercises` list and the same entries grouped by
/// category under `groups`.
async fn suggest_exercises(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let date = requested_date(query)?;
    let suggestion = SuggestionService::exercises(state.db(), auth.user_id, date).await?;
    Ok(Json(ApiResponse::ok(suggestion.with_groups())).into_response())
}

/// GET /api/v1/food/suggest
async fn suggest_meals(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<MealSuggestion>>> {
    let date = requested_date(query)?;
    let suggestion = SuggestionService::meals(state.db(), auth.user_id, date).await?;
    Ok(Json(ApiResponse::ok(suggestion)))
}
