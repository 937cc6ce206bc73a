//! Support ticket routes for users

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::SupportService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use nutrigen_shared::models::SupportTicket;
use nutrigen_shared::types::{ApiResponse, CreateTicketRequest};

pub fn support_routes() -> Router<AppState> {
    Router::new().route("/", get(list_tickets).post(create_ticket))
}

/// POST /api/v1/support
async fn create_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTicketRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SupportTicket>>)> {
    let ticket = SupportService::create(state.db(), auth.user_id, &req.message).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(ticket))))
}

/// GET /api/v1/support - the caller's tickets, newest first
async fn list_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<SupportTicket>>>> {
    let tickets = SupportService::list_for_user(state.db(), auth.user_id).await?;
    Ok(Json(ApiResponse::ok(tickets)))
}
