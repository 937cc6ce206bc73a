//! Admin routes: user directory and the support inbox

use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::services::{AdminService, SupportService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use nutrigen_shared::types::{AdminTicketView, AdminUsersResponse, ApiResponse, ReplyTicketRequest};
use serde::Serialize;
use uuid::Uuid;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", delete(delete_user))
        .route("/support", get(list_tickets))
        .route("/support/:id", put(reply_to_ticket))
}

#[derive(Debug, Serialize)]
pub struct DeletedUser {
    pub id: Uuid,
    pub message: &'static str,
}

/// GET /api/v1/admin/users
async fn list_users(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Json<ApiResponse<AdminUsersResponse>>> {
    let users = AdminService::list_users(state.db()).await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// DELETE /api/v1/admin/users/:id
async fn delete_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<DeletedUser>>> {
    AdminService::delete_user(state.db(), admin.user.id, id).await?;
    Ok(Json(ApiResponse::ok(DeletedUser {
        id,
        message: "User successfully deleted.",
    })))
}

/// GET /api/v1/admin/support
async fn list_tickets(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<ApiResponse<Vec<AdminTicketView>>>> {
    let tickets = SupportService::list_all(state.db()).await?;
    Ok(Json(ApiResponse::ok(tickets)))
}

/// PUT /api/v1/admin/support/:id
async fn reply_to_ticket(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ReplyTicketRequest>,
) -> ApiResult<Json<ApiResponse<AdminTicketView>>> {
    let ticket = SupportService::reply(state.db(), id, &req.reply).await?;
    Ok(Json(ApiResponse::ok(ticket)))
}
