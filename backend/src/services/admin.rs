//! Admin user management

use crate::error::ApiError;
use crate::repositories::UserRepository;
use chrono::{Duration, Utc};
use nutrigen_shared::types::AdminUsersResponse;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// Accounts updated within this window count as active
pub const ACTIVE_WINDOW_HOURS: i64 = 48;

pub struct AdminService;

impl AdminService {
    pub async fn list_users(pool: &PgPool) -> Result<AdminUsersResponse, ApiError> {
        let users = UserRepository::list_all(pool).await.map_err(ApiError::Internal)?;
        let stats = UserRepository::stats(pool, Utc::now() - Duration::hours(ACTIVE_WINDOW_HOURS))
            .await
            .map_err(ApiError::Internal)?;

        Ok(AdminUsersResponse { users, stats })
    }

    /// Delete a regular account; admin accounts are protected
    pub async fn delete_user(pool: &PgPool, admin_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

        if user.is_admin() {
            return Err(ApiError::Forbidden("Cannot delete an admin account.".to_string()));
        }

        UserRepository::delete(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        info!(admin_id = %admin_id, user_id = %user_id, "User deleted by admin");
        Ok(())
    }
}
