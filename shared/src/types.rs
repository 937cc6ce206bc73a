//! API request and response types

use crate::models::{SupportTicket, User};
use crate::profile::Profile;
use crate::progress::Dashboard;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Success envelope: `{"success": true, "data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

// ============================================================================
// Auth
// ============================================================================

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub profile: Profile,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Suggestions and progress
// ============================================================================

/// `?date=YYYY-MM-DD`, defaulting to today
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// `?timeframe=week|month|year&metric=calories|...`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressQuery {
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub metric: Option<String>,
}

/// Dashboard payload; only `profile: null` when the user has no profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub profile: Option<Profile>,
    #[serde(flatten)]
    pub dashboard: Option<Dashboard>,
}

// ============================================================================
// Support and admin
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyTicketRequest {
    pub reply: String,
}

/// Ticket with the author's name and email, for the admin inbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminTicketView {
    #[serde(flatten)]
    pub ticket: SupportTicket,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub total: i64,
    /// Users updated within the last 48 hours
    pub active: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUsersResponse {
    pub users: Vec<User>,
    pub stats: UserStats,
}
