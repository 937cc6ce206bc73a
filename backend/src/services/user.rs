//! User service for authentication and account lookup
//!
//! Password hashing and verification run on the blocking pool; the JWT
//! service is passed by reference with its keys already derived.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{NewUser, UserRepository};
use nutrigen_shared::models::{Role, User};
use nutrigen_shared::types::{AuthTokens, RegisterRequest};
use nutrigen_shared::validation::{validate_name, validate_password};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::ValidateEmail;

/// Emails are matched case-insensitively by storing them lower-cased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn issue_tokens(jwt_service: &JwtService, user_id: Uuid) -> Result<AuthTokens, ApiError> {
    let access_token = jwt_service
        .generate_access_token(user_id)
        .map_err(ApiError::Internal)?;
    let refresh_token = jwt_service
        .generate_refresh_token(user_id)
        .map_err(ApiError::Internal)?;

    Ok(AuthTokens {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: jwt_service.access_token_expiry_secs(),
    })
}

/// User service for authentication operations
pub struct UserService;

impl UserService {
    pub async fn register(
        pool: &PgPool,
        jwt_service: &JwtService,
        req: &RegisterRequest,
    ) -> Result<AuthTokens, ApiError> {
        validate_name("first_name", &req.first_name).map_err(ApiError::Validation)?;
        validate_name("last_name", &req.last_name).map_err(ApiError::Validation)?;

        let email = normalize_email(&req.email);
        if !email.validate_email() {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }
        validate_password(&req.password).map_err(ApiError::Validation)?;

        if UserRepository::email_exists(pool, &email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(req.password.clone())
            .await
            .map_err(ApiError::Internal)?;

        let phone = req.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());
        let user = UserRepository::create(
            pool,
            NewUser {
                first_name: req.first_name.trim(),
                last_name: req.last_name.trim(),
                email: &email,
                phone,
                password_hash: &password_hash,
                role: Role::User,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        info!(user_id = %user.id, "User registered");
        issue_tokens(jwt_service, user.id)
    }

    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, ApiError> {
        let user = UserRepository::find_by_email(pool, &normalize_email(email))
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        issue_tokens(jwt_service, user.id)
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh_token(
        pool: &PgPool,
        jwt_service: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let user_id = jwt_service
            .validate_refresh_token(refresh_token)
            .and_then(|claims| claims.user_id())
            .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        // Deleted accounts cannot refresh
        UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        issue_tokens(jwt_service, user_id)
    }

    pub async fn current_user(pool: &PgPool, user_id: Uuid) -> Result<User, ApiError> {
        UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }
}
