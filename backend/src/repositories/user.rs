//! User repository for database operations

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use nutrigen_shared::models::{Role, User};
use nutrigen_shared::types::UserStats;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub profile_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = anyhow::Error;

    fn try_from(record: UserRecord) -> Result<Self> {
        let role: Role = record.role.parse().map_err(|e: String| anyhow!(e))?;
        Ok(User {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            phone: record.phone,
            role,
            profile_completed: record.profile_completed,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Input for registering a user
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub password_hash: &'a str,
    pub role: Role,
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, phone, password_hash, role, \
                            profile_completed, created_at, updated_at";

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    pub async fn create(pool: &PgPool, user: NewUser<'_>) -> Result<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, email, phone, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.email)
        .bind(user.phone)
        .bind(user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(pool)
        .await?;

        record.try_into()
    }

    /// Find user by email, including the password hash
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        record.map(User::try_from).transpose()
    }

    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Flag the profile form as filled in; also bumps `updated_at`
    pub async fn mark_profile_completed<'e>(executor: impl PgExecutor<'e>, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET profile_completed = TRUE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// All accounts, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        records.into_iter().map(User::try_from).collect()
    }

    /// Total accounts and those updated since `active_since`
    pub async fn stats(pool: &PgPool, active_since: DateTime<Utc>) -> Result<UserStats> {
        let (total, active) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE updated_at >= $1)
            FROM users
            "#,
        )
        .bind(active_since)
        .fetch_one(pool)
        .await?;

        Ok(UserStats { total, active })
    }

    /// Delete an account; profile, plans and tickets cascade
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
