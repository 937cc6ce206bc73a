//! Profile service - business logic for the user health profile

use crate::error::ApiError;
use crate::repositories::profile::ProfileRecord;
use crate::repositories::{ProfileRepository, UserRepository};
use nutrigen_shared::health_metrics::{calculate_breakdown, TargetBreakdown, TargetInputs};
use nutrigen_shared::profile::{Profile, ProfileUpdate};
use nutrigen_shared::types::ProfileResponse;
use nutrigen_shared::validation::{validate_profile, ValidationError};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub const PROFILE_NOT_FOUND: &str = "Profile not found. Please update your profile.";

fn to_response(record: &ProfileRecord) -> Result<ProfileResponse, ApiError> {
    Ok(ProfileResponse {
        user_id: record.user_id,
        profile: record.to_profile().map_err(ApiError::Internal)?,
        updated_at: record.updated_at,
    })
}

fn validation_message(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ValidationError::user_message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Profile service for user profile operations
pub struct ProfileService;

impl ProfileService {
    /// Stored profile, if the user has saved one
    pub async fn find(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, ApiError> {
        ProfileRepository::find(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(|record| record.to_profile().map_err(ApiError::Internal))
            .transpose()
    }

    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<ProfileResponse, ApiError> {
        let record = ProfileRepository::find(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(PROFILE_NOT_FOUND.to_string()))?;

        to_response(&record)
    }

    /// Merge the submitted sections into the stored profile and save it
    ///
    /// Creates the profile on first save and flags the account as having
    /// completed its profile.
    pub async fn upsert(pool: &PgPool, user_id: Uuid, update: ProfileUpdate) -> Result<ProfileResponse, ApiError> {
        let current = Self::find(pool, user_id).await?.unwrap_or_default();
        let merged = current.merge(update);

        validate_profile(&merged).map_err(|errors| ApiError::Validation(validation_message(&errors)))?;

        let mut tx = pool.begin().await?;
        let record = ProfileRepository::upsert(&mut *tx, user_id, &merged)
            .await
            .map_err(ApiError::Internal)?;
        UserRepository::mark_profile_completed(&mut *tx, user_id)
            .await
            .map_err(ApiError::Internal)?;
        tx.commit().await?;

        info!(user_id = %user_id, "Profile updated");
        to_response(&record)
    }

    /// What a plan generated now would target, without persisting anything
    pub async fn preview_targets(pool: &PgPool, user_id: Uuid) -> Result<TargetBreakdown, ApiError> {
        let profile = Self::find(pool, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(PROFILE_NOT_FOUND.to_string()))?;

        let inputs = TargetInputs::try_from(&profile)?;
        Ok(calculate_breakdown(&inputs))
    }
}
