//! Exercise and food suggestions
//!
//! Both engines are pure; this service only fetches the profile and the
//! plan for the requested date.

use crate::error::ApiError;
use crate::repositories::DailyPlanRepository;
use crate::services::ProfileService;
use chrono::NaiveDate;
use nutrigen_shared::daily_plan::DailyPlan;
use nutrigen_shared::exercise::{suggest_exercises, ExerciseSuggestion};
use nutrigen_shared::meals::{suggest_meals, MealSuggestion};
use nutrigen_shared::profile::Profile;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

async fn load_inputs(
    pool: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
) -> Result<(Option<Profile>, Option<DailyPlan>), ApiError> {
    let profile = ProfileService::find(pool, user_id).await?;
    if profile.is_none() {
        return Ok((None, None));
    }
    let plan = DailyPlanRepository::find_by_date(pool, user_id, date)
        .await
        .map_err(ApiError::Internal)?;
    Ok((profile, plan))
}

pub struct SuggestionService;

impl SuggestionService {
    pub async fn exercises(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<ExerciseSuggestion, ApiError> {
        let (profile, plan) = load_inputs(pool, user_id, date).await?;
        let suggestion = suggest_exercises(profile.as_ref(), plan.as_ref(), date)?;

        metrics::counter!("nutrigen_suggestions_total", "engine" => "exercise").increment(1);
        debug!(user_id = %user_id, goal = %suggestion.user_goal, count = suggestion.exercises.len(), "Exercise suggestion");
        Ok(suggestion)
    }

    pub async fn meals(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<MealSuggestion, ApiError> {
        let (profile, plan) = load_inputs(pool, user_id, date).await?;
        let suggestion = suggest_meals(profile.as_ref(), plan.as_ref(), date)?;

        metrics::counter!("nutrigen_suggestions_total", "engine" => "food").increment(1);
        debug!(user_id = %user_id, region = %suggestion.dietary_region, "Food suggestion");
        Ok(suggestion)
    }
}
