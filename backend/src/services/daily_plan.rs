//! Daily plan lifecycle: generate, fetch, log intake, remove a logged item
//!
//! Accumulation rules live in `nutrigen_shared::daily_plan`; this service
//! loads the plan under a row lock, applies them and writes the result back.

use crate::error::ApiError;
use crate::repositories::{DailyPlanRepository, ProfileRepository};
use crate::services::ProfileService;
use chrono::{NaiveDate, Utc};
use nutrigen_shared::daily_plan::{DailyPlan, LogIntake, PlanState};
use nutrigen_shared::errors::CoreError;
use nutrigen_shared::health_metrics::daily_targets_for;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

pub const NO_PLAN_TODAY: &str = "No plan generated for today.";
pub const GENERATE_FIRST: &str = "Please generate today's plan first.";
pub const PROFILE_INCOMPLETE: &str = "Profile incomplete.";

/// Daily plan service
pub struct DailyPlanService;

impl DailyPlanService {
    pub async fn get(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<DailyPlan, ApiError> {
        DailyPlanRepository::find_by_date(pool, user_id, date)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(NO_PLAN_TODAY.to_string()))
    }

    pub async fn state(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<PlanState, ApiError> {
        let has_profile = ProfileRepository::exists(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        let plan = DailyPlanRepository::find_by_date(pool, user_id, date)
            .await
            .map_err(ApiError::Internal)?;

        Ok(PlanState::resolve(has_profile, plan.as_ref(), date))
    }

    /// Freeze today's targets into a new plan
    ///
    /// Only allowed from `PlanState::NoPlanToday`. A second generate for the
    /// same date is rejected, both on the early check and when a concurrent
    /// request wins the insert.
    pub async fn generate(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<DailyPlan, ApiError> {
        let existing = DailyPlanRepository::find_by_date(pool, user_id, date)
            .await
            .map_err(ApiError::Internal)?;
        let profile = ProfileService::find(pool, user_id).await?;

        let profile = match (PlanState::resolve(profile.is_some(), existing.as_ref(), date), profile) {
            (state, Some(profile)) if state.can_generate() => profile,
            (PlanState::NoProfile, _) => return Err(ApiError::BadRequest(PROFILE_INCOMPLETE.to_string())),
            _ => {
                metrics::counter!("nutrigen_plan_duplicates_total").increment(1);
                return Err(CoreError::DuplicatePlan(date).into());
            }
        };

        let targets = daily_targets_for(&profile)?;
        let plan = DailyPlan::generate(user_id, date, targets);

        let Some(record) = DailyPlanRepository::insert(pool, &plan)
            .await
            .map_err(ApiError::Internal)?
        else {
            metrics::counter!("nutrigen_plan_duplicates_total").increment(1);
            return Err(CoreError::DuplicatePlan(date).into());
        };

        metrics::counter!("nutrigen_plans_generated_total").increment(1);
        info!(user_id = %user_id, date = %date, calories = targets.calories, "Daily plan generated");

        Ok(record.into_plan(Vec::new()))
    }

    /// Add an intake to the plan for `date`
    pub async fn log_intake(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
        intake: &LogIntake,
    ) -> Result<DailyPlan, ApiError> {
        intake.validate()?;

        let mut tx = pool.begin().await?;
        let mut plan = DailyPlanRepository::lock_by_date(&mut *tx, user_id, date)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(GENERATE_FIRST.to_string()))?;

        let item = plan.log_intake(intake, Utc::now())?;

        DailyPlanRepository::insert_item(&mut *tx, plan.id, &item)
            .await
            .map_err(ApiError::Internal)?;
        DailyPlanRepository::save_actuals(&mut *tx, plan.id, &plan.actuals)
            .await
            .map_err(ApiError::Internal)?;
        tx.commit().await?;

        metrics::counter!("nutrigen_intake_logged_total").increment(1);
        debug!(user_id = %user_id, item_id = %item.id, "Intake logged");

        Ok(plan)
    }

    /// Remove a logged item and subtract its macros
    pub async fn remove_item(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
        item_id: Uuid,
    ) -> Result<DailyPlan, ApiError> {
        let mut tx = pool.begin().await?;
        let mut plan = DailyPlanRepository::lock_by_date(&mut *tx, user_id, date)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(CoreError::PlanNotFound(date))?;

        plan.remove_item(item_id)?;

        DailyPlanRepository::delete_item(&mut *tx, plan.id, item_id)
            .await
            .map_err(ApiError::Internal)?;
        DailyPlanRepository::save_actuals(&mut *tx, plan.id, &plan.actuals)
            .await
            .map_err(ApiError::Internal)?;
        tx.commit().await?;

        debug!(user_id = %user_id, item_id = %item_id, "Logged item removed");
        Ok(plan)
    }
}
