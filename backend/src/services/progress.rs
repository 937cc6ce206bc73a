//! Progress charts and the dashboard

use crate::error::ApiError;
use crate::repositories::DailyPlanRepository;
use crate::services::ProfileService;
use chrono::NaiveDate;
use nutrigen_shared::progress::{
    filtered_progress, full_dashboard, weekly_progress, window_start, DayProgress, FilteredProgress,
    Metric, Timeframe, WEEKLY_WINDOW_DAYS,
};
use nutrigen_shared::types::{DashboardResponse, ProgressQuery};
use sqlx::PgPool;
use uuid::Uuid;

/// Parse the optional query strings, falling back to week / calories
pub fn parse_progress_query(query: &ProgressQuery) -> Result<(Timeframe, Metric), ApiError> {
    let timeframe = match query.timeframe.as_deref() {
        Some(raw) => raw.parse::<Timeframe>().map_err(ApiError::BadRequest)?,
        None => Timeframe::default(),
    };
    let metric = match query.metric.as_deref() {
        Some(raw) => raw.parse::<Metric>().map_err(ApiError::BadRequest)?,
        None => Metric::default(),
    };
    Ok((timeframe, metric))
}

pub struct ProgressService;

impl ProgressService {
    pub async fn weekly(pool: &PgPool, user_id: Uuid, today: NaiveDate) -> Result<Vec<DayProgress>, ApiError> {
        let since = today
            .checked_sub_days(chrono::Days::new(WEEKLY_WINDOW_DAYS - 1))
            .unwrap_or(NaiveDate::MIN);
        let plans = DailyPlanRepository::list_snapshots(pool, user_id, Some(since))
            .await
            .map_err(ApiError::Internal)?;

        Ok(weekly_progress(&plans, today))
    }

    pub async fn filtered(
        pool: &PgPool,
        user_id: Uuid,
        query: &ProgressQuery,
        today: NaiveDate,
    ) -> Result<FilteredProgress, ApiError> {
        let (timeframe, metric) = parse_progress_query(query)?;
        let plans = DailyPlanRepository::list_snapshots(pool, user_id, Some(window_start(timeframe, today)))
            .await
            .map_err(ApiError::Internal)?;

        Ok(filtered_progress(&plans, timeframe, metric, today))
    }

    /// Profile plus thirty-day and lifetime metrics; `profile: null` alone
    /// when the user has not saved a profile
    pub async fn dashboard(pool: &PgPool, user_id: Uuid, today: NaiveDate) -> Result<DashboardResponse, ApiError> {
        let Some(profile) = ProfileService::find(pool, user_id).await? else {
            return Ok(DashboardResponse {
                profile: None,
                dashboard: None,
            });
        };

        let plans = DailyPlanRepository::list_snapshots(pool, user_id, None)
            .await
            .map_err(ApiError::Internal)?;

        Ok(DashboardResponse {
            profile: Some(profile),
            dashboard: Some(full_dashboard(&plans, today)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(timeframe: Option<&str>, metric: Option<&str>) -> ProgressQuery {
        ProgressQuery {
            timeframe: timeframe.map(str::to_string),
            metric: metric.map(str::to_string),
        }
    }

    #[test]
    fn test_query_defaults() {
        let (timeframe, metric) = parse_progress_query(&query(None, None)).unwrap();
        assert_eq!(timeframe, Timeframe::Week);
        assert_eq!(metric, Metric::Calories);
    }

    #[test]
    fn test_query_parses_values() {
        let (timeframe, metric) = parse_progress_query(&query(Some("year"), Some("water"))).unwrap();
        assert_eq!(timeframe, Timeframe::Year);
        assert_eq!(metric, Metric::Water);
    }

    #[test]
    fn test_unknown_query_values_are_bad_requests() {
        assert!(matches!(
            parse_progress_query(&query(Some("decade"), None)),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            parse_progress_query(&query(None, Some("steps"))),
            Err(ApiError::BadRequest(_))
        ));
    }
}
