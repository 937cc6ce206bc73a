//! Daily plan repository
//!
//! Plans are unique per `(user_id, plan_date)`. Mutations of `actuals` go
//! through [`DailyPlanRepository::lock_by_date`] inside a transaction so
//! concurrent logs on the same plan serialize on the row lock.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use nutrigen_shared::daily_plan::{ConsumedItem, DailyPlan, NutrientTotals};
use nutrigen_shared::health_metrics::DailyTargets;
use nutrigen_shared::progress::PlanSnapshot;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Plan row without its items
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyPlanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_date: NaiveDate,
    pub target_calories: i32,
    pub target_protein: i32,
    pub target_carbs: i32,
    pub target_fats: i32,
    pub target_water: f64,
    pub target_sleep: f64,
    pub actual_calories: Decimal,
    pub actual_protein: Decimal,
    pub actual_carbs: Decimal,
    pub actual_fats: Decimal,
    pub actual_water: Decimal,
    pub actual_sleep: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyPlanRecord {
    fn targets(&self) -> DailyTargets {
        DailyTargets {
            calories: self.target_calories,
            protein: self.target_protein,
            carbs: self.target_carbs,
            fats: self.target_fats,
            water: self.target_water,
            sleep: self.target_sleep,
        }
    }

    fn actuals(&self) -> NutrientTotals {
        NutrientTotals {
            calories: self.actual_calories,
            protein: self.actual_protein,
            carbs: self.actual_carbs,
            fats: self.actual_fats,
            water: self.actual_water,
            sleep: self.actual_sleep,
        }
    }

    pub fn into_plan(self, items: Vec<ConsumedItemRecord>) -> DailyPlan {
        DailyPlan {
            id: self.id,
            user_id: self.user_id,
            date: self.plan_date,
            targets: self.targets(),
            actuals: self.actuals(),
            consumed_items: items.into_iter().map(ConsumedItem::from).collect(),
        }
    }

    pub fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            date: self.plan_date,
            targets: self.targets(),
            actuals: self.actuals(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConsumedItemRecord {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub name: String,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fats: Decimal,
    pub consumed_at: DateTime<Utc>,
}

impl From<ConsumedItemRecord> for ConsumedItem {
    fn from(record: ConsumedItemRecord) -> Self {
        ConsumedItem {
            id: record.id,
            name: record.name,
            calories: record.calories,
            protein: record.protein,
            carbs: record.carbs,
            fats: record.fats,
            time: record.consumed_at,
        }
    }
}

const PLAN_COLUMNS: &str = "id, user_id, plan_date, target_calories, target_protein, \
    target_carbs, target_fats, target_water, target_sleep, actual_calories, actual_protein, \
    actual_carbs, actual_fats, actual_water, actual_sleep, created_at, updated_at";

/// Daily plan repository for database operations
pub struct DailyPlanRepository;

impl DailyPlanRepository {
    /// Insert a freshly generated plan
    ///
    /// Returns `None` when a plan already exists for the user and date; the
    /// unique constraint decides the winner of concurrent generate requests.
    pub async fn insert(pool: &PgPool, plan: &DailyPlan) -> Result<Option<DailyPlanRecord>> {
        let t = &plan.targets;
        let a = &plan.actuals;

        let record = sqlx::query_as::<_, DailyPlanRecord>(&format!(
            r#"
            INSERT INTO daily_plans (
                id, user_id, plan_date,
                target_calories, target_protein, target_carbs, target_fats,
                target_water, target_sleep,
                actual_calories, actual_protein, actual_carbs, actual_fats,
                actual_water, actual_sleep
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (user_id, plan_date) DO NOTHING
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(plan.id)
        .bind(plan.user_id)
        .bind(plan.date)
        .bind(t.calories)
        .bind(t.protein)
        .bind(t.carbs)
        .bind(t.fats)
        .bind(t.water)
        .bind(t.sleep)
        .bind(a.calories)
        .bind(a.protein)
        .bind(a.carbs)
        .bind(a.fats)
        .bind(a.water)
        .bind(a.sleep)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Plan for a user and date, with its items in logging order
    pub async fn find_by_date(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<Option<DailyPlan>> {
        let record = sqlx::query_as::<_, DailyPlanRecord>(&format!(
            "SELECT {PLAN_COLUMNS} FROM daily_plans WHERE user_id = $1 AND plan_date = $2"
        ))
        .bind(user_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;

        let Some(record) = record else {
            return Ok(None);
        };
        let items = Self::items(pool, record.id).await?;
        Ok(Some(record.into_plan(items)))
    }

    /// Same as [`Self::find_by_date`] but holds the row lock until the
    /// transaction owning `conn` ends
    pub async fn lock_by_date(conn: &mut PgConnection, user_id: Uuid, date: NaiveDate) -> Result<Option<DailyPlan>> {
        let record = sqlx::query_as::<_, DailyPlanRecord>(&format!(
            "SELECT {PLAN_COLUMNS} FROM daily_plans WHERE user_id = $1 AND plan_date = $2 FOR UPDATE"
        ))
        .bind(user_id)
        .bind(date)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(record) = record else {
            return Ok(None);
        };
        let items = Self::items(&mut *conn, record.id).await?;
        Ok(Some(record.into_plan(items)))
    }

    async fn items<'e>(executor: impl sqlx::PgExecutor<'e>, plan_id: Uuid) -> Result<Vec<ConsumedItemRecord>> {
        let items = sqlx::query_as::<_, ConsumedItemRecord>(
            r#"
            SELECT id, plan_id, name, calories, protein, carbs, fats, consumed_at
            FROM consumed_items
            WHERE plan_id = $1
            ORDER BY consumed_at, id
            "#,
        )
        .bind(plan_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    pub async fn save_actuals(conn: &mut PgConnection, plan_id: Uuid, actuals: &NutrientTotals) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE daily_plans SET
                actual_calories = $2,
                actual_protein = $3,
                actual_carbs = $4,
                actual_fats = $5,
                actual_water = $6,
                actual_sleep = $7,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(plan_id)
        .bind(actuals.calories)
        .bind(actuals.protein)
        .bind(actuals.carbs)
        .bind(actuals.fats)
        .bind(actuals.water)
        .bind(actuals.sleep)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn insert_item(conn: &mut PgConnection, plan_id: Uuid, item: &ConsumedItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO consumed_items (id, plan_id, name, calories, protein, carbs, fats, consumed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(item.id)
        .bind(plan_id)
        .bind(&item.name)
        .bind(item.calories)
        .bind(item.protein)
        .bind(item.carbs)
        .bind(item.fats)
        .bind(item.time)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn delete_item(conn: &mut PgConnection, plan_id: Uuid, item_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM consumed_items WHERE id = $1 AND plan_id = $2")
            .bind(item_id)
            .bind(plan_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Snapshots in date order, optionally only from `since` onward
    pub async fn list_snapshots(pool: &PgPool, user_id: Uuid, since: Option<NaiveDate>) -> Result<Vec<PlanSnapshot>> {
        let records = sqlx::query_as::<_, DailyPlanRecord>(&format!(
            r#"
            SELECT {PLAN_COLUMNS} FROM daily_plans
            WHERE user_id = $1 AND ($2::DATE IS NULL OR plan_date >= $2)
            ORDER BY plan_date ASC
            "#
        ))
        .bind(user_id)
        .bind(since)
        .fetch_all(pool)
        .await?;

        Ok(records.iter().map(DailyPlanRecord::snapshot).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record() -> DailyPlanRecord {
        DailyPlanRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            target_calories: 1479,
            target_protein: 140,
            target_carbs: 104,
            target_fats: 56,
            target_water: 3.0,
            target_sleep: 8.0,
            actual_calories: Decimal::from_str("550.5").unwrap(),
            actual_protein: Decimal::from(40),
            actual_carbs: Decimal::ZERO,
            actual_fats: Decimal::ZERO,
            actual_water: Decimal::from_str("1.5").unwrap(),
            actual_sleep: Decimal::from(7),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_record_into_plan_keeps_items_in_order() {
        let record = record();
        let item = |name: &str| ConsumedItemRecord {
            id: Uuid::new_v4(),
            plan_id: record.id,
            name: name.to_string(),
            calories: Decimal::from(100),
            protein: Decimal::ZERO,
            carbs: Decimal::ZERO,
            fats: Decimal::ZERO,
            consumed_at: Utc::now(),
        };
        let plan = record.clone().into_plan(vec![item("Oats"), item("Dal")]);

        assert_eq!(plan.targets.calories, 1479);
        assert_eq!(plan.actuals.calories, Decimal::from_str("550.5").unwrap());
        let names: Vec<&str> = plan.consumed_items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Oats", "Dal"]);
    }

    #[test]
    fn test_snapshot_matches_plan() {
        let record = record();
        let snapshot = record.snapshot();
        let plan = record.into_plan(vec![]);
        assert_eq!(snapshot, PlanSnapshot::from(&plan));
    }
}
