//! Profile repository
//!
//! One row per user. Section structs are flattened into columns; enums are
//! stored as their `as_str()` spelling.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use nutrigen_shared::profile::{BasicInfo, Goals, HealthInfo, Lifestyle, Profile};
use sqlx::{PgExecutor, PgPool};
use std::str::FromStr;
use uuid::Uuid;

/// Profile record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub user_id: Uuid,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub region_food_preference: Option<String>,
    pub activity_level: Option<String>,
    pub steps_per_day: Option<i32>,
    pub job_type: Option<String>,
    pub primary_goal: Option<String>,
    pub target_weight_kg: Option<f64>,
    pub timeline_weeks: Option<i32>,
    pub medical_conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub medications: Vec<String>,
    pub sleep_target: f64,
    pub water_target: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn parse_opt<T: FromStr<Err = String>>(value: Option<String>) -> Result<Option<T>> {
    value
        .map(|v| v.parse::<T>())
        .transpose()
        .map_err(|e| anyhow!(e))
}

impl ProfileRecord {
    pub fn to_profile(&self) -> Result<Profile> {
        Ok(Profile {
            basic: BasicInfo {
                age: self.age,
                gender: parse_opt(self.gender.clone())?,
                height: self.height_cm,
                weight: self.weight_kg,
                body_fat: self.body_fat_pct,
                region_food_preference: self.region_food_preference.clone(),
            },
            lifestyle: Lifestyle {
                activity_level: parse_opt(self.activity_level.clone())?,
                steps_per_day: self.steps_per_day,
                job_type: parse_opt(self.job_type.clone())?,
            },
            goals: Goals {
                primary_goal: parse_opt(self.primary_goal.clone())?,
                target_weight: self.target_weight_kg,
                timeline_weeks: self.timeline_weeks,
            },
            health: HealthInfo {
                medical_conditions: self.medical_conditions.clone(),
                allergies: self.allergies.clone(),
                medications: self.medications.clone(),
                sleep_target: self.sleep_target,
                water_target: self.water_target,
            },
        })
    }
}

const PROFILE_COLUMNS: &str = "user_id, age, gender, height_cm, weight_kg, body_fat_pct, \
    region_food_preference, activity_level, steps_per_day, job_type, primary_goal, \
    target_weight_kg, timeline_weeks, medical_conditions, allergies, medications, \
    sleep_target, water_target, created_at, updated_at";

/// Profile repository for database operations
pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn find(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRecord>> {
        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn exists(pool: &PgPool, user_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM profiles WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Insert or fully overwrite the user's profile row
    pub async fn upsert<'e>(
        executor: impl PgExecutor<'e>,
        user_id: Uuid,
        profile: &Profile,
    ) -> Result<ProfileRecord> {
        let basic = &profile.basic;
        let lifestyle = &profile.lifestyle;
        let goals = &profile.goals;
        let health = &profile.health;

        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            r#"
            INSERT INTO profiles (
                user_id, age, gender, height_cm, weight_kg, body_fat_pct,
                region_food_preference, activity_level, steps_per_day, job_type,
                primary_goal, target_weight_kg, timeline_weeks,
                medical_conditions, allergies, medications, sleep_target, water_target
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT (user_id) DO UPDATE SET
                age = EXCLUDED.age,
                gender = EXCLUDED.gender,
                height_cm = EXCLUDED.height_cm,
                weight_kg = EXCLUDED.weight_kg,
                body_fat_pct = EXCLUDED.body_fat_pct,
                region_food_preference = EXCLUDED.region_food_preference,
                activity_level = EXCLUDED.activity_level,
                steps_per_day = EXCLUDED.steps_per_day,
                job_type = EXCLUDED.job_type,
                primary_goal = EXCLUDED.primary_goal,
                target_weight_kg = EXCLUDED.target_weight_kg,
                timeline_weeks = EXCLUDED.timeline_weeks,
                medical_conditions = EXCLUDED.medical_conditions,
                allergies = EXCLUDED.allergies,
                medications = EXCLUDED.medications,
                sleep_target = EXCLUDED.sleep_target,
                water_target = EXCLUDED.water_target,
                updated_at = NOW()
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(basic.age)
        .bind(basic.gender.map(|g| g.as_str()))
        .bind(basic.height)
        .bind(basic.weight)
        .bind(basic.body_fat)
        .bind(basic.region_food_preference.as_deref())
        .bind(lifestyle.activity_level.map(|a| a.as_str()))
        .bind(lifestyle.steps_per_day)
        .bind(lifestyle.job_type.map(|j| j.as_str()))
        .bind(goals.primary_goal.map(|g| g.as_str()))
        .bind(goals.target_weight)
        .bind(goals.timeline_weeks)
        .bind(&health.medical_conditions)
        .bind(&health.allergies)
        .bind(&health.medications)
        .bind(health.sleep_target)
        .bind(health.water_target)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }
}
