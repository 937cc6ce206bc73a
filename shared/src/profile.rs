//! User health profile
//!
//! The profile is owned one-to-one by a user and upserted section by section.
//! Every scalar is optional: users fill the form gradually, and consumers that
//! need a value (the Target Calculator) check for it explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Enumerations
// ============================================================================

/// Gender as entered on the profile form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// Self-reported daily activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Twice-daily training or a physical job
    Athlete,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::Athlete => "athlete",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "athlete" => Ok(ActivityLevel::Athlete),
            _ => Err(format!("Unknown activity level: {}", s)),
        }
    }
}

/// Kind of job, used for context only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Desk,
    Field,
    Mixed,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Desk => "desk",
            JobType::Field => "field",
            JobType::Mixed => "mixed",
        }
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "desk" => Ok(JobType::Desk),
            "field" => Ok(JobType::Field),
            "mixed" => Ok(JobType::Mixed),
            _ => Err(format!("Unknown job type: {}", s)),
        }
    }
}

/// Primary training/nutrition goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryGoal {
    FatLoss,
    MuscleGain,
    Recomposition,
    Maintain,
    Endurance,
}

impl PrimaryGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryGoal::FatLoss => "fat_loss",
            PrimaryGoal::MuscleGain => "muscle_gain",
            PrimaryGoal::Recomposition => "recomposition",
            PrimaryGoal::Maintain => "maintain",
            PrimaryGoal::Endurance => "endurance",
        }
    }
}

impl fmt::Display for PrimaryGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimaryGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fat_loss" => Ok(PrimaryGoal::FatLoss),
            "muscle_gain" => Ok(PrimaryGoal::MuscleGain),
            "recomposition" => Ok(PrimaryGoal::Recomposition),
            "maintain" => Ok(PrimaryGoal::Maintain),
            "endurance" => Ok(PrimaryGoal::Endurance),
            _ => Err(format!("Unknown goal: {}", s)),
        }
    }
}

// ============================================================================
// Profile sections
// ============================================================================

/// Body metrics and food preference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicInfo {
    /// Age in years
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    /// Height in centimeters
    pub height: Option<f64>,
    /// Weight in kilograms
    pub weight: Option<f64>,
    /// Body fat percentage
    pub body_fat: Option<f64>,
    /// Free text such as "Indian" or "Mediterranean"
    pub region_food_preference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lifestyle {
    pub activity_level: Option<ActivityLevel>,
    pub steps_per_day: Option<i32>,
    pub job_type: Option<JobType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Goals {
    pub primary_goal: Option<PrimaryGoal>,
    /// Target weight in kilograms
    pub target_weight: Option<f64>,
    pub timeline_weeks: Option<i32>,
}

pub const DEFAULT_SLEEP_TARGET_HOURS: f64 = 8.0;
pub const DEFAULT_WATER_TARGET_LITERS: f64 = 3.0;

fn default_sleep_target() -> f64 {
    DEFAULT_SLEEP_TARGET_HOURS
}

fn default_water_target() -> f64 {
    DEFAULT_WATER_TARGET_LITERS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthInfo {
    #[serde(default)]
    pub medical_conditions: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    /// Hours of sleep per night
    #[serde(default = "default_sleep_target")]
    pub sleep_target: f64,
    /// Liters of water per day
    #[serde(default = "default_water_target")]
    pub water_target: f64,
}

impl Default for HealthInfo {
    fn default() -> Self {
        Self {
            medical_conditions: Vec::new(),
            allergies: Vec::new(),
            medications: Vec::new(),
            sleep_target: DEFAULT_SLEEP_TARGET_HOURS,
            water_target: DEFAULT_WATER_TARGET_LITERS,
        }
    }
}

/// Complete health profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub basic: BasicInfo,
    pub lifestyle: Lifestyle,
    pub goals: Goals,
    pub health: HealthInfo,
}

/// Partial profile submitted by the profile form
///
/// Each section that is present replaces the stored section as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic: Option<BasicInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifestyle: Option<Lifestyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<Goals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthInfo>,
}

impl Profile {
    /// Region key used to pick a meal menu
    ///
    /// Lower-cased preference, or `"global"` when none was entered.
    pub fn region_key(&self) -> String {
        match self.basic.region_food_preference.as_deref() {
            Some(region) if !region.is_empty() => region.to_lowercase(),
            _ => "global".to_string(),
        }
    }

    /// Exact, case-sensitive allergy lookup
    pub fn has_allergy(&self, allergy: &str) -> bool {
        self.health.allergies.iter().any(|a| a == allergy)
    }

    /// Apply a section-wise update and return the merged profile
    pub fn merge(mut self, update: ProfileUpdate) -> Self {
        if let Some(basic) = update.basic {
            self.basic = basic;
        }
        if let Some(lifestyle) = update.lifestyle {
            self.lifestyle = lifestyle;
        }
        if let Some(goals) = update.goals {
            self.goals = goals;
        }
        if let Some(health) = update.health {
            self.health = health;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_profile_json_uses_enum_spellings() {
        let json = serde_json::json!({
            "basic": { "age": 30, "gender": "Male", "height": 175.0, "weight": 70.0 },
            "lifestyle": { "activity_level": "moderate", "job_type": "desk" },
            "goals": { "primary_goal": "fat_loss" },
            "health": { "allergies": ["dairy"] }
        });
        let profile: Profile = serde_json::from_value(json).unwrap();

        assert_eq!(profile.basic.gender, Some(Gender::Male));
        assert_eq!(profile.lifestyle.activity_level, Some(ActivityLevel::Moderate));
        assert_eq!(profile.goals.primary_goal, Some(PrimaryGoal::FatLoss));
        assert_eq!(profile.health.sleep_target, 8.0);
        assert_eq!(profile.health.water_target, 3.0);
    }

    #[test]
    fn test_empty_json_is_empty_profile() {
        let profile: Profile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile, Profile::default());
    }

    #[rstest]
    #[case(Some("Indian"), "indian")]
    #[case(Some("MEDITERRANEAN"), "mediterranean")]
    #[case(Some(""), "global")]
    #[case(None, "global")]
    fn test_region_key(#[case] preference: Option<&str>, #[case] expected: &str) {
        let mut profile = Profile::default();
        profile.basic.region_food_preference = preference.map(str::to_string);
        assert_eq!(profile.region_key(), expected);
    }

    #[test]
    fn test_allergy_lookup_is_exact() {
        let mut profile = Profile::default();
        profile.health.allergies = vec!["dairy".to_string()];
        assert!(profile.has_allergy("dairy"));
        assert!(!profile.has_allergy("Dairy"));
        assert!(!profile.has_allergy("peanuts"));
    }

    #[test]
    fn test_merge_replaces_only_present_sections() {
        let mut stored = Profile::default();
        stored.basic.weight = Some(80.0);
        stored.goals.primary_goal = Some(PrimaryGoal::Maintain);

        let update = ProfileUpdate {
            goals: Some(Goals {
                primary_goal: Some(PrimaryGoal::FatLoss),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = stored.merge(update);

        assert_eq!(merged.basic.weight, Some(80.0));
        assert_eq!(merged.goals.primary_goal, Some(PrimaryGoal::FatLoss));
    }

    #[rstest]
    #[case("sedentary", ActivityLevel::Sedentary)]
    #[case("LIGHT", ActivityLevel::Light)]
    #[case("Athlete", ActivityLevel::Athlete)]
    fn test_activity_level_from_str(#[case] input: &str, #[case] expected: ActivityLevel) {
        assert_eq!(input.parse::<ActivityLevel>().unwrap(), expected);
    }

    #[test]
    fn test_enum_round_trip_through_str() {
        for goal in [
            PrimaryGoal::FatLoss,
            PrimaryGoal::MuscleGain,
            PrimaryGoal::Recomposition,
            PrimaryGoal::Maintain,
            PrimaryGoal::Endurance,
        ] {
            assert_eq!(goal.as_str().parse::<PrimaryGoal>().unwrap(), goal);
        }
        assert!("lightly_active".parse::<ActivityLevel>().is_err());
        assert!("unknown".parse::<Gender>().is_err());
    }
}
