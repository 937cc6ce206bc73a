//! Exercise suggestion engine
//!
//! Picks a fixed workout menu for the user's primary goal and eases off
//! high-intensity work after a short night's sleep.

use crate::daily_plan::DailyPlan;
use crate::errors::CoreError;
use crate::profile::{PrimaryGoal, Profile};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sleep below this many hours (and above zero) triggers the fatigue rule
pub const SHORT_SLEEP_HOURS: i64 = 6;

pub const CNS_PROTECTION_NOTE: &str = "⚠️ CNS Protection: Because you slept under 6 hours, we have reduced your required rounds and exertion level for this exercise to prevent injury.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    Moderate,
    High,
    Maximum,
}

impl Intensity {
    pub fn is_demanding(&self) -> bool {
        matches!(self, Intensity::High | Intensity::Maximum)
    }
}

// ============================================================================
// Static menus
// ============================================================================

/// Immutable menu row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseTemplate {
    pub category: &'static str,
    pub name: &'static str,
    pub rounds: u32,
    pub reps: &'static str,
    pub rest: &'static str,
    pub rpe: u32,
    pub target: &'static str,
    pub intensity: Intensity,
    pub instructions: Option<&'static str>,
}

/// Muscle gain and recomposition
pub const STRENGTH_MENU: &[ExerciseTemplate] = &[
    ExerciseTemplate {
        category: "Warm-up",
        name: "Dynamic Mobility Flow",
        rounds: 1,
        reps: "5 mins continuous",
        rest: "None",
        rpe: 3,
        target: "Full Body",
        intensity: Intensity::Low,
        instructions: None,
    },
    ExerciseTemplate {
        category: "Warm-up",
        name: "Jump Rope / Light Jog",
        rounds: 1,
        reps: "5-7 mins continuous",
        rest: "None",
        rpe: 4,
        target: "Cardiovascular",
        intensity: Intensity::Low,
        instructions: None,
    },
    ExerciseTemplate {
        category: "Primary Strength",
        name: "Barbell Back Squat",
        rounds: 4,
        reps: "8 reps per round",
        rest: "120 seconds",
        rpe: 8,
        target: "Quads, Glutes",
        intensity: Intensity::High,
        instructions: Some("Brace core tight before descending. Drive through the mid-foot."),
    },
    ExerciseTemplate {
        category: "Primary Strength",
        name: "Dumbbell Bulgarian Split Squats",
        rounds: 3,
        reps: "10 reps per leg per round",
        rest: "90 seconds",
        rpe: 8,
        target: "Quads, Glutes",
        intensity: Intensity::High,
        instructions: Some("Keep torso slightly forward to bias the glutes."),
    },
    ExerciseTemplate {
        category: "Hypertrophy Accessory",
        name: "Romanian Deadlifts (RDL)",
        rounds: 3,
        reps: "12 reps per round",
        rest: "90 seconds",
        rpe: 7,
        target: "Hamstrings",
        intensity: Intensity::Moderate,
        instructions: Some("Hinge at the hips, keep dumbbells close to your shins."),
    },
    ExerciseTemplate {
        category: "Hypertrophy Accessory",
        name: "Leg Press",
        rounds: 3,
        reps: "15 reps per round",
        rest: "90 seconds",
        rpe: 8,
        target: "Quads",
        intensity: Intensity::Moderate,
        instructions: Some("Control the eccentric (downward) phase for 3 seconds."),
    },
    ExerciseTemplate {
        category: "Finisher",
        name: "Sled Push / Heavy Carries",
        rounds: 4,
        reps: "20 meters per round",
        rest: "60 seconds",
        rpe: 9,
        target: "Full Body Conditioning",
        intensity: Intensity::Maximum,
        instructions: Some("Keep strides short and powerful."),
    },
    ExerciseTemplate {
        category: "Finisher",
        name: "Incline Treadmill Walk",
        rounds: 1,
        reps: "15 mins continuous",
        rest: "None",
        rpe: 6,
        target: "Cardiovascular",
        intensity: Intensity::Moderate,
        instructions: Some("Set incline to 12% and speed to 3 mph."),
    },
];

pub const FAT_LOSS_MENU: &[ExerciseTemplate] = &[
    ExerciseTemplate {
        category: "Warm-up",
        name: "Jumping Jacks & High Knees",
        rounds: 3,
        reps: "30 seconds each per round",
        rest: "30 seconds",
        rpe: 5,
        target: "Full Body",
        intensity: Intensity::Moderate,
        instructions: None,
    },
    ExerciseTemplate {
        category: "HIIT Circuit (Option A)",
        name: "Kettlebell Swings",
        rounds: 5,
        reps: "20 reps per round",
        rest: "45 seconds",
        rpe: 8,
        target: "Posterior Chain",
        intensity: Intensity::High,
        instructions: None,
    },
    ExerciseTemplate {
        category: "HIIT Circuit (Option A)",
        name: "Burpees",
        rounds: 5,
        reps: "15 reps per round",
        rest: "60 seconds",
        rpe: 9,
        target: "Full Body",
        intensity: Intensity::Maximum,
        instructions: None,
    },
    ExerciseTemplate {
        category: "LISS Cardio (Option B)",
        name: "Cycling / Rowing",
        rounds: 1,
        reps: "40 mins continuous",
        rest: "None",
        rpe: 5,
        target: "Cardiovascular",
        intensity: Intensity::Moderate,
        instructions: None,
    },
    ExerciseTemplate {
        category: "Core Finisher",
        name: "Plank to Push-up",
        rounds: 3,
        reps: "12 reps per round",
        rest: "45 seconds",
        rpe: 7,
        target: "Core, Shoulders",
        intensity: Intensity::Moderate,
        instructions: None,
    },
];

/// Menu for a goal
///
/// Maintain and endurance return an empty slice. That gap is kept on
/// purpose and callers show an empty workout.
pub fn menu_for_goal(goal: PrimaryGoal) -> &'static [ExerciseTemplate] {
    match goal {
        PrimaryGoal::MuscleGain | PrimaryGoal::Recomposition => STRENGTH_MENU,
        PrimaryGoal::FatLoss => FAT_LOSS_MENU,
        // known gap, intentionally empty
        PrimaryGoal::Maintain | PrimaryGoal::Endurance => &[],
    }
}

// ============================================================================
// Per-request entries
// ============================================================================

/// Owned copy of a template row, safe to adjust per request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub category: String,
    pub name: String,
    pub rounds: u32,
    pub reps: String,
    pub rest: String,
    pub rpe: u32,
    pub target: String,
    pub intensity: Intensity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&ExerciseTemplate> for ExerciseEntry {
    fn from(template: &ExerciseTemplate) -> Self {
        Self {
            category: template.category.to_string(),
            name: template.name.to_string(),
            rounds: template.rounds,
            reps: template.reps.to_string(),
            rest: template.rest.to_string(),
            rpe: template.rpe,
            target: template.target.to_string(),
            intensity: template.intensity,
            instructions: template.instructions.map(str::to_string),
            note: None,
        }
    }
}

/// Whether logged sleep counts as a short night: 0 < hours < 6
pub fn is_short_sleep(hours: Decimal) -> bool {
    hours > Decimal::ZERO && hours < Decimal::from(SHORT_SLEEP_HOURS)
}

/// Drop a round and two RPE points from demanding work after short sleep
pub fn apply_fatigue_adjustment(entries: &mut [ExerciseEntry], sleep_hours: Decimal) {
    if !is_short_sleep(sleep_hours) {
        return;
    }

    for entry in entries.iter_mut().filter(|e| e.intensity.is_demanding()) {
        entry.rounds = entry.rounds.saturating_sub(1).max(1);
        entry.rpe = entry.rpe.saturating_sub(2).max(1);
        entry.note = Some(CNS_PROTECTION_NOTE.to_string());
    }
}

// ============================================================================
// Engine
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSuggestion {
    pub user_goal: PrimaryGoal,
    pub date: NaiveDate,
    pub exercises: Vec<ExerciseEntry>,
}

/// Exercises sharing a category, in menu order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseGroup<'a> {
    pub category: &'a str,
    pub exercises: Vec<&'a ExerciseEntry>,
}

impl ExerciseSuggestion {
    /// Group by category, keeping first-appearance order
    pub fn grouped(&self) -> Vec<ExerciseGroup<'_>> {
        let mut groups: Vec<ExerciseGroup<'_>> = Vec::new();
        for entry in &self.exercises {
            match groups.iter_mut().find(|g| g.category == entry.category) {
                Some(group) => group.exercises.push(entry),
                None => groups.push(ExerciseGroup {
                    category: &entry.category,
                    exercises: vec![entry],
                }),
            }
        }
        groups
    }

    /// The suggestion with its category groups alongside
    pub fn with_groups(&self) -> GroupedSuggestion<'_> {
        GroupedSuggestion {
            suggestion: self,
            groups: self.grouped(),
        }
    }
}

/// Response body for the exercise endpoint
#[derive(Debug, Serialize)]
pub struct GroupedSuggestion<'a> {
    #[serde(flatten)]
    pub suggestion: &'a ExerciseSuggestion,
    pub groups: Vec<ExerciseGroup<'a>>,
}

/// Suggest a workout for `date`
///
/// `log` is the user's plan for that date, if one was generated. A plan for
/// any other date is ignored.
pub fn suggest_exercises(
    profile: Option<&Profile>,
    log: Option<&DailyPlan>,
    date: NaiveDate,
) -> Result<ExerciseSuggestion, CoreError> {
    let profile = profile.ok_or_else(CoreError::missing_profile)?;
    let goal = profile.goals.primary_goal.unwrap_or(PrimaryGoal::Maintain);

    let mut exercises: Vec<ExerciseEntry> = menu_for_goal(goal).iter().map(ExerciseEntry::from).collect();

    if let Some(plan) = log.filter(|plan| plan.date == date) {
        apply_fatigue_adjustment(&mut exercises, plan.actual_sleep());
    }

    Ok(ExerciseSuggestion {
        user_goal: goal,
        date,
        exercises,
    })
}
