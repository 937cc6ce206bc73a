//! Daily target calculator
//!
//! Derives a day's calorie and macro targets from a profile:
//! BMR (Mifflin-St Jeor) → TDEE (activity multiplier) → goal adjustment →
//! protein/fat by body weight → carbs fill the remaining energy.
//!
//! All functions are pure. Missing body metrics are rejected up front by
//! [`TargetInputs::try_from`] instead of propagating `NaN` through the math.

use crate::errors::CoreError;
use crate::profile::{
    ActivityLevel, Gender, PrimaryGoal, Profile, DEFAULT_SLEEP_TARGET_HOURS,
    DEFAULT_WATER_TARGET_LITERS,
};
use serde::{Deserialize, Serialize};

/// kcal per gram of protein
pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
/// kcal per gram of carbohydrate
pub const CARB_KCAL_PER_G: f64 = 4.0;
/// kcal per gram of fat
pub const FAT_KCAL_PER_G: f64 = 9.0;

pub const PROTEIN_G_PER_KG: f64 = 2.0;
pub const FAT_G_PER_KG: f64 = 0.8;

pub const FAT_LOSS_DEFICIT_KCAL: f64 = 500.0;
pub const MUSCLE_GAIN_SURPLUS_KCAL: f64 = 300.0;

// ============================================================================
// Inputs
// ============================================================================

/// Validated subset of a profile needed to compute targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetInputs {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: i32,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub primary_goal: Option<PrimaryGoal>,
    pub water_target: f64,
    pub sleep_target: f64,
}

fn is_usable(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v.is_finite() && v > 0.0)
}

impl TryFrom<&Profile> for TargetInputs {
    type Error = CoreError;

    fn try_from(profile: &Profile) -> Result<Self, Self::Error> {
        let basic = &profile.basic;

        let mut missing = Vec::new();
        if !is_usable(basic.weight) {
            missing.push("weight".to_string());
        }
        if !is_usable(basic.height) {
            missing.push("height".to_string());
        }
        if !matches!(basic.age, Some(age) if age > 0) {
            missing.push("age".to_string());
        }

        match (basic.weight, basic.height, basic.age) {
            (Some(weight_kg), Some(height_cm), Some(age_years)) if missing.is_empty() => {
                Ok(TargetInputs {
                    weight_kg,
                    height_cm,
                    age_years,
                    gender: basic.gender,
                    activity_level: profile.lifestyle.activity_level,
                    primary_goal: profile.goals.primary_goal,
                    water_target: profile.health.water_target,
                    sleep_target: profile.health.sleep_target,
                })
            }
            _ => Err(CoreError::IncompleteProfile { missing }),
        }
    }
}

// ============================================================================
// Outputs
// ============================================================================

/// Daily targets frozen into a plan at generation time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyTargets {
    /// kcal
    pub calories: i32,
    /// grams
    pub protein: i32,
    /// grams
    pub carbs: i32,
    /// grams
    pub fats: i32,
    /// liters, passed through unrounded
    pub water: f64,
    /// hours, passed through unrounded
    pub sleep: f64,
}

/// Unrounded macro split in grams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: f64,
    pub fats: f64,
    pub carbs: f64,
}

/// Intermediate values, shown on the profile preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetBreakdown {
    pub bmr: f64,
    pub activity_multiplier: f64,
    pub tdee: f64,
    pub targets: DailyTargets,
}

// ============================================================================
// Calculations
// ============================================================================

/// Round half up toward positive infinity (`Math.round` semantics)
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Basal Metabolic Rate using the Mifflin-St Jeor equation
///
/// Male: 10 × weight(kg) + 6.25 × height(cm) − 5 × age(y) + 5
/// Everyone else, including unset and `Other`: same base − 161
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: i32, gender: Option<Gender>) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match gender {
        Some(Gender::Male) => base + 5.0,
        _ => base - 161.0,
    }
}

/// Activity multiplier; an unset level counts as sedentary
pub fn activity_multiplier(level: Option<ActivityLevel>) -> f64 {
    match level {
        Some(ActivityLevel::Sedentary) | None => 1.2,
        Some(ActivityLevel::Light) => 1.375,
        Some(ActivityLevel::Moderate) => 1.55,
        Some(ActivityLevel::Active) => 1.725,
        Some(ActivityLevel::Athlete) => 1.9,
    }
}

/// Total Daily Energy Expenditure = BMR × activity multiplier
pub fn calculate_tdee(inputs: &TargetInputs) -> f64 {
    let bmr = calculate_bmr(inputs.weight_kg, inputs.height_cm, inputs.age_years, inputs.gender);
    bmr * activity_multiplier(inputs.activity_level)
}

/// Calorie target for a goal
///
/// Fat loss runs a 500 kcal deficit, muscle gain a 300 kcal surplus; every
/// other goal eats at maintenance.
pub fn goal_adjusted_calories(tdee: f64, goal: Option<PrimaryGoal>) -> f64 {
    match goal {
        Some(PrimaryGoal::FatLoss) => tdee - FAT_LOSS_DEFICIT_KCAL,
        Some(PrimaryGoal::MuscleGain) => tdee + MUSCLE_GAIN_SURPLUS_KCAL,
        _ => tdee,
    }
}

/// Protein and fat scale with body weight; carbs take what energy is left
pub fn calculate_macros(weight_kg: f64, calories: f64) -> MacroSplit {
    let protein = weight_kg * PROTEIN_G_PER_KG;
    let fats = weight_kg * FAT_G_PER_KG;
    let allocated = protein * PROTEIN_KCAL_PER_G + fats * FAT_KCAL_PER_G;
    let carbs = ((calories - allocated) / CARB_KCAL_PER_G).max(0.0);

    MacroSplit { protein, fats, carbs }
}

/// Falls back when a target is unset (zero) or not a number
fn target_or_default(value: f64, default: f64) -> f64 {
    if value == 0.0 || value.is_nan() {
        default
    } else {
        value
    }
}

/// Compute the full breakdown for validated inputs
pub fn calculate_breakdown(inputs: &TargetInputs) -> TargetBreakdown {
    let bmr = calculate_bmr(inputs.weight_kg, inputs.height_cm, inputs.age_years, inputs.gender);
    let multiplier = activity_multiplier(inputs.activity_level);
    let tdee = bmr * multiplier;
    let calories = goal_adjusted_calories(tdee, inputs.primary_goal);
    let macros = calculate_macros(inputs.weight_kg, calories);

    TargetBreakdown {
        bmr,
        activity_multiplier: multiplier,
        tdee,
        targets: DailyTargets {
            calories: round_half_up(calories) as i32,
            protein: round_half_up(macros.protein) as i32,
            carbs: round_half_up(macros.carbs) as i32,
            fats: round_half_up(macros.fats) as i32,
            water: target_or_default(inputs.water_target, DEFAULT_WATER_TARGET_LITERS),
            sleep: target_or_default(inputs.sleep_target, DEFAULT_SLEEP_TARGET_HOURS),
        },
    }
}

/// Daily calorie/macro/water/sleep targets for validated inputs
pub fn compute_daily_targets(inputs: &TargetInputs) -> DailyTargets {
    calculate_breakdown(inputs).targets
}

/// Validate a profile and compute its targets in one step
pub fn daily_targets_for(profile: &Profile) -> Result<DailyTargets, CoreError> {
    let inputs = TargetInputs::try_from(profile)?;
    Ok(compute_daily_targets(&inputs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn inputs(
        weight: f64,
        height: f64,
        age: i32,
        gender: Option<Gender>,
        activity: Option<ActivityLevel>,
        goal: Option<PrimaryGoal>,
    ) -> TargetInputs {
        TargetInputs {
            weight_kg: weight,
            height_cm: height,
            age_years: age,
            gender,
            activity_level: activity,
            primary_goal: goal,
            water_target: 3.0,
            sleep_target: 8.0,
        }
    }

    fn complete_profile() -> Profile {
        let mut profile = Profile::default();
        profile.basic.weight = Some(70.0);
        profile.basic.height = Some(175.0);
        profile.basic.age = Some(30);
        profile.basic.gender = Some(Gender::Male);
        profile.lifestyle.activity_level = Some(ActivityLevel::Sedentary);
        profile.goals.primary_goal = Some(PrimaryGoal::FatLoss);
        profile
    }

    // =========================================================================
    // Reference values
    // =========================================================================

    #[test]
    fn test_reference_male_sedentary_fat_loss() {
        let breakdown = calculate_breakdown(&TargetInputs::try_from(&complete_profile()).unwrap());

        assert!((breakdown.bmr - 1648.75).abs() < 1e-9);
        assert!((breakdown.tdee - 1978.5).abs() < 1e-9);

        let targets = breakdown.targets;
        assert_eq!(targets.calories, 1479);
        assert_eq!(targets.protein, 140);
        assert_eq!(targets.fats, 56);
        // (1478.5 - (560 + 504)) / 4 = 103.625
        assert_eq!(targets.carbs, 104);
        assert_eq!(targets.water, 3.0);
        assert_eq!(targets.sleep, 8.0);
    }

    #[test]
    fn test_female_takes_minus_161_branch() {
        let bmr = calculate_bmr(70.0, 175.0, 30, Some(Gender::Female));
        assert!((bmr - 1482.75).abs() < 1e-9);
    }

    #[test]
    fn test_unset_gender_takes_minus_161_branch() {
        assert_eq!(
            calculate_bmr(70.0, 175.0, 30, None),
            calculate_bmr(70.0, 175.0, 30, Some(Gender::Female))
        );
    }

    #[rstest]
    #[case(Some(ActivityLevel::Sedentary), 1.2)]
    #[case(Some(ActivityLevel::Light), 1.375)]
    #[case(Some(ActivityLevel::Moderate), 1.55)]
    #[case(Some(ActivityLevel::Active), 1.725)]
    #[case(Some(ActivityLevel::Athlete), 1.9)]
    #[case(None, 1.2)]
    fn test_activity_multipliers(#[case] level: Option<ActivityLevel>, #[case] expected: f64) {
        assert_eq!(activity_multiplier(level), expected);
    }

    #[rstest]
    #[case(Some(PrimaryGoal::FatLoss), 1500.0)]
    #[case(Some(PrimaryGoal::MuscleGain), 2300.0)]
    #[case(Some(PrimaryGoal::Recomposition), 2000.0)]
    #[case(Some(PrimaryGoal::Maintain), 2000.0)]
    #[case(Some(PrimaryGoal::Endurance), 2000.0)]
    #[case(None, 2000.0)]
    fn test_goal_adjustment(#[case] goal: Option<PrimaryGoal>, #[case] expected: f64) {
        assert_eq!(goal_adjusted_calories(2000.0, goal), expected);
    }

    #[test]
    fn test_carbs_floor_at_zero() {
        // 150 kg needs 600 g protein energy + 108 g fat energy = 2280 kcal > 1200
        let macros = calculate_macros(150.0, 1200.0);
        assert_eq!(macros.carbs, 0.0);
    }

    #[rstest]
    #[case(1478.5, 1479.0)]
    #[case(103.625, 104.0)]
    #[case(2.4999, 2.0)]
    #[case(-2.5, -2.0)]
    #[case(-2.6, -3.0)]
    fn test_round_half_up(#[case] value: f64, #[case] expected: f64) {
        assert_eq!(round_half_up(value), expected);
    }

    #[test]
    fn test_water_and_sleep_pass_through_unrounded() {
        let mut profile = complete_profile();
        profile.health.water_target = 2.75;
        profile.health.sleep_target = 7.5;

        let targets = daily_targets_for(&profile).unwrap();
        assert_eq!(targets.water, 2.75);
        assert_eq!(targets.sleep, 7.5);
    }

    #[test]
    fn test_zero_water_and_sleep_fall_back_to_defaults() {
        let mut profile = complete_profile();
        profile.health.water_target = 0.0;
        profile.health.sleep_target = 0.0;

        let targets = daily_targets_for(&profile).unwrap();
        assert_eq!(targets.water, 3.0);
        assert_eq!(targets.sleep, 8.0);
    }

    // =========================================================================
    // Preconditions
    // =========================================================================

    #[test]
    fn test_missing_metrics_are_reported() {
        let err = daily_targets_for(&Profile::default()).unwrap_err();
        assert_eq!(
            err,
            CoreError::IncompleteProfile {
                missing: vec!["weight".to_string(), "height".to_string(), "age".to_string()]
            }
        );
    }

    #[test]
    fn test_non_positive_metrics_are_rejected() {
        let mut profile = complete_profile();
        profile.basic.weight = Some(0.0);
        profile.basic.height = Some(f64::NAN);

        match daily_targets_for(&profile) {
            Err(CoreError::IncompleteProfile { missing }) => {
                assert_eq!(missing, vec!["weight".to_string(), "height".to_string()]);
            }
            other => panic!("expected IncompleteProfile, got {:?}", other),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn gender_strategy() -> impl Strategy<Value = Option<Gender>> {
        prop_oneof![
            Just(None),
            Just(Some(Gender::Male)),
            Just(Some(Gender::Female)),
            Just(Some(Gender::Other)),
        ]
    }

    fn activity_strategy() -> impl Strategy<Value = Option<ActivityLevel>> {
        prop_oneof![
            Just(None),
            Just(Some(ActivityLevel::Sedentary)),
            Just(Some(ActivityLevel::Light)),
            Just(Some(ActivityLevel::Moderate)),
            Just(Some(ActivityLevel::Active)),
            Just(Some(ActivityLevel::Athlete)),
        ]
    }

    fn goal_strategy() -> impl Strategy<Value = Option<PrimaryGoal>> {
        prop_oneof![
            Just(None),
            Just(Some(PrimaryGoal::FatLoss)),
            Just(Some(PrimaryGoal::MuscleGain)),
            Just(Some(PrimaryGoal::Recomposition)),
            Just(Some(PrimaryGoal::Maintain)),
            Just(Some(PrimaryGoal::Endurance)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: carbs are never negative
        #[test]
        fn prop_carbs_never_negative(
            weight in 20.0f64..500.0,
            height in 50.0f64..300.0,
            age in 1i32..150,
            gender in gender_strategy(),
            activity in activity_strategy(),
            goal in goal_strategy(),
        ) {
            let targets = compute_daily_targets(&inputs(weight, height, age, gender, activity, goal));
            prop_assert!(targets.carbs >= 0);
        }

        /// Property: macro energy adds back up to the calorie target
        ///
        /// Weights are multiples of 5 kg so the fat target (0.8 g/kg) is whole
        /// and only calories and carbs contribute rounding error.
        #[test]
        fn prop_macro_energy_balances_calories(
            weight_steps in 8u32..30,
            height in 140.0f64..210.0,
            age in 18i32..80,
            gender in gender_strategy(),
            activity in activity_strategy(),
            goal in goal_strategy(),
        ) {
            let weight = weight_steps as f64 * 5.0;
            let input = inputs(weight, height, age, gender, activity, goal);
            let breakdown = calculate_breakdown(&input);
            let raw_calories = goal_adjusted_calories(breakdown.tdee, goal);
            let split = calculate_macros(weight, raw_calories);
            prop_assume!(split.carbs > 0.0);

            let t = breakdown.targets;
            let energy = t.protein * 4 + t.fats * 9 + t.carbs * 4;
            prop_assert!(
                (energy - t.calories).abs() <= 4,
                "macro energy {} vs calories {}", energy, t.calories
            );
        }

        /// Property: Other and Female share the same BMR
        #[test]
        fn prop_other_matches_female_bmr(
            weight in 20.0f64..500.0,
            height in 50.0f64..300.0,
            age in 1i32..150,
        ) {
            prop_assert_eq!(
                calculate_bmr(weight, height, age, Some(Gender::Other)),
                calculate_bmr(weight, height, age, Some(Gender::Female))
            );
        }

        /// Property: Male BMR is exactly 166 kcal above the non-male branch
        #[test]
        fn prop_male_offset(
            weight in 20.0f64..500.0,
            height in 50.0f64..300.0,
            age in 1i32..150,
        ) {
            let male = calculate_bmr(weight, height, age, Some(Gender::Male));
            let female = calculate_bmr(weight, height, age, Some(Gender::Female));
            prop_assert!((male - female - 166.0).abs() < 1e-6);
        }

        /// Property: protein and fat depend only on weight
        #[test]
        fn prop_protein_and_fat_scale_with_weight(weight_steps in 4u32..100) {
            let weight = weight_steps as f64 * 5.0;
            let targets = compute_daily_targets(&inputs(weight, 175.0, 30, None, None, None));
            prop_assert_eq!(targets.protein, (weight * 2.0) as i32);
            prop_assert_eq!(targets.fats, round_half_up(weight * 0.8) as i32);
        }
    }
}
