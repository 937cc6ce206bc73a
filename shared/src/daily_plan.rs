//! Daily plan accumulation
//!
//! A plan is generated once per user per date with frozen targets, then
//! mutated by additive intake logging. Totals are kept as [`Decimal`] so a
//! log followed by the matching delete restores `actuals` exactly.

use crate::errors::CoreError;
use crate::health_metrics::DailyTargets;
use crate::validation::validate_intake_amount;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::Neg;
use uuid::Uuid;

pub const DEFAULT_ITEM_NAME: &str = "Quick Log";

// ============================================================================
// Nutrient totals
// ============================================================================

/// Six tracked quantities: kcal, grams of each macro, liters, hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NutrientTotals {
    #[serde(with = "rust_decimal::serde::float")]
    pub calories: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub protein: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub carbs: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fats: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub water: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub sleep: Decimal,
}

impl NutrientTotals {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Field-wise sum, `None` if any field leaves the `Decimal` range
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(Self {
            calories: self.calories.checked_add(rhs.calories)?,
            protein: self.protein.checked_add(rhs.protein)?,
            carbs: self.carbs.checked_add(rhs.carbs)?,
            fats: self.fats.checked_add(rhs.fats)?,
            water: self.water.checked_add(rhs.water)?,
            sleep: self.sleep.checked_add(rhs.sleep)?,
        })
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.checked_add(-rhs)
    }
}

fn out_of_range() -> CoreError {
    CoreError::Validation("Daily totals are out of range".to_string())
}

impl Neg for NutrientTotals {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            calories: -self.calories,
            protein: -self.protein,
            carbs: -self.carbs,
            fats: -self.fats,
            water: -self.water,
            sleep: -self.sleep,
        }
    }
}

// ============================================================================
// Logged items
// ============================================================================

/// A food entry in the plan's consumed list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumedItem {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub calories: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub protein: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub carbs: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fats: Decimal,
    pub time: DateTime<Utc>,
}

impl ConsumedItem {
    /// Macro contribution of this item; water and sleep are never itemised
    pub fn macros(&self) -> NutrientTotals {
        NutrientTotals {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fats: self.fats,
            ..NutrientTotals::zero()
        }
    }
}

/// Intake log request; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogIntake {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fats: Option<f64>,
    #[serde(default)]
    pub water: Option<f64>,
    #[serde(default)]
    pub sleep: Option<f64>,
}

fn to_decimal(field: &str, value: Option<f64>) -> Result<Decimal, CoreError> {
    let value = value.unwrap_or(0.0);
    validate_intake_amount(field, value).map_err(CoreError::Validation)?;
    Decimal::try_from(value)
        .map_err(|_| CoreError::Validation(format!("{} is out of range", field)))
}

impl LogIntake {
    /// Check every supplied amount is a finite, non-negative number
    pub fn validate(&self) -> Result<(), CoreError> {
        self.totals().map(|_| ())
    }

    /// Amounts to add to `actuals`, missing fields counted as zero
    pub fn totals(&self) -> Result<NutrientTotals, CoreError> {
        Ok(NutrientTotals {
            calories: to_decimal("calories", self.calories)?,
            protein: to_decimal("protein", self.protein)?,
            carbs: to_decimal("carbs", self.carbs)?,
            fats: to_decimal("fats", self.fats)?,
            water: to_decimal("water", self.water)?,
            sleep: to_decimal("sleep", self.sleep)?,
        })
    }

    /// Item name, defaulting to "Quick Log" when absent or blank
    pub fn item_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_ITEM_NAME.to_string(),
        }
    }
}

// ============================================================================
// Daily plan
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub targets: DailyTargets,
    pub actuals: NutrientTotals,
    pub consumed_items: Vec<ConsumedItem>,
}

impl DailyPlan {
    /// A fresh plan: frozen targets, zeroed actuals, nothing consumed
    pub fn generate(user_id: Uuid, date: NaiveDate, targets: DailyTargets) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            targets,
            actuals: NutrientTotals::zero(),
            consumed_items: Vec::new(),
        }
    }

    /// Add an intake to `actuals` and append the food item
    ///
    /// Water and sleep accumulate into `actuals` but are not part of the
    /// item, so removing the item later leaves them in place.
    pub fn log_intake(&mut self, intake: &LogIntake, time: DateTime<Utc>) -> Result<ConsumedItem, CoreError> {
        let totals = intake.totals()?;
        let actuals = self.actuals.checked_add(totals).ok_or_else(out_of_range)?;

        let item = ConsumedItem {
            id: Uuid::new_v4(),
            name: intake.item_name(),
            calories: totals.calories,
            protein: totals.protein,
            carbs: totals.carbs,
            fats: totals.fats,
            time,
        };

        self.actuals = actuals;
        self.consumed_items.push(item.clone());
        Ok(item)
    }

    /// Remove an item and subtract its macros from `actuals`
    pub fn remove_item(&mut self, item_id: Uuid) -> Result<ConsumedItem, CoreError> {
        let index = self
            .consumed_items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or(CoreError::ItemNotFound(item_id))?;

        self.actuals = self
            .actuals
            .checked_sub(self.consumed_items[index].macros())
            .ok_or_else(out_of_range)?;
        Ok(self.consumed_items.remove(index))
    }

    /// Calorie target minus calories consumed so far (may be negative)
    pub fn remaining_calories(&self) -> Decimal {
        Decimal::from(self.targets.calories) - self.actuals.calories
    }

    pub fn actual_sleep(&self) -> Decimal {
        self.actuals.sleep
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Where a user stands for a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "date", rename_all = "snake_case")]
pub enum PlanState {
    NoProfile,
    NoPlanToday,
    PlanActive(NaiveDate),
}

impl PlanState {
    /// Resolve the state for `today`
    ///
    /// There is no rollover job: a plan from an earlier date simply stops
    /// counting once the date changes.
    pub fn resolve(has_profile: bool, latest_plan: Option<&DailyPlan>, today: NaiveDate) -> Self {
        if !has_profile {
            return PlanState::NoProfile;
        }
        match latest_plan {
            Some(plan) if plan.date == today => PlanState::PlanActive(today),
            _ => PlanState::NoPlanToday,
        }
    }

    /// Generation is only allowed from `NoPlanToday`
    pub fn can_generate(&self) -> bool {
        matches!(self, PlanState::NoPlanToday)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn targets() -> DailyTargets {
        DailyTargets {
            calories: 2000,
            protein: 140,
            carbs: 200,
            fats: 56,
            water: 3.0,
            sleep: 8.0,
        }
    }

    fn plan() -> DailyPlan {
        DailyPlan::generate(
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            targets(),
        )
    }

    fn meal(calories: f64, protein: f64) -> LogIntake {
        LogIntake {
            name: Some("Chicken Rice".to_string()),
            calories: Some(calories),
            protein: Some(protein),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_starts_empty() {
        let plan = plan();
        assert_eq!(plan.actuals, NutrientTotals::zero());
        assert!(plan.consumed_items.is_empty());
        assert_eq!(plan.remaining_calories(), Decimal::from(2000));
    }

    #[test]
    fn test_log_accumulates_actuals() {
        let mut plan = plan();
        plan.log_intake(&meal(550.5, 40.0), Utc::now()).unwrap();
        plan.log_intake(&meal(300.0, 12.5), Utc::now()).unwrap();

        assert_eq!(plan.actuals.calories, dec("850.5"));
        assert_eq!(plan.actuals.protein, dec("52.5"));
        assert_eq!(plan.consumed_items.len(), 2);
        assert_eq!(plan.remaining_calories(), dec("1149.5"));
    }

    #[test]
    fn test_log_defaults_name_and_zeroes() {
        let mut plan = plan();
        let item = plan.log_intake(&LogIntake::default(), Utc::now()).unwrap();

        assert_eq!(item.name, "Quick Log");
        assert_eq!(item.calories, Decimal::ZERO);
        assert_eq!(plan.actuals, NutrientTotals::zero());
    }

    #[test]
    fn test_blank_name_becomes_quick_log() {
        let intake = LogIntake {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(intake.item_name(), "Quick Log");
    }

    #[test]
    fn test_water_and_sleep_survive_item_removal() {
        let mut plan = plan();
        let intake = LogIntake {
            calories: Some(200.0),
            water: Some(0.5),
            sleep: Some(7.0),
            ..Default::default()
        };
        let item = plan.log_intake(&intake, Utc::now()).unwrap();
        plan.remove_item(item.id).unwrap();

        assert_eq!(plan.actuals.calories, Decimal::ZERO);
        assert_eq!(plan.actuals.water, dec("0.5"));
        assert_eq!(plan.actuals.sleep, dec("7"));
    }

    #[test]
    fn test_remove_unknown_item() {
        let mut plan = plan();
        let id = Uuid::new_v4();
        assert_eq!(plan.remove_item(id), Err(CoreError::ItemNotFound(id)));
    }

    #[test]
    fn test_negative_and_nan_rejected() {
        let mut plan = plan();
        assert!(matches!(
            plan.log_intake(&meal(-1.0, 0.0), Utc::now()),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            plan.log_intake(&meal(f64::NAN, 0.0), Utc::now()),
            Err(CoreError::Validation(_))
        ));
        assert!(plan.consumed_items.is_empty());
    }

    #[test]
    fn test_remaining_calories_can_go_negative() {
        let mut plan = plan();
        plan.log_intake(&meal(2300.0, 0.0), Utc::now()).unwrap();
        assert_eq!(plan.remaining_calories(), Decimal::from(-300));
    }

    #[test]
    fn test_totals_arithmetic() {
        let a = NutrientTotals {
            calories: dec("10.1"),
            water: dec("1"),
            ..NutrientTotals::zero()
        };
        let b = NutrientTotals {
            calories: dec("0.2"),
            sleep: dec("3"),
            ..NutrientTotals::zero()
        };
        let sum = a.checked_add(b).unwrap();
        assert_eq!(sum.calories, dec("10.3"));
        assert_eq!(sum.checked_sub(b), Some(a));
        assert_eq!(a.checked_add(-a), Some(NutrientTotals::zero()));
    }

    #[test]
    fn test_totals_overflow_is_detected() {
        let near_max = NutrientTotals {
            calories: Decimal::MAX,
            ..NutrientTotals::zero()
        };
        let one = NutrientTotals {
            calories: Decimal::ONE,
            ..NutrientTotals::zero()
        };
        assert_eq!(near_max.checked_add(one), None);
        assert_eq!((-near_max).checked_sub(one), None);
    }

    #[test]
    fn test_huge_intake_rejected_every_time() {
        let mut plan = plan();
        for _ in 0..2 {
            assert!(matches!(
                plan.log_intake(&meal(5e28, 0.0), Utc::now()),
                Err(CoreError::Validation(_))
            ));
        }
        assert_eq!(plan.actuals, NutrientTotals::zero());
        assert!(plan.consumed_items.is_empty());
    }

    #[test]
    fn test_overflowing_actuals_leave_plan_untouched() {
        let mut plan = plan();
        plan.actuals.calories = Decimal::MAX;

        assert!(matches!(
            plan.log_intake(&meal(100.0, 0.0), Utc::now()),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(plan.actuals.calories, Decimal::MAX);
        assert!(plan.consumed_items.is_empty());
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    #[test]
    fn test_plan_state_resolution() {
        let plan = plan();
        let today = plan.date;
        let tomorrow = today.succ_opt().unwrap();

        assert_eq!(PlanState::resolve(false, Some(&plan), today), PlanState::NoProfile);
        assert_eq!(PlanState::resolve(true, None, today), PlanState::NoPlanToday);
        assert_eq!(PlanState::resolve(true, Some(&plan), today), PlanState::PlanActive(today));
        assert_eq!(PlanState::resolve(true, Some(&plan), tomorrow), PlanState::NoPlanToday);
    }

    #[test]
    fn test_only_no_plan_today_can_generate() {
        assert!(PlanState::NoPlanToday.can_generate());
        assert!(!PlanState::NoProfile.can_generate());
        assert!(!PlanState::PlanActive(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()).can_generate());
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn amount() -> impl Strategy<Value = f64> {
        // two decimal places, as typed into the log form
        (0u32..500_000).prop_map(|cents| cents as f64 / 100.0)
    }

    proptest! {
        /// Property: log then delete of the same item restores actuals exactly
        #[test]
        fn prop_log_then_delete_is_identity(
            prior in proptest::collection::vec((amount(), amount(), amount(), amount()), 0..5),
            calories in amount(),
            protein in amount(),
            carbs in amount(),
            fats in amount(),
        ) {
            let mut plan = plan();
            for (c, p, cb, f) in prior {
                let intake = LogIntake {
                    calories: Some(c),
                    protein: Some(p),
                    carbs: Some(cb),
                    fats: Some(f),
                    ..Default::default()
                };
                plan.log_intake(&intake, Utc::now()).unwrap();
            }
            let before = plan.actuals;

            let intake = LogIntake {
                name: None,
                calories: Some(calories),
                protein: Some(protein),
                carbs: Some(carbs),
                fats: Some(fats),
                water: None,
                sleep: None,
            };
            let item = plan.log_intake(&intake, Utc::now()).unwrap();
            plan.remove_item(item.id).unwrap();

            prop_assert_eq!(plan.actuals, before);
        }

        /// Property: logging order does not change the totals
        #[test]
        fn prop_logging_commutes(a in amount(), b in amount()) {
            let mut first = plan();
            first.log_intake(&meal(a, b), Utc::now()).unwrap();
            first.log_intake(&meal(b, a), Utc::now()).unwrap();

            let mut second = plan();
            second.log_intake(&meal(b, a), Utc::now()).unwrap();
            second.log_intake(&meal(a, b), Utc::now()).unwrap();

            prop_assert_eq!(first.actuals, second.actuals);
        }
    }
}
