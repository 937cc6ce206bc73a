//! Food suggestion engine
//!
//! Builds a regional meal menu, swaps dairy-heavy dishes for allergic users,
//! and warns about oversized dinners when little of the calorie budget is
//! left.

use crate::daily_plan::DailyPlan;
use crate::errors::CoreError;
use crate::profile::Profile;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DAIRY_ALLERGY: &str = "dairy";
pub const DAIRY_FREE_SUFFIX: &str = " (Use Dairy-Free Alternative)";
pub const DAIRY_SUBSTITUTION_NOTE: &str = "Substituted core ingredient due to dairy allergy.";
/// Protein lost when the dairy component is swapped out, in grams
pub const DAIRY_PROTEIN_PENALTY: i32 = 5;
/// Dinner warnings fire only while remaining calories are under this
pub const LOW_BUDGET_KCAL: i64 = 400;

const DAIRY_KEYWORDS: &[&str] = &["yogurt", "paneer"];

// ============================================================================
// Static menus
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macros {
    pub cal: i32,
    pub pro: i32,
    pub carb: i32,
    pub fat: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealTemplate {
    pub name: &'static str,
    pub prep_time: &'static str,
    pub macros: Macros,
    pub ingredients: &'static [&'static str],
    pub tags: &'static [&'static str],
}

pub const INDIAN_BREAKFAST: &[MealTemplate] = &[
    MealTemplate {
        name: "High-Protein Moong Dal Chilla",
        prep_time: "15 mins",
        macros: Macros { cal: 320, pro: 18, carb: 40, fat: 8 },
        ingredients: &["100g Moong Dal", "50g Paneer (grated)", "Spinach"],
        tags: &["Vegetarian"],
    },
    MealTemplate {
        name: "Egg Bhurji with Multigrain Roti",
        prep_time: "10 mins",
        macros: Macros { cal: 380, pro: 22, carb: 35, fat: 14 },
        ingredients: &["3 Whole Eggs", "1 Roti", "Onions & Tomatoes"],
        tags: &["High Protein"],
    },
    MealTemplate {
        name: "Overnight Oats with Chia & Cardamom",
        prep_time: "5 mins (prev night)",
        macros: Macros { cal: 300, pro: 12, carb: 45, fat: 9 },
        ingredients: &["50g Oats", "200ml Almond Milk", "10g Chia Seeds"],
        tags: &["Vegan", "High Fiber"],
    },
];

pub const INDIAN_LUNCH: &[MealTemplate] = &[
    MealTemplate {
        name: "Soya Chunk Curry with Brown Rice",
        prep_time: "30 mins",
        macros: Macros { cal: 450, pro: 45, carb: 55, fat: 5 },
        ingredients: &["50g Soya Chunks", "100g Brown Rice", "Tomato Gravy"],
        tags: &["Vegan", "High Protein"],
    },
    MealTemplate {
        name: "Grilled Chicken Tikka Bowl",
        prep_time: "25 mins",
        macros: Macros { cal: 520, pro: 48, carb: 40, fat: 16 },
        ingredients: &["200g Chicken Breast", "Mint Yogurt", "Cucumber Salad"],
        tags: &["Low Carb"],
    },
];

pub const GLOBAL_BREAKFAST: &[MealTemplate] = &[
    MealTemplate {
        name: "Greek Yogurt Parfait",
        prep_time: "5 mins",
        macros: Macros { cal: 300, pro: 25, carb: 30, fat: 5 },
        ingredients: &["200g 0% Greek Yogurt", "Mixed Berries", "15g Walnuts"],
        tags: &["Vegetarian", "Probiotic"],
    },
    MealTemplate {
        name: "Smoked Salmon Bagel Thins",
        prep_time: "10 mins",
        macros: Macros { cal: 350, pro: 22, carb: 35, fat: 12 },
        ingredients: &["1 Whole Wheat Bagel Thin", "50g Smoked Salmon", "Light Cream Cheese"],
        tags: &["Pescatarian"],
    },
];

pub const GLOBAL_LUNCH: &[MealTemplate] = &[
    MealTemplate {
        name: "Turkey & Avocado Wrap",
        prep_time: "10 mins",
        macros: Macros { cal: 480, pro: 35, carb: 40, fat: 18 },
        ingredients: &["150g Turkey Breast", "1 Whole Wheat Tortilla", "1/4 Avocado"],
        tags: &["High Protein"],
    },
    MealTemplate {
        name: "Quinoa Superfood Salad",
        prep_time: "15 mins",
        macros: Macros { cal: 420, pro: 15, carb: 55, fat: 14 },
        ingredients: &["100g Quinoa", "Edamame", "Balsamic Vinaigrette"],
        tags: &["Vegan", "High Fiber"],
    },
];

/// Template tables for one region
#[derive(Debug, Clone, Copy)]
pub struct RegionalMenu {
    pub breakfast: &'static [MealTemplate],
    pub lunch: &'static [MealTemplate],
    pub dinner: &'static [MealTemplate],
    pub snacks: &'static [MealTemplate],
}

// Dinner and snack tables are empty in both regions. This is a known gap
// carried over on purpose; clients render an empty section.
pub const INDIAN_MENU: RegionalMenu = RegionalMenu {
    breakfast: INDIAN_BREAKFAST,
    lunch: INDIAN_LUNCH,
    dinner: &[],
    snacks: &[],
};

pub const GLOBAL_MENU: RegionalMenu = RegionalMenu {
    breakfast: GLOBAL_BREAKFAST,
    lunch: GLOBAL_LUNCH,
    dinner: &[],
    snacks: &[],
};

/// Only "indian" has its own tables; every other region gets the global menu
pub fn regional_menu(region_key: &str) -> RegionalMenu {
    match region_key {
        "indian" => INDIAN_MENU,
        _ => GLOBAL_MENU,
    }
}

// ============================================================================
// Per-request menu
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealEntry {
    pub name: String,
    pub prep_time: String,
    pub macros: Macros,
    pub ingredients: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&MealTemplate> for MealEntry {
    fn from(template: &MealTemplate) -> Self {
        Self {
            name: template.name.to_string(),
            prep_time: template.prep_time.to_string(),
            macros: template.macros,
            ingredients: template.ingredients.iter().map(|s| s.to_string()).collect(),
            tags: template.tags.iter().map(|s| s.to_string()).collect(),
            note: None,
        }
    }
}

fn owned(templates: &[MealTemplate]) -> Vec<MealEntry> {
    templates.iter().map(MealEntry::from).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealMenu {
    pub breakfast: Vec<MealEntry>,
    pub lunch: Vec<MealEntry>,
    pub dinner: Vec<MealEntry>,
    pub snacks: Vec<MealEntry>,
}

/// Fresh, owned copy of a region's menu
pub fn base_menu(region_key: &str) -> MealMenu {
    let menu = regional_menu(region_key);
    MealMenu {
        breakfast: owned(menu.breakfast),
        lunch: owned(menu.lunch),
        dinner: owned(menu.dinner),
        snacks: owned(menu.snacks),
    }
}

fn contains_dairy(name: &str) -> bool {
    let lowered = name.to_lowercase();
    DAIRY_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

/// Swap dairy dishes for a dairy-free alternative
///
/// Only the dish name is inspected, not its ingredients.
pub fn apply_dairy_substitution(meals: &mut [MealEntry]) {
    for meal in meals.iter_mut().filter(|m| contains_dairy(&m.name)) {
        meal.name.push_str(DAIRY_FREE_SUFFIX);
        meal.macros.pro -= DAIRY_PROTEIN_PENALTY;
        meal.note = Some(DAIRY_SUBSTITUTION_NOTE.to_string());
    }
}

/// Warn about dinners larger than what is left of today's calories
///
/// Applies only while 0 < remaining < 400 and the plan has a positive
/// calorie target.
pub fn apply_calorie_budget(menu: &mut MealMenu, log: Option<&DailyPlan>) {
    let Some(plan) = log else {
        return;
    };
    if plan.targets.calories <= 0 {
        return;
    }

    let remaining = plan.remaining_calories();
    if remaining <= Decimal::ZERO || remaining >= Decimal::from(LOW_BUDGET_KCAL) {
        return;
    }

    let remaining = remaining.normalize();
    for meal in menu
        .dinner
        .iter_mut()
        .filter(|m| Decimal::from(m.macros.cal) > remaining)
    {
        meal.note = Some(format!(
            "⚠️ Halve the portion size of this meal to stay within your remaining {} calories.",
            remaining
        ));
    }
}

// ============================================================================
// Engine
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSuggestion {
    pub dietary_region: String,
    pub date: NaiveDate,
    pub menu: MealMenu,
}

/// Suggest meals for `date`
pub fn suggest_meals(
    profile: Option<&Profile>,
    log: Option<&DailyPlan>,
    date: NaiveDate,
) -> Result<MealSuggestion, CoreError> {
    let profile = profile.ok_or_else(CoreError::missing_profile_short)?;
    let region = profile.region_key();

    let mut menu = base_menu(&region);

    // Dinner and snacks skip the allergy swap
    if profile.has_allergy(DAIRY_ALLERGY) {
        apply_dairy_substitution(&mut menu.breakfast);
        apply_dairy_substitution(&mut menu.lunch);
    }

    apply_calorie_budget(&mut menu, log.filter(|plan| plan.date == date));

    Ok(MealSuggestion {
        dietary_region: region,
        date,
        menu,
    })
}
