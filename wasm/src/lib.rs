//! NutriGen WASM Module
//!
//! Browser bindings for the target calculator, so the profile form can show
//! BMR, TDEE and daily targets while the user is still typing. Values cross
//! the boundary as JSON strings in the same shape the API uses.

use nutrigen_shared::health_metrics::{self, calculate_breakdown, TargetInputs};
use nutrigen_shared::profile::{Gender, Profile};
use nutrigen_shared::validation::validate_profile;
use serde_json::json;
use wasm_bindgen::prelude::*;

fn parse_profile(profile_json: &str) -> Result<Profile, String> {
    serde_json::from_str(profile_json).map_err(|e| format!("Invalid profile: {}", e))
}

fn preview(profile_json: &str) -> Result<String, String> {
    let profile = parse_profile(profile_json)?;
    let inputs = TargetInputs::try_from(&profile).map_err(|e| e.to_string())?;
    serde_json::to_string(&calculate_breakdown(&inputs)).map_err(|e| e.to_string())
}

fn targets(profile_json: &str) -> Result<String, String> {
    let profile = parse_profile(profile_json)?;
    let targets = health_metrics::daily_targets_for(&profile).map_err(|e| e.to_string())?;
    serde_json::to_string(&targets).map_err(|e| e.to_string())
}

fn profile_errors(profile_json: &str) -> Result<String, String> {
    let profile = parse_profile(profile_json)?;
    let errors = match validate_profile(&profile) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .iter()
            .map(|e| json!({ "field": e.field, "message": e.user_message() }))
            .collect(),
    };
    Ok(serde_json::Value::Array(errors).to_string())
}

/// BMR, activity multiplier, TDEE and targets for a profile
///
/// Throws with the missing field names when weight, height or age is absent.
#[wasm_bindgen(js_name = previewTargets)]
pub fn preview_targets(profile_json: &str) -> Result<String, JsError> {
    preview(profile_json).map_err(|e| JsError::new(&e))
}

/// Targets a plan generated from this profile would freeze
#[wasm_bindgen(js_name = dailyTargets)]
pub fn daily_targets(profile_json: &str) -> Result<String, JsError> {
    targets(profile_json).map_err(|e| JsError::new(&e))
}

/// `[{field, message}]`, empty when the profile is acceptable
#[wasm_bindgen(js_name = validateProfile)]
pub fn validate_profile_json(profile_json: &str) -> Result<String, JsError> {
    profile_errors(profile_json).map_err(|e| JsError::new(&e))
}

/// Mifflin-St Jeor BMR; any gender other than "male" uses the female constant
#[wasm_bindgen(js_name = calculateBmr)]
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: i32, gender: &str) -> f64 {
    let gender = gender.parse::<Gender>().ok();
    health_metrics::calculate_bmr(weight_kg, height_cm, age_years, gender)
}
