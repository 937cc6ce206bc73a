//! Input validation functions
//!
//! Field-level checks for registration, the profile form, intake logging
//! and support tickets. Messages are user-facing.

use crate::profile::{BasicInfo, Goals, HealthInfo, Lifestyle, Profile};

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    let well_formed = regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map(|re| re.is_match(email))
        .unwrap_or(false);
    if !well_formed {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// First or last name
pub fn validate_name(field: &str, name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", get_field_display_label(field)));
    }
    if trimmed.chars().count() > 100 {
        return Err(format!("{} is too long", get_field_display_label(field)));
    }
    Ok(())
}

fn validate_range(label: &str, value: f64, min: f64, max: f64, unit: &str) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err(format!("{} must be a valid number", label));
    }
    if value < min {
        return Err(format!("{} must be at least {}{}", label, min, unit));
    }
    if value > max {
        return Err(format!("{} must be at most {}{}", label, max, unit));
    }
    Ok(())
}

// ============================================================================
// Profile Validation
// ============================================================================

/// Age in whole years, 1-150
pub fn validate_age(age: i32) -> Result<(), String> {
    if age < 1 {
        return Err("Age must be at least 1 year".to_string());
    }
    if age > 150 {
        return Err("Age cannot exceed 150 years".to_string());
    }
    Ok(())
}

/// Valid range: 50-300 cm
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    validate_range("Height", height_cm, 50.0, 300.0, " cm")
}

/// Valid range: 20-500 kg
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    validate_range("Weight", weight_kg, 20.0, 500.0, " kg")
}

pub fn validate_body_fat(percent: f64) -> Result<(), String> {
    validate_range("Body fat", percent, 0.0, 100.0, "%")
}

pub fn validate_steps_per_day(steps: i32) -> Result<(), String> {
    if steps < 0 {
        return Err("Steps per day cannot be negative".to_string());
    }
    Ok(())
}

pub fn validate_sleep_target(hours: f64) -> Result<(), String> {
    validate_range("Sleep target", hours, 0.0, 24.0, " hours")
}

pub fn validate_water_target(liters: f64) -> Result<(), String> {
    validate_range("Water target", liters, 0.0, 20.0, " L")
}

pub fn validate_timeline_weeks(weeks: i32) -> Result<(), String> {
    if weeks < 0 {
        return Err("Timeline cannot be negative".to_string());
    }
    Ok(())
}

fn collect(errors: &mut Vec<ValidationError>, field: &str, result: Result<(), String>) {
    if let Err(message) = result {
        errors.push(ValidationError::new(field, &message));
    }
}

fn validate_basic(basic: &BasicInfo, errors: &mut Vec<ValidationError>) {
    if let Some(age) = basic.age {
        collect(errors, "age", validate_age(age));
    }
    if let Some(height) = basic.height {
        collect(errors, "height", validate_height_cm(height));
    }
    if let Some(weight) = basic.weight {
        collect(errors, "weight", validate_weight(weight));
    }
    if let Some(body_fat) = basic.body_fat {
        collect(errors, "body_fat", validate_body_fat(body_fat));
    }
}

fn validate_lifestyle(lifestyle: &Lifestyle, errors: &mut Vec<ValidationError>) {
    if let Some(steps) = lifestyle.steps_per_day {
        collect(errors, "steps_per_day", validate_steps_per_day(steps));
    }
}

fn validate_goals(goals: &Goals, errors: &mut Vec<ValidationError>) {
    if let Some(target) = goals.target_weight {
        collect(errors, "target_weight", validate_weight(target));
    }
    if let Some(weeks) = goals.timeline_weeks {
        collect(errors, "timeline_weeks", validate_timeline_weeks(weeks));
    }
}

fn validate_health(health: &HealthInfo, errors: &mut Vec<ValidationError>) {
    collect(errors, "sleep_target", validate_sleep_target(health.sleep_target));
    collect(errors, "water_target", validate_water_target(health.water_target));
}

/// Validate every populated field of a profile
pub fn validate_profile(profile: &Profile) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    validate_basic(&profile.basic, &mut errors);
    validate_lifestyle(&profile.lifestyle, &mut errors);
    validate_goals(&profile.goals, &mut errors);
    validate_health(&profile.health, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ============================================================================
// Logging and tickets
// ============================================================================

/// Largest calorie amount accepted in a single log entry
pub const MAX_INTAKE_CALORIES: f64 = 100_000.0;
/// Largest macro (g), water (L) or sleep (h) amount in a single log entry
pub const MAX_INTAKE_AMOUNT: f64 = 10_000.0;

/// Intake amounts must be finite, non-negative and within a single-entry cap
pub fn validate_intake_amount(field: &str, value: f64) -> Result<(), String> {
    let label = get_field_display_label(field);
    if value.is_nan() || value.is_infinite() {
        return Err(format!("{} must be a valid number", label));
    }
    if value < 0.0 {
        return Err(format!("{} cannot be negative", label));
    }
    let max = if field == "calories" {
        MAX_INTAKE_CALORIES
    } else {
        MAX_INTAKE_AMOUNT
    };
    if value > max {
        return Err(format!("{} must be at most {}", label, max));
    }
    Ok(())
}

pub fn validate_ticket_message(message: &str) -> Result<(), String> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err("Message is required".to_string());
    }
    if trimmed.chars().count() > 5000 {
        return Err("Message is too long".to_string());
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "first_name" => "First Name",
        "last_name" => "Last Name",
        "age" => "Age",
        "weight" => "Current Weight",
        "height" => "Height",
        "body_fat" => "Body Fat",
        "steps_per_day" => "Steps Per Day",
        "target_weight" => "Target Weight",
        "timeline_weeks" => "Timeline",
        "sleep_target" => "Sleep Target",
        "water_target" => "Water Target",
        "calories" => "Calories",
        "protein" => "Protein",
        "carbs" => "Carbs",
        "fats" => "Fats",
        "water" => "Water",
        "sleep" => "Sleep",
        _ => field_name,
    }
}

/// Convert a list of technical field names to user-friendly labels
pub fn get_missing_fields_labels(fields: &[String]) -> Vec<String> {
    fields
        .iter()
        .map(|f| get_field_display_label(f).to_string())
        .collect()
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}
