//! Error types for the NutriGen domain logic

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the pure domain layer
///
/// None of these are transient: callers report them immediately and never
/// retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Suggestion engines were called for a user without a profile
    #[error("{0}")]
    MissingProfile(&'static str),

    /// Profile exists but lacks the body metrics the Target Calculator needs
    #[error("Profile incomplete: missing {}", missing.join(", "))]
    IncompleteProfile { missing: Vec<String> },

    /// A plan has already been generated for this date
    #[error("Plan already exists for {0}")]
    DuplicatePlan(NaiveDate),

    #[error("No plan generated for {0}")]
    PlanNotFound(NaiveDate),

    #[error("Logged item {0} not found")]
    ItemNotFound(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Missing-profile error raised by the exercise engine
    pub fn missing_profile() -> Self {
        CoreError::MissingProfile("User profile not found. Please complete your profile.")
    }

    /// Missing-profile error raised by the food engine
    pub fn missing_profile_short() -> Self {
        CoreError::MissingProfile("User profile not found.")
    }
}
