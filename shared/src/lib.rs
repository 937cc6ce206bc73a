//! NutriGen Shared Library
//!
//! Pure domain logic shared by the backend and the WASM module: the profile
//! model, daily target calculator, daily plan accounting, exercise and food
//! suggestion engines, progress aggregation, validation and API types.

pub mod daily_plan;
pub mod errors;
pub mod exercise;
pub mod health_metrics;
pub mod meals;
pub mod models;
pub mod profile;
pub mod progress;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use daily_plan::{ConsumedItem, DailyPlan, LogIntake, NutrientTotals, PlanState};
pub use errors::CoreError;
pub use exercise::{suggest_exercises, ExerciseSuggestion};
pub use health_metrics::{compute_daily_targets, daily_targets_for, DailyTargets, TargetInputs};
pub use meals::{suggest_meals, MealSuggestion};
pub use models::{Role, SupportTicket, TicketStatus, User};
pub use profile::Profile;
pub use types::ApiResponse;
