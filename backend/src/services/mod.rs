//! Business logic services
//!
//! Services coordinate repositories and the pure domain logic in
//! `nutrigen_shared`, returning `ApiError` on failure.

pub mod admin;
pub mod daily_plan;
pub mod profile;
pub mod progress;
pub mod suggestion;
pub mod support;
pub mod user;

pub use admin::AdminService;
pub use daily_plan::DailyPlanService;
pub use profile::ProfileService;
pub use progress::ProgressService;
pub use suggestion::SuggestionService;
pub use support::SupportService;
pub use user::UserService;

use chrono::{NaiveDate, Utc};

/// Plans are keyed by the current UTC calendar date
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
