//! Database repositories
//!
//! Data access for users, profiles, daily plans and support tickets.

pub mod daily_plan;
pub mod profile;
pub mod ticket;
pub mod user;

pub use daily_plan::DailyPlanRepository;
pub use profile::ProfileRepository;
pub use ticket::TicketRepository;
pub use user::{NewUser, UserRepository};
