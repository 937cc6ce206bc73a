//! Authentication module
//!
//! JWT bearer tokens, argon2 password hashing and the request extractors
//! built on them.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenKind};
pub use middleware::{AdminUser, AuthUser};
pub use password::PasswordService;
