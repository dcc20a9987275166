//! Authentication middleware: bearer JWT and per-IP rate limits

pub mod rate_limit;
pub mod user_auth;

pub use user_auth::{JwtSettings, UserIdentity};
