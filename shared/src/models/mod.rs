//! Data models
//!
//! Shared between the server, the HTTP client and the frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.

pub mod asset;
pub mod brand_kit;
pub mod design;
pub mod template;
pub mod user;

// Re-exports
pub use asset::*;
pub use brand_kit::*;
pub use design::*;
pub use template::*;
pub use user::*;
