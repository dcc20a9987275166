//! Shared types for Brandkit
//!
//! Domain models, the layout compositor, the download export plan and the
//! unified error types used by the server and the HTTP client.

pub mod compose;
pub mod error;
pub mod export;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use compose::{ComposeMode, ResolvedScene, TargetBox, UserText, compose};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use export::ExportPlan;
