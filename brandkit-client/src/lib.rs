//! Brandkit Client - typed HTTP client for brandkit-server
//!
//! Every authenticated call uses the token held by the client instance;
//! there is no process-wide session.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use shared::models::{
    AuthResponse, BrandKit, BrandKitSave, Design, DesignCreate, PreviewRequest, Template,
    UserProfile,
};
