//! Server configuration

use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime
    pub jwt_expiry_hours: i64,
    /// S3 bucket for logos and generated assets
    pub s3_bucket: String,
    /// AWS region (falls back to the SDK default chain when unset)
    pub aws_region: Option<String>,
    /// Public base URL for stored objects (CloudFront etc.)
    pub s3_public_base_url: Option<String>,
    /// Image generation backend base URL
    pub comfyui_url: String,
    /// Workflow file the prompt is injected into
    pub comfyui_workflow_path: String,
    /// Delay between history polls
    pub generation_poll_interval: Duration,
    /// Poll ceiling before giving up
    pub generation_max_attempts: u32,
    /// Ceiling for a single generation backend request
    pub generation_request_timeout: Duration,
    /// Template catalog override (embedded catalog when unset)
    pub templates_path: Option<String>,
    /// Allowed CORS origin (any origin when unset)
    pub cors_allow_origin: Option<String>,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = env_or("ENVIRONMENT", "development");

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: env_parse("HTTP_PORT", 5001),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiry_hours: env_parse("JWT_EXPIRY_HOURS", 168),
            s3_bucket: env_or("AWS_S3_BUCKET", "brandkit-assets"),
            aws_region: env_opt("AWS_REGION"),
            s3_public_base_url: env_opt("S3_PUBLIC_BASE_URL"),
            comfyui_url: env_or("COMFYUI_URL", "http://localhost:8188"),
            comfyui_workflow_path: env_or("COMFYUI_WORKFLOW_PATH", "config/workflow_api.json"),
            generation_poll_interval: Duration::from_millis(env_parse(
                "GENERATION_POLL_INTERVAL_MS",
                1000,
            )),
            generation_max_attempts: env_parse("GENERATION_MAX_ATTEMPTS", 3600),
            generation_request_timeout: Duration::from_secs(env_parse(
                "GENERATION_REQUEST_TIMEOUT_SECS",
                30,
            )),
            templates_path: env_opt("TEMPLATES_PATH"),
            cors_allow_origin: env_opt("CORS_ALLOW_ORIGIN"),
            environment,
        })
    }
}
