//! Application state

use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::auth::JwtSettings;
use crate::auth::rate_limit::RateLimiter;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::generation::{GenerationClient, PollPolicy};
use crate::storage::Storage;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// S3 storage (logos, generated assets)
    pub storage: Storage,
    /// Image generation backend
    pub generator: GenerationClient,
    /// Read-only template catalog
    pub catalog: Arc<Catalog>,
    /// JWT signing settings
    pub jwt: JwtSettings,
    /// Rate limiter for login/registration routes
    pub rate_limiter: RateLimiter,
    /// Allowed CORS origin (any when `None`)
    pub cors_allow_origin: Option<String>,
}

impl AppState {
    /// Create a new AppState: connect, migrate, load the catalog
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let catalog = Catalog::load(config.templates_path.as_deref())?;
        tracing::info!(templates = catalog.all().len(), "Template catalog loaded");

        let mut aws_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.aws_region {
            aws_loader = aws_loader.region(aws_config::Region::new(region.clone()));
        }
        let aws_config = aws_loader.load().await;
        let s3 = S3Client::new(&aws_config);

        Self::from_parts(pool, s3, catalog, config)
    }

    /// Assemble state from already-built parts
    pub fn from_parts(
        pool: PgPool,
        s3: S3Client,
        catalog: Catalog,
        config: &Config,
    ) -> Result<Self, BoxError> {
        let storage = Storage::new(
            s3,
            config.s3_bucket.clone(),
            config.aws_region.as_deref(),
            config.s3_public_base_url.clone(),
        );
        let generator = GenerationClient::new(
            config.comfyui_url.clone(),
            config.comfyui_workflow_path.clone(),
            PollPolicy {
                interval: config.generation_poll_interval,
                max_attempts: config.generation_max_attempts,
                ..PollPolicy::default()
            },
            config.generation_request_timeout,
        )?;

        Ok(Self {
            pool,
            storage,
            generator,
            catalog: Arc::new(catalog),
            jwt: JwtSettings {
                secret: config.jwt_secret.clone(),
                expiry_hours: config.jwt_expiry_hours,
            },
            rate_limiter: RateLimiter::new(),
            cors_allow_origin: config.cors_allow_origin.clone(),
        })
    }
}
