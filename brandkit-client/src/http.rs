//! HTTP client for the brandkit REST API

use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::ErrorCode;
use shared::models::{
    AuthResponse, BrandKitResponse, BrandKitSave, CategoriesResponse, CurrentUserResponse,
    DesignCreate, DesignListResponse, DesignResponse, ExportPlanResponse, GenerateRequest,
    GenerateResponse, GenerationHealth, LoginRequest, LogoUploadResponse, PreviewRequest,
    PreviewResponse, RegisterRequest, TemplateListResponse, TemplateResponse,
};
use uuid::Uuid;

use crate::{ClientConfig, ClientError, ClientResult};

/// Error body the server returns for every failure
#[derive(serde::Deserialize)]
struct ApiErrorResponse {
    code: u16,
    message: String,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

/// Brandkit API client
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| ClientError::InvalidResponse(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidResponse(format!(
                "invalid base URL: {}",
                config.base_url
            )));
        }
        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    /// Same client, different credential
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self.clone()
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL plus percent-encoded path segments
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    fn request(&self, method: Method, segments: &[&str]) -> reqwest::RequestBuilder {
        let mut req = self.client.request(method, self.url(segments));
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        req
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&text) {
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    code: ErrorCode::try_from(api_err.code).unwrap_or(ErrorCode::Unknown),
                    message: api_err.message,
                    details: api_err.details,
                });
            }
            tracing::debug!(status = %status, "Non-JSON error response");
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(ClientError::Validation(text))
                }
                _ => Err(ClientError::Internal(text)),
            };
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let response = self.request(Method::GET, segments).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .request(Method::POST, segments)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let response = self.request(Method::DELETE, segments).send().await?;
        Self::handle_response(response).await
    }

    // ── Auth ──

    pub async fn register(&self, req: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.post(&["api", "auth", "register"], req).await
    }

    /// Log in; use [`HttpClient::with_token`] with the returned token.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post(&["api", "auth", "login"], &req).await
    }

    pub async fn me(&self) -> ClientResult<CurrentUserResponse> {
        self.get(&["api", "auth", "me"]).await
    }

    // ── Brand kit ──

    pub async fn get_brand_kit(&self) -> ClientResult<BrandKitResponse> {
        self.get(&["api", "brands"]).await
    }

    pub async fn save_brand_kit(&self, req: &BrandKitSave) -> ClientResult<BrandKitResponse> {
        self.post(&["api", "brands"], req).await
    }

    pub async fn delete_brand_kit(&self, id: Uuid) -> ClientResult<serde_json::Value> {
        self.delete(&["api", "brands", &id.to_string()]).await
    }

    /// Upload a logo file; returns its public URL
    pub async fn upload_logo(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<LogoUploadResponse> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("logo", part);
        let response = self
            .request(Method::POST, &["api", "brands", "upload-logo"])
            .multipart(form)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    // ── Templates ──

    pub async fn list_templates(&self) -> ClientResult<TemplateListResponse> {
        self.get(&["api", "templates"]).await
    }

    pub async fn categories(&self) -> ClientResult<CategoriesResponse> {
        self.get(&["api", "templates", "categories"]).await
    }

    pub async fn templates_by_category(&self, category: &str) -> ClientResult<TemplateListResponse> {
        self.get(&["api", "templates", "category", category]).await
    }

    pub async fn get_template(&self, id: &str) -> ClientResult<TemplateResponse> {
        self.get(&["api", "templates", id]).await
    }

    // ── Designs ──

    pub async fn create_design(&self, req: &DesignCreate) -> ClientResult<DesignResponse> {
        self.post(&["api", "designs"], req).await
    }

    pub async fn list_designs(&self) -> ClientResult<DesignListResponse> {
        self.get(&["api", "designs"]).await
    }

    pub async fn get_design(&self, id: Uuid) -> ClientResult<DesignResponse> {
        self.get(&["api", "designs", &id.to_string()]).await
    }

    pub async fn delete_design(&self, id: Uuid) -> ClientResult<serde_json::Value> {
        self.delete(&["api", "designs", &id.to_string()]).await
    }

    /// Download export plan for a saved design
    pub async fn export_plan(&self, id: Uuid) -> ClientResult<ExportPlanResponse> {
        self.get(&["api", "designs", &id.to_string(), "scene"]).await
    }

    pub async fn preview(&self, req: &PreviewRequest) -> ClientResult<PreviewResponse> {
        self.post(&["api", "designs", "preview"], req).await
    }

    // ── Image generation ──

    pub async fn generate_image(&self, req: &GenerateRequest) -> ClientResult<GenerateResponse> {
        self.post(&["api", "images", "generate"], req).await
    }

    pub async fn generation_health(&self) -> ClientResult<GenerationHealth> {
        self.get(&["api", "images", "health"]).await
    }

    /// GET /api/health
    pub async fn health(&self) -> ClientResult<serde_json::Value> {
        self.get(&["api", "health"]).await
    }
}
