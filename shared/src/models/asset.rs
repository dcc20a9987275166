//! Generated marketing asset

use serde::{Deserialize, Serialize};

/// POST /api/images/generate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    #[serde(
        rename = "assetType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub asset_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAsset {
    pub image_url: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    /// RFC 3339
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub message: String,
    pub data: GeneratedAsset,
}

/// Response for GET /api/images/health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationHealth {
    pub status: String,
    pub message: String,
    pub comfyui: String,
    #[serde(rename = "s3Bucket")]
    pub s3_bucket: String,
}
