//! Brand kit API
//!
//! One kit per user. `POST /api/brands` creates or fully replaces it; logos
//! are uploaded separately and referenced by URL.

use axum::extract::{Multipart, Path, State};
use axum::{Extension, Json};
use image::ImageFormat;
use shared::error::{AppError, ErrorCode};
use shared::models::{BrandKitResponse, BrandKitSave, LogoUploadResponse};
use uuid::Uuid;

use crate::auth::UserIdentity;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

/// Maximum logo size (5MB)
pub const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

/// Request body limit for the upload route; leaves room for multipart framing
pub const UPLOAD_BODY_LIMIT: usize = MAX_LOGO_BYTES + 64 * 1024;

/// Accepted logo extensions
const LOGO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Multipart field carrying the logo
const LOGO_FIELD: &str = "logo";

/// GET /api/brands
pub async fn get_brand_kit(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ServiceResult<Json<BrandKitResponse>> {
    let brand_kit = db::brand_kits::find_by_user(&state.pool, identity.user_id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::BrandKitNotFound, "No brand kit found"))?;

    Ok(Json(BrandKitResponse {
        message: None,
        brand_kit,
    }))
}

/// POST /api/brands
pub async fn save_brand_kit(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<BrandKitSave>,
) -> ServiceResult<Json<BrandKitResponse>> {
    let fields = req.validate()?;
    let now = shared::util::now_millis();
    let brand_kit = db::brand_kits::upsert(&state.pool, identity.user_id, &fields, now).await?;

    tracing::info!(user_id = %identity.user_id, brand_kit_id = %brand_kit.id, "Brand kit saved");

    Ok(Json(BrandKitResponse {
        message: Some("Brand kit saved successfully".into()),
        brand_kit,
    }))
}

/// DELETE /api/brands/:id
pub async fn delete_brand_kit(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> ServiceResult<Json<serde_json::Value>> {
    if !db::brand_kits::delete(&state.pool, id, identity.user_id).await? {
        return Err(AppError::new(ErrorCode::BrandKitNotFound).into());
    }

    tracing::info!(user_id = %identity.user_id, brand_kit_id = %id, "Brand kit deleted");

    Ok(Json(serde_json::json!({
        "message": "Brand kit deleted successfully"
    })))
}

/// A logo that passed validation
#[derive(Debug, PartialEq, Eq)]
pub struct ValidLogo {
    /// Lowercased, with leading dot
    pub ext: String,
    pub content_type: String,
}

/// Check size, extension and that the bytes really are an image.
pub fn validate_logo(filename: &str, data: &[u8]) -> Result<ValidLogo, AppError> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    if data.len() > MAX_LOGO_BYTES {
        return Err(AppError::new(ErrorCode::FileTooLarge)
            .with_detail("size", data.len())
            .with_detail("max", MAX_LOGO_BYTES));
    }

    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !LOGO_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            "Only image files are allowed",
        )
        .with_detail("supported", LOGO_EXTENSIONS.to_vec()));
    }

    match image::guess_format(data) {
        Ok(ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::WebP) => {}
        _ => return Err(AppError::new(ErrorCode::InvalidImageFile)),
    }

    let content_type = mime_guess::from_ext(&ext)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(ValidLogo {
        ext: format!(".{ext}"),
        content_type,
    })
}

/// POST /api/brands/upload-logo: multipart field `logo`
pub async fn upload_logo(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    mut multipart: Multipart,
) -> Result<Json<LogoUploadResponse>, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(LOGO_FIELD) {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(multipart_error)?.to_vec();
            file = Some((filename, data));
            break;
        }
    }

    let (filename, data) = file.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
    let logo = validate_logo(&filename, &data)?;

    let stored = state
        .storage
        .upload_logo(data, &logo.ext, &logo.content_type, &filename)
        .await
        .map_err(|e| AppError::upstream(ErrorCode::StorageFailed, e))?;

    tracing::info!(user_id = %identity.user_id, key = %stored.key, "Logo uploaded");

    Ok(Json(LogoUploadResponse {
        message: "Logo uploaded successfully!".into(),
        logo_url: stored.url,
    }))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == http::StatusCode::PAYLOAD_TOO_LARGE {
        AppError::new(ErrorCode::FileTooLarge).with_detail("max", MAX_LOGO_BYTES)
    } else {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
    }
}
