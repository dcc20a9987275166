//! Saved designs and scene composition

use axum::extract::{Path, State};
use axum::{Extension, Json};
use http::StatusCode;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use shared::compose::{ComposeMode, TargetBox, UserText, compose};
use shared::error::{AppError, ErrorCode};
use shared::export::ExportPlan;
use shared::models::{
    BrandContext, Design, DesignCreate, DesignListResponse, DesignResponse, ExportPlanResponse,
    PreviewRequest, PreviewResponse, Template,
};
use uuid::Uuid;

use crate::auth::UserIdentity;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

const THUMBNAIL_BASE: &str = "https://via.placeholder.com/300x300/4F46E5/ffffff?text=";

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Placeholder thumbnail labelled with the design name
pub fn placeholder_thumbnail(name: &str) -> String {
    format!("{THUMBNAIL_BASE}{}", encode_uri_component(name))
}

fn find_template<'a>(state: &'a AppState, id: &str) -> Result<&'a Template, AppError> {
    state
        .catalog
        .get(id)
        .ok_or_else(|| AppError::new(ErrorCode::TemplateNotFound).with_detail("id", id))
}

async fn find_owned(state: &AppState, id: Uuid, user_id: Uuid) -> ServiceResult<Design> {
    db::designs::find(&state.pool, id, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::DesignNotFound).into())
}

async fn current_brand(state: &AppState, user_id: Uuid) -> ServiceResult<Option<BrandContext>> {
    Ok(db::brand_kits::find_by_user(&state.pool, user_id)
        .await?
        .as_ref()
        .map(BrandContext::from))
}

/// Pick user text: explicit value, else the template's own content
fn user_text(template: &Template, headline: Option<String>, description: Option<String>) -> UserText {
    let defaults = UserText::defaults_for(template);
    UserText {
        headline: headline.unwrap_or(defaults.headline),
        description: description.unwrap_or(defaults.description),
    }
}

/// POST /api/designs
pub async fn create_design(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<DesignCreate>,
) -> ServiceResult<(StatusCode, Json<DesignResponse>)> {
    let new_design = req.validate()?;
    find_template(&state, &new_design.template_id)?;

    let thumbnail = placeholder_thumbnail(&new_design.name);
    let now = shared::util::now_millis();
    let design =
        db::designs::create(&state.pool, identity.user_id, &new_design, &thumbnail, now).await?;

    tracing::info!(
        user_id = %identity.user_id,
        design_id = %design.id,
        template_id = %design.template_id,
        "Design saved"
    );

    Ok((
        StatusCode::CREATED,
        Json(DesignResponse {
            success: true,
            message: Some("Design saved successfully".into()),
            design,
        }),
    ))
}

/// GET /api/designs: newest first
pub async fn list_designs(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ServiceResult<Json<DesignListResponse>> {
    let designs = db::designs::list_by_user(&state.pool, identity.user_id).await?;
    Ok(Json(DesignListResponse {
        success: true,
        count: designs.len(),
        designs,
    }))
}

/// GET /api/designs/:id
pub async fn get_design(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> ServiceResult<Json<DesignResponse>> {
    let design = find_owned(&state, id, identity.user_id).await?;
    Ok(Json(DesignResponse {
        success: true,
        message: None,
        design,
    }))
}

/// DELETE /api/designs/:id
pub async fn delete_design(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> ServiceResult<Json<serde_json::Value>> {
    if !db::designs::delete(&state.pool, id, identity.user_id).await? {
        return Err(AppError::new(ErrorCode::DesignNotFound).into());
    }

    tracing::info!(user_id = %identity.user_id, design_id = %id, "Design deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Design deleted successfully"
    })))
}

/// GET /api/designs/:id/scene: download export plan
///
/// Uses the brand snapshot saved with the design, falling back to the
/// user's current brand kit for designs saved without one.
pub async fn export_plan(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> ServiceResult<Json<ExportPlanResponse>> {
    let design = find_owned(&state, id, identity.user_id).await?;
    let data = design.data()?;
    let template = find_template(&state, &design.template_id)?;

    let brand = match data.brand_context() {
        Some(brand) => Some(brand),
        None => current_brand(&state, identity.user_id).await?,
    };
    let text = user_text(
        template,
        design.headline.clone().or(data.headline),
        design.description.clone().or(data.description),
    );

    let plan = ExportPlan::for_scene(template, brand.as_ref(), &text)
        .with_file_name(&design.name, shared::util::now_millis());

    Ok(Json(ExportPlanResponse {
        success: true,
        plan,
    }))
}

/// POST /api/designs/preview: compose with the caller's brand kit
pub async fn preview(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<PreviewRequest>,
) -> ServiceResult<Json<PreviewResponse>> {
    let template = find_template(&state, &req.template_id)?;
    let brand = current_brand(&state, identity.user_id).await?;
    let text = user_text(template, req.headline, req.description);
    let target = TargetBox::new(
        req.max_width.unwrap_or(TargetBox::PREVIEW.max_width),
        req.max_height.unwrap_or(TargetBox::PREVIEW.max_height),
    );

    let scene = compose(template, brand.as_ref(), &text, target, ComposeMode::preview());

    Ok(Json(PreviewResponse {
        success: true,
        scene,
    }))
}
