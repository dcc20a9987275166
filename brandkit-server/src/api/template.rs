//! Template catalog API (public, read-only)

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{CategoriesResponse, TemplateListResponse, TemplateResponse};

use crate::state::AppState;

use super::ApiResult;

/// GET /api/templates
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates = state.catalog.all().to_vec();
    Json(TemplateListResponse {
        success: true,
        count: templates.len(),
        templates,
    })
}

/// GET /api/templates/categories
pub async fn list_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        success: true,
        categories: state
            .catalog
            .categories()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

/// GET /api/templates/category/:category
pub async fn templates_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<TemplateListResponse> {
    let templates: Vec<_> = state
        .catalog
        .by_category(&category)
        .into_iter()
        .cloned()
        .collect();
    Json(TemplateListResponse {
        success: true,
        count: templates.len(),
        templates,
    })
}

/// GET /api/templates/:id
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<TemplateResponse> {
    let template = state
        .catalog
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::new(ErrorCode::TemplateNotFound).with_detail("id", id))?;
    Ok(Json(TemplateResponse {
        success: true,
        template,
    }))
}
