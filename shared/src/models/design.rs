//! Saved Design Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::brand_kit::{BrandColors, BrandContext};
use crate::compose::ResolvedScene;
use crate::error::{AppError, ErrorCode};
use crate::export::ExportPlan;

/// Longest headline the editor accepts
pub const HEADLINE_MAX_CHARS: usize = 150;
/// Longest description the editor accepts
pub const DESCRIPTION_MAX_CHARS: usize = 300;

/// Saved design entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Design {
    pub id: Uuid,
    pub user_id: Uuid,
    pub template_id: String,
    pub name: String,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Compositor inputs snapshot (see [`DesignData`]), never the bitmap
    pub design_data: serde_json::Value,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Snapshot of everything needed to re-run the compositor for a design
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_colors: Option<BrandColors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DesignData {
    /// Brand context captured at save time; `None` when no colors were saved
    pub fn brand_context(&self) -> Option<BrandContext> {
        self.brand_colors.as_ref().map(|colors| BrandContext {
            logo_url: self.logo_url.clone(),
            colors: colors.clone(),
        })
    }
}

impl Design {
    pub fn data(&self) -> Result<DesignData, AppError> {
        serde_json::from_value(self.design_data.clone()).map_err(|e| {
            AppError::new(ErrorCode::DesignDataInvalid).with_detail("details", e.to_string())
        })
    }
}

/// Create design payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignCreate {
    pub template_id: Option<String>,
    pub name: Option<String>,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub design_data: Option<serde_json::Value>,
}

/// Validated create payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewDesign {
    pub template_id: String,
    pub name: String,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub design_data: serde_json::Value,
}

fn too_long(field: &str, value: &Option<String>, max: usize) -> Option<AppError> {
    let len = value.as_deref().map(|s| s.chars().count()).unwrap_or(0);
    (len > max).then(|| {
        AppError::with_message(
            ErrorCode::TextTooLong,
            format!("{field} must be at most {max} characters"),
        )
        .with_detail("field", field)
        .with_detail("max", max)
    })
}

impl DesignCreate {
    pub fn validate(self) -> Result<NewDesign, AppError> {
        let template_id = self.template_id.filter(|s| !s.trim().is_empty());
        let name = self.name.filter(|s| !s.trim().is_empty());
        let design_data = self.design_data.filter(|v| !v.is_null());

        let mut missing = Vec::new();
        if template_id.is_none() {
            missing.push("template_id");
        }
        if name.is_none() {
            missing.push("name");
        }
        if design_data.is_none() {
            missing.push("design_data");
        }
        let (Some(template_id), Some(name), Some(design_data)) = (template_id, name, design_data)
        else {
            return Err(AppError::required(&missing));
        };

        if let Some(err) = too_long("headline", &self.headline, HEADLINE_MAX_CHARS) {
            return Err(err);
        }
        if let Some(err) = too_long("description", &self.description, DESCRIPTION_MAX_CHARS) {
            return Err(err);
        }

        if let Err(e) = serde_json::from_value::<DesignData>(design_data.clone()) {
            return Err(AppError::validation("design_data is malformed")
                .with_detail("details", e.to_string()));
        }

        Ok(NewDesign {
            template_id,
            name,
            headline: self.headline,
            description: self.description,
            design_data,
        })
    }
}

/// Response for POST /api/designs and GET /api/designs/:id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub design: Design,
}

/// Response for GET /api/designs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignListResponse {
    pub success: bool,
    pub count: usize,
    pub designs: Vec<Design>,
}

/// POST /api/designs/preview
///
/// Box defaults to the 600×600 editor preview; text defaults to the
/// template's own headline/description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub template_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
}

/// Response for POST /api/designs/preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub success: bool,
    pub scene: ResolvedScene,
}

/// Response for GET /api/designs/:id/scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportPlanResponse {
    pub success: bool,
    pub plan: ExportPlan,
}
