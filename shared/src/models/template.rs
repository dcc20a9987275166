//! Design template model
//!
//! Templates are read-only catalog entries: a canvas size plus an ordered
//! list of elements. Element order is paint order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Template canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Top-left position in template pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Element size in template pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Symbolic brand color role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorRole {
    Primary,
    Secondary,
    Accent,
}

impl ColorRole {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Accent => "accent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "primary" => Some(Self::Primary),
            "secondary" => Some(Self::Secondary),
            "accent" => Some(Self::Accent),
            _ => None,
        }
    }
}

/// Either a literal CSS color or a brand role.
///
/// Serialized as a bare string: `"primary"`, `"secondary"` and `"accent"`
/// are roles, anything else is a literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColorRef {
    Role(ColorRole),
    Literal(String),
}

impl From<String> for ColorRef {
    fn from(value: String) -> Self {
        match ColorRole::from_name(&value) {
            Some(role) => Self::Role(role),
            None => Self::Literal(value),
        }
    }
}

impl From<&str> for ColorRef {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ColorRef> for String {
    fn from(value: ColorRef) -> Self {
        match value {
            ColorRef::Role(role) => role.name().to_string(),
            ColorRef::Literal(s) => s,
        }
    }
}

/// CSS font weight, either a keyword (`"bold"`) or a number (`700`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Numeric(u16),
    Named(String),
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::Named("normal".to_string())
    }
}

fn default_text_align() -> String {
    "left".to_string()
}

/// Text styling as stored in the catalog (camelCase keys)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    pub color: ColorRef,
    #[serde(default = "default_text_align")]
    pub text_align: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
}

/// Template element, tagged by its `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Background {
        color: ColorRef,
    },
    Shape {
        position: Position,
        size: Size,
        color: ColorRef,
    },
    Text {
        name: String,
        content: String,
        position: Position,
        style: TextStyle,
    },
    Logo {
        position: Position,
        size: Size,
    },
}

impl Element {
    /// Name of a text element, `None` for every other kind
    pub fn text_name(&self) -> Option<&str> {
        match self {
            Element::Text { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Catalog template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub dimensions: Dimensions,
    pub elements: Vec<Element>,
}

/// Reasons a template definition is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("template {0}: dimensions must be positive and finite")]
    InvalidDimensions(String),
    #[error("template {0}: has no elements")]
    NoElements(String),
    #[error("template {0}: text element {1} has a non-positive font size")]
    InvalidFontSize(String, String),
}

impl Template {
    /// Check the invariants the compositor relies on.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let Dimensions { width, height } = self.dimensions;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(TemplateError::InvalidDimensions(self.id.clone()));
        }
        if self.elements.is_empty() {
            return Err(TemplateError::NoElements(self.id.clone()));
        }
        for element in &self.elements {
            if let Element::Text { name, style, .. } = element
                && !(style.font_size.is_finite() && style.font_size > 0.0)
            {
                return Err(TemplateError::InvalidFontSize(
                    self.id.clone(),
                    name.clone(),
                ));
            }
        }
        Ok(())
    }

    /// Template content of the first text element with the given name
    pub fn text_content(&self, name: &str) -> Option<&str> {
        self.elements.iter().find_map(|el| match el {
            Element::Text {
                name: n, content, ..
            } if n == name => Some(content.as_str()),
            _ => None,
        })
    }
}

/// Response for GET /api/templates and /api/templates/category/:category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateListResponse {
    pub success: bool,
    pub count: usize,
    pub templates: Vec<Template>,
}

/// Response for GET /api/templates/:id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateResponse {
    pub success: bool,
    pub template: Template,
}

/// Response for GET /api/templates/categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALE_POST: &str = r##"{
        "id": "sale-post",
        "name": "Sale Post",
        "category": "Social Media",
        "dimensions": { "width": 1080, "height": 1080 },
        "elements": [
            { "type": "background", "color": "primary" },
            { "type": "shape", "position": { "x": 100, "y": 100 },
              "size": { "width": 200, "height": 50 }, "color": "#ff0000" },
            { "type": "text", "name": "headline", "content": "Big Sale",
              "position": { "x": 540, "y": 400 },
              "style": { "fontSize": 72, "fontWeight": "bold", "color": "#ffffff",
                         "textAlign": "center", "maxWidth": 900 } },
            { "type": "logo", "position": { "x": 40, "y": 40 },
              "size": { "width": 120, "height": 120 } }
        ]
    }"##;

    #[test]
    fn test_parse_catalog_entry() {
        let template: Template = serde_json::from_str(SALE_POST).unwrap();
        assert_eq!(template.id, "sale-post");
        assert_eq!(template.elements.len(), 4);
        assert_eq!(
            template.elements[0],
            Element::Background {
                color: ColorRef::Role(ColorRole::Primary)
            }
        );
        match &template.elements[2] {
            Element::Text { style, .. } => {
                assert_eq!(style.font_size, 72.0);
                assert_eq!(style.font_weight, FontWeight::Named("bold".into()));
                assert_eq!(style.color, ColorRef::Literal("#ffffff".into()));
                assert_eq!(style.max_width, Some(900.0));
                assert_eq!(style.line_height, None);
            }
            other => panic!("expected text element, got {other:?}"),
        }
        assert!(template.validate().is_ok());
    }

    #[test]
    fn test_color_ref_serializes_as_bare_string() {
        let json = serde_json::to_string(&ColorRef::Role(ColorRole::Accent)).unwrap();
        assert_eq!(json, "\"accent\"");
        let json = serde_json::to_string(&ColorRef::Literal("#123456".into())).unwrap();
        assert_eq!(json, "\"#123456\"");
    }

    #[test]
    fn test_numeric_font_weight() {
        let style: TextStyle =
            serde_json::from_str(r#"{"fontSize": 20, "fontWeight": 700, "color": "primary"}"#)
                .unwrap();
        assert_eq!(style.font_weight, FontWeight::Numeric(700));
        assert_eq!(style.text_align, "left");
    }

    #[test]
    fn test_unknown_element_type_rejected() {
        let result: Result<Element, _> = serde_json::from_str(r#"{"type": "video"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_templates() {
        let mut template: Template = serde_json::from_str(SALE_POST).unwrap();
        template.dimensions.width = 0.0;
        assert_eq!(
            template.validate(),
            Err(TemplateError::InvalidDimensions("sale-post".into()))
        );

        let mut template: Template = serde_json::from_str(SALE_POST).unwrap();
        template.elements.clear();
        assert_eq!(
            template.validate(),
            Err(TemplateError::NoElements("sale-post".into()))
        );
    }

    #[test]
    fn test_text_content_lookup() {
        let template: Template = serde_json::from_str(SALE_POST).unwrap();
        assert_eq!(template.text_content("headline"), Some("Big Sale"));
        assert_eq!(template.text_content("description"), None);
    }
}
