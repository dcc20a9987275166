//! Brand Kit Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::template::ColorRole;
use crate::error::{AppError, ErrorCode};

/// Brand kit entity (at most one per user)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BrandKit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub logo_url: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Save brand kit payload (create or full replace)
///
/// Fields are optional at the serde level so a missing field produces a
/// validation error instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandKitSave {
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
}

/// Validated brand kit fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandKitFields {
    pub logo_url: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
}

/// `#RRGGBB`, the format the color pickers produce and the column width allows
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl BrandKitSave {
    pub fn validate(&self) -> Result<BrandKitFields, AppError> {
        let logo_url = non_empty(&self.logo_url);
        let primary = non_empty(&self.primary_color);
        let secondary = non_empty(&self.secondary_color);
        let accent = non_empty(&self.accent_color);

        let (Some(logo_url), Some(primary), Some(secondary), Some(accent)) =
            (logo_url, primary, secondary, accent)
        else {
            return Err(
                AppError::with_message(ErrorCode::RequiredField, "All fields are required")
                    .with_detail(
                        "fields",
                        vec![
                            "logo_url",
                            "primary_color",
                            "secondary_color",
                            "accent_color",
                        ],
                    ),
            );
        };

        for (field, color) in [
            ("primary_color", &primary),
            ("secondary_color", &secondary),
            ("accent_color", &accent),
        ] {
            if !is_hex_color(color) {
                return Err(AppError::new(ErrorCode::InvalidColor)
                    .with_detail("field", field)
                    .with_detail("value", color.as_str()));
            }
        }

        Ok(BrandKitFields {
            logo_url,
            primary_color: primary,
            secondary_color: secondary,
            accent_color: accent,
        })
    }
}

/// The three brand colors, as snapshotted into a saved design
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

/// Brand data the compositor reads: logo plus role colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub colors: BrandColors,
}

impl BrandContext {
    pub fn color(&self, role: ColorRole) -> &str {
        match role {
            ColorRole::Primary => &self.colors.primary,
            ColorRole::Secondary => &self.colors.secondary,
            ColorRole::Accent => &self.colors.accent,
        }
    }

    /// Logo URL if one is set and non-empty
    pub fn logo(&self) -> Option<&str> {
        self.logo_url.as_deref().filter(|url| !url.is_empty())
    }
}

impl From<&BrandKit> for BrandContext {
    fn from(kit: &BrandKit) -> Self {
        Self {
            logo_url: Some(kit.logo_url.clone()),
            colors: BrandColors {
                primary: kit.primary_color.clone(),
                secondary: kit.secondary_color.clone(),
                accent: kit.accent_color.clone(),
            },
        }
    }
}

/// Response for GET/POST /api/brands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandKitResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "brandKit")]
    pub brand_kit: BrandKit,
}

/// Response for POST /api/brands/upload-logo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoUploadResponse {
    pub message: String,
    pub logo_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> BrandKitSave {
        BrandKitSave {
            logo_url: Some("https://cdn.example.com/logos/1.png".into()),
            primary_color: Some("#4F46E5".into()),
            secondary_color: Some("#ffffff".into()),
            accent_color: Some("#F59E0B".into()),
        }
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#4F46E5"));
        assert!(is_hex_color("#abcdef"));
        assert!(!is_hex_color("4F46E5"));
        assert!(!is_hex_color("#4F46E"));
        assert!(!is_hex_color("#GGGGGG"));
        assert!(!is_hex_color("primary"));
    }

    #[test]
    fn test_validate_ok() {
        let fields = full().validate().unwrap();
        assert_eq!(fields.primary_color, "#4F46E5");
        assert_eq!(fields.logo_url, "https://cdn.example.com/logos/1.png");
    }

    #[test]
    fn test_validate_missing_field() {
        let mut save = full();
        save.accent_color = Some("   ".into());
        let err = save.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "All fields are required");

        let err = BrandKitSave::default().validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
    }

    #[test]
    fn test_validate_bad_color() {
        let mut save = full();
        save.secondary_color = Some("white".into());
        let err = save.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidColor);
        assert_eq!(
            err.details.unwrap().get("field").unwrap(),
            "secondary_color"
        );
    }

    #[test]
    fn test_context_from_kit() {
        let kit = BrandKit {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            logo_url: "https://cdn.example.com/l.png".into(),
            primary_color: "#111111".into(),
            secondary_color: "#222222".into(),
            accent_color: "#333333".into(),
            created_at: 0,
            updated_at: 0,
        };
        let ctx = BrandContext::from(&kit);
        assert_eq!(ctx.color(ColorRole::Primary), "#111111");
        assert_eq!(ctx.color(ColorRole::Secondary), "#222222");
        assert_eq!(ctx.color(ColorRole::Accent), "#333333");
        assert_eq!(ctx.logo(), Some("https://cdn.example.com/l.png"));
    }

    #[test]
    fn test_empty_logo_is_absent() {
        let ctx = BrandContext {
            logo_url: Some(String::new()),
            colors: BrandColors {
                primary: "#000000".into(),
                secondary: "#000000".into(),
                accent: "#000000".into(),
            },
        };
        assert_eq!(ctx.logo(), None);
    }

    #[test]
    fn test_response_uses_camel_case_key() {
        let kit = BrandKit {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            logo_url: "u".into(),
            primary_color: "#111111".into(),
            secondary_color: "#222222".into(),
            accent_color: "#333333".into(),
            created_at: 1,
            updated_at: 2,
        };
        let json = serde_json::to_value(BrandKitResponse {
            message: None,
            brand_kit: kit,
        })
        .unwrap();
        assert!(json.get("brandKit").is_some());
        assert!(json.get("message").is_none());
    }
}
