//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Brand kit / upload errors
/// - 3xxx: Template errors
/// - 4xxx: Design errors
/// - 5xxx: Upstream service errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Brand kit errors (2xxx)
    Brand,
    /// Template errors (3xxx)
    Template,
    /// Design errors (4xxx)
    Design,
    /// Upstream service errors (5xxx)
    Upstream,
    /// System errors (6xxx and above)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Brand,
            3000..4000 => Self::Template,
            4000..5000 => Self::Design,
            5000..6000 => Self::Upstream,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Brand => "brand",
            Self::Template => "template",
            Self::Design => "design",
            Self::Upstream => "upstream",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2101), ErrorCategory::Brand);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Template);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Design);
        assert_eq!(ErrorCategory::from_code(5003), ErrorCategory::Upstream);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TokenInvalid.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::FileTooLarge.category(), ErrorCategory::Brand);
        assert_eq!(
            ErrorCode::TemplateNotFound.category(),
            ErrorCategory::Template
        );
        assert_eq!(ErrorCode::DesignNotFound.category(), ErrorCategory::Design);
        assert_eq!(
            ErrorCode::GenerationTimeout.category(),
            ErrorCategory::Upstream
        );
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Upstream).unwrap();
        assert_eq!(json, "\"upstream\"");

        let category: ErrorCategory = serde_json::from_str("\"brand\"").unwrap();
        assert_eq!(category, ErrorCategory::Brand);
    }
}
