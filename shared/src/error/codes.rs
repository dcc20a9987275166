//! Unified error codes for the brand kit service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Brand kit and upload errors
//! - 3xxx: Template errors
//! - 4xxx: Design errors
//! - 5xxx: Upstream service errors (object storage, image generation)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the frontend can match
/// on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Route does not exist
    RouteNotFound = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Email is already registered
    EmailAlreadyRegistered = 1005,
    /// Password too short
    PasswordTooShort = 1006,
    /// Too many requests from the same client
    TooManyRequests = 1007,
    /// Authenticated user no longer exists
    UserNotFound = 1008,

    // ==================== 2xxx: Brand kit ====================
    /// No brand kit saved for the user
    BrandKitNotFound = 2001,
    /// Color is not a `#RRGGBB` value
    InvalidColor = 2002,
    /// Uploaded file exceeds the size ceiling
    FileTooLarge = 2101,
    /// File extension / content type not accepted
    UnsupportedFileFormat = 2102,
    /// File content is not a decodable image
    InvalidImageFile = 2103,
    /// No file part in the multipart body
    NoFileProvided = 2104,
    /// File part was empty
    EmptyFile = 2105,

    // ==================== 3xxx: Template ====================
    /// Template not found in the catalog
    TemplateNotFound = 3001,
    /// Template definition is invalid
    TemplateInvalid = 3002,

    // ==================== 4xxx: Design ====================
    /// Design not found (or not owned by the caller)
    DesignNotFound = 4001,
    /// Headline or description exceeds the allowed length
    TextTooLong = 4002,
    /// Saved design data cannot be read back
    DesignDataInvalid = 4003,

    // ==================== 5xxx: Upstream ====================
    /// Object storage request failed
    StorageFailed = 5001,
    /// Image generation request failed
    GenerationFailed = 5002,
    /// Image generation did not finish within the attempt ceiling
    GenerationTimeout = 5003,
    /// Image generation wait was cancelled
    GenerationCancelled = 5004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::RouteNotFound => "Route not found",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::EmailAlreadyRegistered => "User already exists with this email",
            ErrorCode::PasswordTooShort => "Password is too short",
            ErrorCode::TooManyRequests => "Too many requests, try again later",
            ErrorCode::UserNotFound => "User not found",

            // Brand kit
            ErrorCode::BrandKitNotFound => "No brand kit found",
            ErrorCode::InvalidColor => "Color must be a #RRGGBB hex value",
            ErrorCode::FileTooLarge => "File is too large",
            ErrorCode::UnsupportedFileFormat => "Only image files are allowed",
            ErrorCode::InvalidImageFile => "File is not a valid image",
            ErrorCode::NoFileProvided => "No file uploaded",
            ErrorCode::EmptyFile => "Uploaded file is empty",

            // Template
            ErrorCode::TemplateNotFound => "Template not found",
            ErrorCode::TemplateInvalid => "Template definition is invalid",

            // Design
            ErrorCode::DesignNotFound => "Design not found",
            ErrorCode::TextTooLong => "Text exceeds the allowed length",
            ErrorCode::DesignDataInvalid => "Saved design data is invalid",

            // Upstream
            ErrorCode::StorageFailed => "Failed to store file",
            ErrorCode::GenerationFailed => "Failed to generate image",
            ErrorCode::GenerationTimeout => "Image generation timed out",
            ErrorCode::GenerationCancelled => "Image generation was cancelled",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::RouteNotFound),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::EmailAlreadyRegistered),
            1006 => Ok(ErrorCode::PasswordTooShort),
            1007 => Ok(ErrorCode::TooManyRequests),
            1008 => Ok(ErrorCode::UserNotFound),

            // Brand kit
            2001 => Ok(ErrorCode::BrandKitNotFound),
            2002 => Ok(ErrorCode::InvalidColor),
            2101 => Ok(ErrorCode::FileTooLarge),
            2102 => Ok(ErrorCode::UnsupportedFileFormat),
            2103 => Ok(ErrorCode::InvalidImageFile),
            2104 => Ok(ErrorCode::NoFileProvided),
            2105 => Ok(ErrorCode::EmptyFile),

            // Template
            3001 => Ok(ErrorCode::TemplateNotFound),
            3002 => Ok(ErrorCode::TemplateInvalid),

            // Design
            4001 => Ok(ErrorCode::DesignNotFound),
            4002 => Ok(ErrorCode::TextTooLong),
            4003 => Ok(ErrorCode::DesignDataInvalid),

            // Upstream
            5001 => Ok(ErrorCode::StorageFailed),
            5002 => Ok(ErrorCode::GenerationFailed),
            5003 => Ok(ErrorCode::GenerationTimeout),
            5004 => Ok(ErrorCode::GenerationCancelled),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
