//! User Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, ErrorCode};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// User entity (row in `users`)
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string
    pub password: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Public view of a user (no password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: Some(user.created_at),
        }
    }
}

/// POST /api/auth/register
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated registration input; email is trimmed and lowercased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewUser, AppError> {
        let name = self.name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let email = self.email.map(|s| normalize_email(&s)).filter(|s| !s.is_empty());
        let password = self.password.filter(|s| !s.is_empty());

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name");
        }
        if email.is_none() {
            missing.push("email");
        }
        if password.is_none() {
            missing.push("password");
        }
        let (Some(name), Some(email), Some(password)) = (name, email, password) else {
            return Err(AppError::required(&missing));
        };

        if !looks_like_email(&email) {
            return Err(AppError::with_message(
                ErrorCode::InvalidFormat,
                "Please provide a valid email",
            )
            .with_detail("field", "email"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::new(ErrorCode::PasswordTooShort)
                .with_detail("min_length", MIN_PASSWORD_LEN));
        }

        Ok(NewUser {
            name,
            email,
            password,
        })
    }
}

/// POST /api/auth/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for register/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

/// Response for GET /api/auth/me
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub success: bool,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[test]
    fn test_register_normalizes_email() {
        let user = req(" Ada ", "  Ada@Example.COM ", "correct horse")
            .validate()
            .unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn test_register_missing_fields() {
        let err = RegisterRequest {
            name: None,
            email: Some("a@b.co".into()),
            password: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(
            err.details.unwrap().get("fields").unwrap(),
            &serde_json::json!(["name", "password"])
        );
    }

    #[test]
    fn test_register_rejects_short_password() {
        let err = req("Ada", "ada@example.com", "short").validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::PasswordTooShort);
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let err = req("Ada", "not-an-email", "long enough").validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_profile_hides_password() {
        let user = User {
            id: Uuid::nil(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "$argon2id$secret".into(),
            created_at: 10,
            updated_at: 10,
        };
        let json = serde_json::to_string(&UserProfile::from(&user)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"createdAt\":10"));
    }
}
