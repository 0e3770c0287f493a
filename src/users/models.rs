use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const FULL_NAME_MAX_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Username is required")]
    UsernameRequired,
    #[error("Username must be between 3 and 50 characters")]
    UsernameLength,
    #[error("Email is required")]
    EmailRequired,
    #[error("Email should be valid")]
    EmailInvalid,
    #[error("Full name is required")]
    FullNameRequired,
    #[error("Full name must not exceed 100 characters")]
    FullNameTooLong,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9._%+-]+@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .expect("email pattern is valid")
});

fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        if is_blank(&self.username) {
            return Err(ValidationError::UsernameRequired);
        }
        if is_blank(&self.email) {
            return Err(ValidationError::EmailRequired);
        }
        if is_blank(&self.full_name) {
            return Err(ValidationError::FullNameRequired);
        }
        let (Some(username), Some(email), Some(full_name)) =
            (self.username, self.email, self.full_name)
        else {
            return Err(ValidationError::UsernameRequired);
        };

        let len = username.chars().count();
        if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
            return Err(ValidationError::UsernameLength);
        }
        if !is_valid_email(&email) {
            return Err(ValidationError::EmailInvalid);
        }
        if full_name.chars().count() > FULL_NAME_MAX_LEN {
            return Err(ValidationError::FullNameTooLong);
        }

        Ok(NewUser {
            username,
            email,
            full_name,
        })
    }
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                return Err(ValidationError::EmailInvalid);
            }
        }
        if let Some(full_name) = &self.full_name {
            if full_name.chars().count() > FULL_NAME_MAX_LEN {
                return Err(ValidationError::FullNameTooLong);
            }
        }
        Ok(())
    }
}

/// Envelope returned by every users route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}
