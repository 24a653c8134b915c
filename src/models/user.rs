// ABOUTME: User account row, registration request and public profile shape
// ABOUTME: Profiles carry is_subscribed relative to whoever is viewing them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use crate::constants::{fields, limits::MAX_NAME_LENGTH};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// User id
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Unique email address
    pub email: String,
}

impl User {
    /// Public profile of this user as seen by a viewer
    #[must_use]
    pub fn into_profile(self, is_subscribed: bool) -> UserProfile {
        UserProfile {
            email: self.email,
            id: self.id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            is_subscribed,
        }
    }
}

/// Registration request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewUser {
    /// Login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Email address
    pub email: String,
}

impl NewUser {
    /// Validate and normalize the request
    ///
    /// # Errors
    ///
    /// Returns a field-level validation error for an empty or overlong
    /// username, a username with disallowed characters, or a malformed email
    pub fn validated(self) -> AppResult<Self> {
        let username = self.username.trim().to_owned();
        if username.is_empty() {
            return Err(AppError::validation(fields::USERNAME, "username is required"));
        }
        if username.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::validation(
                fields::USERNAME,
                format!("username must be at most {MAX_NAME_LENGTH} characters"),
            ));
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'))
        {
            return Err(AppError::validation(
                fields::USERNAME,
                "username may contain only letters, digits and @/./+/-/_",
            ));
        }

        let email = self.email.trim().to_lowercase();
        if !is_plausible_email(&email) {
            return Err(AppError::validation(fields::EMAIL, "enter a valid email address"));
        }

        Ok(Self {
            username,
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            email,
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Public user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Email address
    pub email: String,
    /// User id
    pub id: i64,
    /// Login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Whether the viewer follows this user
    pub is_subscribed: bool,
}
