// ABOUTME: User registration and profile lookups relative to a viewer
// ABOUTME: Profiles carry is_subscribed, resolved through the subscription service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, User, UserProfile};
use crate::pagination::{Page, PageRequest};
use crate::services::subscriptions::SubscriptionService;
use tracing::info;

/// User service
#[derive(Clone)]
pub struct UserService {
    database: Database,
}

impl UserService {
    /// Create a user service
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Register a user
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed input or `Conflict` if the
    /// username or email is taken
    pub async fn create_user(&self, request: NewUser) -> AppResult<User> {
        let request = request.validated()?;
        let user = self.database.users().create(&request).await?;
        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Load a user
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist
    pub async fn get_user(&self, user_id: i64) -> AppResult<User> {
        self.database
            .users()
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id}")))
    }

    /// Profile of `user_id` as seen by `viewer`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist
    pub async fn get_profile(&self, user_id: i64, viewer: Option<i64>) -> AppResult<UserProfile> {
        let user = self.get_user(user_id).await?;
        let subscribed = SubscriptionService::new(self.database.clone())
            .is_subscribed(viewer, user_id)
            .await?;
        Ok(user.into_profile(subscribed))
    }

    /// One page of profiles ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn list_profiles(
        &self,
        viewer: Option<i64>,
        page: PageRequest,
    ) -> AppResult<Page<UserProfile>> {
        let (users, count) = self.database.users().list(page).await?;
        let subscriptions = SubscriptionService::new(self.database.clone());

        let mut results = Vec::with_capacity(users.len());
        for user in users {
            let subscribed = subscriptions.is_subscribed(viewer, user.id).await?;
            results.push(user.into_profile(subscribed));
        }
        Ok(Page::new(results, count, page))
    }
}
