// ABOUTME: Subscription service: follow and unfollow authors, list followed authors
// ABOUTME: Listing projects each author with their recipes and recipe count
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{SubscribedAuthor, Subscription, User};
use crate::pagination::{Page, PageRequest};
use tracing::info;

/// Author subscription service
#[derive(Clone)]
pub struct SubscriptionService {
    database: Database,
}

impl SubscriptionService {
    /// Create a subscription service
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Follow an author
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` when subscribing to oneself, `NotFound` for
    /// an unknown author, or `Conflict` if already subscribed
    pub async fn subscribe(&self, subscriber_id: i64, author_id: i64) -> AppResult<Subscription> {
        if subscriber_id == author_id {
            return Err(AppError::invalid_operation("Cannot subscribe to yourself")
                .with_user_id(subscriber_id));
        }
        if !self.database.users().exists(author_id).await? {
            return Err(AppError::not_found(format!("User {author_id}")));
        }

        let subscription = self
            .database
            .subscriptions()
            .insert(subscriber_id, author_id)
            .await?
            .ok_or_else(|| {
                AppError::conflict(format!("Already subscribed to user {author_id}"))
                    .with_user_id(subscriber_id)
            })?;

        info!(subscriber_id, author_id, "Subscribed");
        Ok(subscription)
    }

    /// Stop following an author
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such subscription exists
    pub async fn unsubscribe(&self, subscriber_id: i64, author_id: i64) -> AppResult<()> {
        if !self
            .database
            .subscriptions()
            .delete(subscriber_id, author_id)
            .await?
        {
            return Err(
                AppError::not_found(format!("Subscription to user {author_id}"))
                    .with_user_id(subscriber_id),
            );
        }

        info!(subscriber_id, author_id, "Unsubscribed");
        Ok(())
    }

    /// Whether `viewer` follows `author_id`; false for anonymous viewers and for oneself
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn is_subscribed(&self, viewer: Option<i64>, author_id: i64) -> AppResult<bool> {
        match viewer {
            Some(viewer_id) if viewer_id != author_id => {
                self.database
                    .subscriptions()
                    .exists(viewer_id, author_id)
                    .await
            }
            _ => Ok(false),
        }
    }

    /// One page of followed authors, newest subscription first
    ///
    /// `recipes_limit` caps how many recipes are embedded per author; the
    /// count always covers all of them.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn list_subscriptions(
        &self,
        subscriber_id: i64,
        page: PageRequest,
        recipes_limit: Option<i64>,
    ) -> AppResult<Page<SubscribedAuthor>> {
        let (authors, count) = self
            .database
            .subscriptions()
            .list_authors(subscriber_id, page)
            .await?;

        let mut results = Vec::with_capacity(authors.len());
        for author in authors {
            results.push(self.project(author, recipes_limit).await?);
        }

        Ok(Page::new(results, count, page))
    }

    /// A single followed author in the subscription listing shape
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the author does not exist
    pub async fn subscribed_author(
        &self,
        author_id: i64,
        recipes_limit: Option<i64>,
    ) -> AppResult<SubscribedAuthor> {
        let author = self
            .database
            .users()
            .get(author_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {author_id}")))?;
        self.project(author, recipes_limit).await
    }

    async fn project(&self, author: User, recipes_limit: Option<i64>) -> AppResult<SubscribedAuthor> {
        let recipes = self.database.recipes();
        let author_recipes = recipes.short_by_author(author.id, recipes_limit).await?;
        let recipes_count = recipes.count_by_author(author.id).await?;
        Ok(SubscribedAuthor {
            profile: author.into_profile(true),
            recipes: author_recipes,
            recipes_count,
        })
    }
}
