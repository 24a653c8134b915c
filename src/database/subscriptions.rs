// ABOUTME: Subscription storage linking a subscriber to the authors they follow
// ABOUTME: Pairs are unique and self-subscription is rejected by a CHECK constraint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Subscription, User};
use crate::pagination::PageRequest;
use sqlx::SqlitePool;

impl Database {
    /// Create the subscriptions table
    pub(super) async fn migrate_subscriptions(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS subscriptions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subscriber_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                UNIQUE (subscriber_id, author_id),
                CHECK (subscriber_id <> author_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_subscriptions_author ON subscriptions(author_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Subscription manager
pub struct SubscriptionsManager {
    pool: SqlitePool,
}

impl SubscriptionsManager {
    /// Create a new subscriptions manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a subscription unless the pair already exists
    ///
    /// Returns `None` when the pair already existed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown user, `InvalidInput` when the check
    /// constraint rejects a self-subscription, or a database error
    pub async fn insert(&self, subscriber_id: i64, author_id: i64) -> AppResult<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(
            r"
            INSERT INTO subscriptions (subscriber_id, author_id)
            VALUES ($1, $2)
            ON CONFLICT (subscriber_id, author_id) DO NOTHING
            RETURNING id, subscriber_id, author_id
            ",
        )
        .bind(subscriber_id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    /// Remove a subscription; `false` when there was none
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete(&self, subscriber_id: i64, author_id: i64) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = $1 AND author_id = $2")
                .bind(subscriber_id)
                .bind(author_id)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to unsubscribe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether `subscriber_id` follows `author_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn exists(&self, subscriber_id: i64, author_id: i64) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM subscriptions WHERE subscriber_id = $1 AND author_id = $2",
        )
        .bind(subscriber_id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check subscription: {e}")))?;

        Ok(found.is_some())
    }

    /// One page of followed authors, newest subscription first, with the total count
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_authors(
        &self,
        subscriber_id: i64,
        page: PageRequest,
    ) -> AppResult<(Vec<User>, u64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE subscriber_id = $1")
                .bind(subscriber_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to count subscriptions: {e}")))?;

        let authors = sqlx::query_as::<_, User>(
            r"
            SELECT u.id, u.username, u.first_name, u.last_name, u.email
            FROM subscriptions s
            JOIN users u ON u.id = s.author_id
            WHERE s.subscriber_id = $1
            ORDER BY s.id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(subscriber_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list subscriptions: {e}")))?;

        Ok((authors, total.max(0) as u64))
    }
}
