// ABOUTME: User route handlers: registration, profiles and author subscriptions
// ABOUTME: Profiles report is_subscribed relative to the requesting viewer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use crate::errors::AppError;
use crate::models::NewUser;
use crate::resources::ServerResources;
use crate::routes::auth::{require_user, resolve_identity};
use crate::routes::{json_body, page_request, recipes_limit};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

/// User routes implementation
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/users/",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route("/api/users/me/", get(Self::handle_me))
            .route(
                "/api/users/subscriptions/",
                get(Self::handle_list_subscriptions),
            )
            .route("/api/users/:id/", get(Self::handle_get))
            .route(
                "/api/users/:id/subscribe/",
                post(Self::handle_subscribe).delete(Self::handle_unsubscribe),
            )
            .with_state(resources)
    }

    /// Handle GET /api/users/
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<Vec<(String, String)>>,
    ) -> Result<Response, AppError> {
        let viewer = resolve_identity(&headers, &resources).await?;
        let page = page_request(&query, &resources)?;
        let users = resources.users.list_profiles(viewer, page).await?;
        Ok((StatusCode::OK, Json(users)).into_response())
    }

    /// Handle POST /api/users/
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<NewUser>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user = resources.users.create_user(json_body(body)?).await?;
        Ok((StatusCode::CREATED, Json(user)).into_response())
    }

    /// Handle GET /api/users/me/
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers, &resources).await?;
        let profile = resources.users.get_profile(user_id, Some(user_id)).await?;
        Ok((StatusCode::OK, Json(profile)).into_response())
    }

    /// Handle GET /api/users/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let viewer = resolve_identity(&headers, &resources).await?;
        let profile = resources.users.get_profile(user_id, viewer).await?;
        Ok((StatusCode::OK, Json(profile)).into_response())
    }

    /// Handle GET /api/users/subscriptions/
    async fn handle_list_subscriptions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<Vec<(String, String)>>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers, &resources).await?;
        let page = page_request(&query, &resources)?;
        let limit = recipes_limit(&query)?;
        let authors = resources
            .subscriptions
            .list_subscriptions(user_id, page, limit)
            .await?;
        Ok((StatusCode::OK, Json(authors)).into_response())
    }

    /// Handle POST /api/users/:id/subscribe/
    async fn handle_subscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(author_id): Path<i64>,
        Query(query): Query<Vec<(String, String)>>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers, &resources).await?;
        let limit = recipes_limit(&query)?;
        resources.subscriptions.subscribe(user_id, author_id).await?;
        let author = resources
            .subscriptions
            .subscribed_author(author_id, limit)
            .await?;
        Ok((StatusCode::CREATED, Json(author)).into_response())
    }

    /// Handle DELETE /api/users/:id/subscribe/
    async fn handle_unsubscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(author_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers, &resources).await?;
        resources.subscriptions.unsubscribe(user_id, author_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
