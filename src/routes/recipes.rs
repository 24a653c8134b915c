// ABOUTME: Recipe route handlers: listing, detail, authoring, favourites and shopping cart
// ABOUTME: Also serves the aggregated shopping list as a plain-text attachment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Recipe routes
//!
//! Reads are open to anonymous viewers; writes need an authenticated user and
//! edits are limited to the recipe's author.

use crate::constants::shopping_list::EXPORT_FILENAME;
use crate::errors::AppError;
use crate::models::{CollectionKind, RecipeFilter, RecipeShort, RecipeWriteRequest};
use crate::resources::ServerResources;
use crate::routes::auth::{require_user, resolve_identity};
use crate::routes::{json_body, page_request};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tracing::info;

/// Recipe routes implementation
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes/",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/recipes/download_shopping_cart/",
                get(Self::handle_download_shopping_cart),
            )
            .route(
                "/api/recipes/:id/",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/api/recipes/:id/favorite/",
                post(Self::handle_add_favorite).delete(Self::handle_remove_favorite),
            )
            .route(
                "/api/recipes/:id/shopping_cart/",
                post(Self::handle_add_to_cart).delete(Self::handle_remove_from_cart),
            )
            .with_state(resources)
    }

    /// Handle GET /api/recipes/
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<Vec<(String, String)>>,
    ) -> Result<Response, AppError> {
        let viewer = resolve_identity(&headers, &resources).await?;
        let page = page_request(&query, &resources)?;
        let filter = RecipeFilter::from_query_pairs(&query);
        let recipes = resources.recipes.list_recipes(&filter, viewer, page).await?;
        Ok((StatusCode::OK, Json(recipes)).into_response())
    }

    /// Handle POST /api/recipes/
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<RecipeWriteRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers, &resources).await?;
        let (fields, tag_ids, lines) = json_body(body)?.into_parts();
        let recipe = resources
            .recipes
            .create_recipe(user_id, fields, &tag_ids, &lines)
            .await?;
        let detail = resources
            .recipes
            .get_recipe_detail(recipe.id, Some(user_id))
            .await?;
        Ok((StatusCode::CREATED, Json(detail)).into_response())
    }

    /// Handle GET /api/recipes/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let viewer = resolve_identity(&headers, &resources).await?;
        let detail = resources.recipes.get_recipe_detail(recipe_id, viewer).await?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    }

    /// Handle PATCH /api/recipes/:id/
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
        body: Result<Json<RecipeWriteRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers, &resources).await?;
        resources.recipes.authorize_edit(recipe_id, user_id).await?;

        let (fields, tag_ids, lines) = json_body(body)?.into_parts();
        resources
            .recipes
            .update_recipe(recipe_id, fields, &tag_ids, &lines)
            .await?;
        let detail = resources
            .recipes
            .get_recipe_detail(recipe_id, Some(user_id))
            .await?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    }

    /// Handle DELETE /api/recipes/:id/
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers, &resources).await?;
        resources.recipes.authorize_edit(recipe_id, user_id).await?;
        resources.recipes.delete_recipe(recipe_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/recipes/:id/favorite/
    async fn handle_add_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers, &resources).await?;
        Self::add_to_collection(&resources, CollectionKind::Favourite, user_id, recipe_id).await
    }

    /// Handle DELETE /api/recipes/:id/favorite/
    async fn handle_remove_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers, &resources).await?;
        resources
            .collections
            .remove(CollectionKind::Favourite, user_id, recipe_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/recipes/:id/shopping_cart/
    async fn handle_add_to_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers, &resources).await?;
        Self::add_to_collection(&resources, CollectionKind::Cart, user_id, recipe_id).await
    }

    /// Handle DELETE /api/recipes/:id/shopping_cart/
    async fn handle_remove_from_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers, &resources).await?;
        resources
            .collections
            .remove(CollectionKind::Cart, user_id, recipe_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle GET /api/recipes/download_shopping_cart/
    async fn handle_download_shopping_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers, &resources).await?;
        let body = resources.shopping_list.export_shopping_list(user_id).await?;
        info!(user_id, bytes = body.len(), "Shopping list exported");

        Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILENAME}\""),
                ),
            ],
            body,
        )
            .into_response())
    }

    async fn add_to_collection(
        resources: &ServerResources,
        kind: CollectionKind,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<Response, AppError> {
        resources.collections.add(kind, user_id, recipe_id).await?;
        let recipe = resources.recipes.get_recipe(recipe_id).await?;
        Ok((StatusCode::CREATED, Json(RecipeShort::from(recipe))).into_response())
    }
}
