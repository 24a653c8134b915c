// ABOUTME: HTTP route assembly for the recipe API, reference data, users and health checks
// ABOUTME: Applies tracing, request-id, timeout and body-limit layers and serves media files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! HTTP routes
//!
//! Each area exposes a unit struct with a `routes(resources)` constructor;
//! [`build_router`] merges them into the application router.

/// Request identity resolution
pub mod auth;
/// Liveness and readiness probes
pub mod health;
/// Ingredient and tag lookups
pub mod reference;
/// Recipes, favourites, cart and shopping list export
pub mod recipes;
/// Users, profiles and subscriptions
pub mod users;

pub use auth::{require_user, resolve_identity};
pub use health::HealthRoutes;
pub use recipes::RecipeRoutes;
pub use reference::ReferenceRoutes;
pub use users::UserRoutes;

use crate::constants::defaults::MAX_BODY_BYTES;
use crate::errors::{AppError, AppResult};
use crate::pagination::{PageRequest, PaginationParams};
use crate::resources::ServerResources;
use axum::extract::rejection::JsonRejection;
use axum::extract::DefaultBodyLimit;
use axum::{Json, Router};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the application router with all middleware applied
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let config = Arc::clone(&resources.config);
    let media_mount = config.media.url.trim_end_matches('/').to_owned();

    Router::new()
        .merge(RecipeRoutes::routes(Arc::clone(&resources)))
        .merge(UserRoutes::routes(Arc::clone(&resources)))
        .merge(ReferenceRoutes::routes(Arc::clone(&resources)))
        .merge(HealthRoutes::routes(resources))
        .nest_service(&media_mount, ServeDir::new(&config.media.root))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(TimeoutLayer::new(config.request_timeout())),
        )
}

/// Unwrap a JSON body, turning extractor rejections into the API error shape
///
/// # Errors
///
/// Returns `InvalidInput` when the body is missing, not JSON, or does not
/// match the expected shape
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
}

/// Look up the last value of a query parameter
pub(crate) fn query_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

/// Parse an optional numeric query parameter
///
/// # Errors
///
/// Returns a validation error naming the parameter when the value is not a
/// number
pub(crate) fn query_number<T: FromStr>(
    pairs: &[(String, String)],
    key: &str,
) -> AppResult<Option<T>> {
    query_value(pairs, key)
        .filter(|value| !value.trim().is_empty())
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| AppError::validation(key, "must be a number"))
        })
        .transpose()
}

/// Resolve `page` and `limit` query parameters against the configured default
///
/// # Errors
///
/// Returns a validation error when either parameter is not a number
pub(crate) fn page_request(
    pairs: &[(String, String)],
    resources: &ServerResources,
) -> AppResult<PageRequest> {
    let params = PaginationParams {
        page: query_number(pairs, "page")?,
        limit: query_number(pairs, "limit")?,
    };
    Ok(params.resolve(resources.config.default_page_size))
}

/// Parse `recipes_limit`, rejecting negative values
///
/// # Errors
///
/// Returns a validation error when the value is not a non-negative number
pub(crate) fn recipes_limit(pairs: &[(String, String)]) -> AppResult<Option<i64>> {
    match query_number::<i64>(pairs, "recipes_limit")? {
        Some(limit) if limit < 0 => Err(AppError::validation(
            "recipes_limit",
            "must not be negative",
        )),
        other => Ok(other),
    }
}
