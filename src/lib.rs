// ABOUTME: Main library entry point for the Foodgram recipe-sharing API
// ABOUTME: Wires storage, domain services, media storage and HTTP routes together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Foodgram Server
//!
//! Recipe-sharing backend. Users publish recipes built from reference
//! ingredients and tags, keep favourites and a shopping cart, follow other
//! authors, and export a consolidated shopping list.
//!
//! ## Architecture
//!
//! - **database**: `SQLite` entity store, one manager per aggregate
//! - **services**: recipe composition, cart aggregation, favourite/cart
//!   toggles, subscriptions and users
//! - **media**: image storage behind the `ImageStore` trait
//! - **routes**: axum routers exposing the services under `/api`
//!
//! ## Example
//!
//! ```rust,no_run
//! use foodgram_server::config::environment::ServerConfig;
//! use foodgram_server::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Foodgram configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Server configuration loaded from the environment
pub mod config;

/// Service-level constants
pub mod constants;

/// Entity store and per-aggregate managers
pub mod database;

/// Unified error handling, re-exported from the core crate
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Recipe image storage
pub mod media;

/// Domain and presentation models
pub mod models;

/// Page-number pagination, re-exported from the core crate
pub mod pagination;

/// Shared server state handed to every router
pub mod resources;

/// HTTP routes
pub mod routes;

/// Domain services operating on the entity store
pub mod services;
