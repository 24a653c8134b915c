// ABOUTME: Configuration module grouping environment and database settings
// ABOUTME: All runtime configuration is read from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

/// Type-safe database URL parsing
pub mod database;

/// Environment-based server configuration
pub mod environment;

pub use database::DatabaseUrl;
pub use environment::{LogLevel, MediaConfig, ServerConfig};
