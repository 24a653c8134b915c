// ABOUTME: Core types and constants for the Foodgram recipe API
// ABOUTME: Foundation crate with error handling, pagination and shared limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![deny(unsafe_code)]

//! # Foodgram Core
//!
//! Foundation crate providing shared types for the Foodgram recipe API.
//! Kept free of storage and routing code so it changes rarely.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Field limits and pagination defaults
//! - **pagination**: Page-number pagination for list endpoints

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Field limits and pagination defaults
pub mod constants;

/// Page-number pagination for list endpoints
pub mod pagination;
