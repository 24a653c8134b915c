// ABOUTME: Re-exports the unified error types from foodgram-core
// ABOUTME: Lets library code write crate::errors::AppError without naming the core crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

pub use foodgram_core::errors::*;
