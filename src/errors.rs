// ABOUTME: Re-export of the unified error types from the core crate
// ABOUTME: Lets server modules write `crate::errors::AppError` without naming the core crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

//! # Unified Error Handling
//!
//! Error types live in `studio_core::errors` so that the models crate and the
//! server crate share one `AppError`. See that module for the error taxonomy.

pub use studio_core::errors::{AppError, AppResult, ErrorCode, ErrorResponse, ErrorResponseDetails};
