// ABOUTME: Core types and constants for the Agreement Studio service
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

#![deny(unsafe_code)]

//! # Studio Core
//!
//! Foundation crate providing shared types for the Agreement Studio workflow
//! service. This crate changes rarely, so the server crate can rebuild
//! incrementally on top of it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: Agreement aggregate, agreement type catalog entries, photos
//! - **constants**: Flow paths, session cookie naming, and catalog seed data

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Domain models for the agreement workflow
pub mod models;

/// Application constants organized by domain
pub mod constants;
