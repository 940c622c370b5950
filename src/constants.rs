// ABOUTME: System-wide constants and configuration defaults for Agreement Studio
// ABOUTME: Environment variable names, server defaults, and generation parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

//! # Constants Module
//!
//! Hardcoded defaults and the names of the environment variables that override
//! them. Flow paths and catalog seed data live in `studio_core::constants` and
//! are re-exported here.

pub use studio_core::constants::{paths, photos, session, AgreementTypeSeed, DEFAULT_AGREEMENT_TYPES};

/// Service identification
pub mod service_names {
    /// Service name used in logs
    pub const AGREEMENT_STUDIO: &str = "agreement-studio";
}

/// Environment variable names
pub mod env_config {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// HTTP listen host
    pub const HOST: &str = "HOST";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Database connection string
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Root directory for stored photos
    pub const MEDIA_ROOT: &str = "MEDIA_ROOT";
    /// Gemini API key
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Gemini model override
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
    /// Bearer token for the staff archive
    pub const STAFF_TOKEN: &str = "STUDIO_STAFF_TOKEN";
    /// Per-attempt chat timeout
    pub const CHAT_TIMEOUT_SECS: &str = "CHAT_TIMEOUT_SECS";
    /// Total chat attempts
    pub const CHAT_MAX_ATTEMPTS: &str = "CHAT_MAX_ATTEMPTS";
    /// Pause between chat attempts
    pub const CHAT_RETRY_PAUSE_SECS: &str = "CHAT_RETRY_PAUSE_SECS";
    /// Per-attempt generator timeout
    pub const GENERATOR_TIMEOUT_SECS: &str = "GENERATOR_TIMEOUT_SECS";
    /// Total generator attempts
    pub const GENERATOR_MAX_ATTEMPTS: &str = "GENERATOR_MAX_ATTEMPTS";
    /// Mark the session cookie `Secure`
    pub const SECURE_COOKIES: &str = "SECURE_COOKIES";
}

/// Server defaults
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8080;
    /// Default listen host
    pub const HOST: &str = "127.0.0.1";
    /// Default database location
    pub const DATABASE_URL: &str = "sqlite:./data/agreements.db";
    /// Default media root
    pub const MEDIA_ROOT: &str = "./media";
    /// Maximum accepted request body (photos included)
    pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;
}

/// Sampling and retry parameters for the assistant calls
pub mod generation {
    /// Sampling temperature for both chat and document generation
    pub const TEMPERATURE: f32 = 0.7;
    /// Nucleus sampling mass
    pub const TOP_P: f32 = 0.8;
    /// Top-k sampling width
    pub const TOP_K: u32 = 40;

    /// Output cap for a reflection reply
    pub const CHAT_MAX_TOKENS: u32 = 300;
    /// Per-attempt timeout for a reflection reply
    pub const CHAT_TIMEOUT_SECS: u64 = 30;
    /// Total attempts for a reflection reply
    pub const CHAT_MAX_ATTEMPTS: u32 = 2;
    /// Pause between reflection attempts
    pub const CHAT_RETRY_PAUSE_SECS: u64 = 2;

    /// Output cap for the agreement document
    pub const GENERATOR_MAX_TOKENS: u32 = 800;
    /// Per-attempt timeout for the agreement document
    pub const GENERATOR_TIMEOUT_SECS: u64 = 60;
    /// Total attempts for the agreement document
    pub const GENERATOR_MAX_ATTEMPTS: u32 = 1;
}
