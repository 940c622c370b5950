// ABOUTME: Main library entry point for Agreement Studio
// ABOUTME: Guided, AI-assisted co-authoring of personal agreements with a signed, photographed archive
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

#![deny(unsafe_code)]

//! # Agreement Studio
//!
//! Two or more people choose an agreement type, reflect on it in a short
//! dialogue with an assistant, receive a generated agreement document, edit
//! it, print and sign it, and photograph the signing. Completed agreements
//! form an exhibition archive visible to staff.
//!
//! ## Architecture
//!
//! - **Flow**: session state machine over the agreement record
//! - **Assistant**: conversation client and agreement generator with retry and fallback
//! - **LLM**: provider abstraction with a Gemini implementation
//! - **Database**: `SQLite` record store
//! - **Photos**: signing photo decoding and blob storage
//! - **Routes**: axum routers for pages, API, archive and health
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use agreement_studio::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Agreement Studio configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Conversation client and agreement generator
pub mod assistant;

/// Environment-based configuration
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// `SQLite` record store
pub mod database;

/// Unified error types
pub mod errors;

/// Session state machine for one agreement
pub mod flow;

/// Generative-text provider abstraction
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Signing photo decoding and storage
pub mod photos;

/// Shared resources handed to the routers
pub mod resources;

/// HTTP routes
pub mod routes;

/// Graceful shutdown trigger
pub mod shutdown;
