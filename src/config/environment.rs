// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and assistant call budgets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

//! Environment-based configuration management for production deployment

use crate::assistant::RetryPolicy;
use crate::constants::{defaults, env_config, generation};
use crate::llm::gemini::DEFAULT_MODEL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Environment type for cookie security and logging defaults
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Deployed exhibition
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// File path
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from a connection string
    ///
    /// A bare path is treated as a `SQLite` file.
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(defaults::DATABASE_URL)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Generative-text provider settings
#[derive(Clone)]
pub struct LlmConfig {
    /// Gemini API key; the offline provider is used when absent
    pub api_key: Option<String>,
    /// Gemini model name
    pub model: String,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .finish()
    }
}

/// Retry and timeout budgets for the two assistant calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Reflection reply budget
    pub chat: RetryPolicy,
    /// Agreement document budget
    pub generator: RetryPolicy,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            chat: RetryPolicy::chat_defaults(),
            generator: RetryPolicy::generator_defaults(),
        }
    }
}

/// Complete server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// HTTP listen host
    pub host: String,
    /// Deployment environment
    pub environment: Environment,
    /// Database location
    pub database: DatabaseUrl,
    /// Root directory for signing photo blobs
    pub media_root: PathBuf,
    /// Provider settings
    pub llm: LlmConfig,
    /// Assistant call budgets
    pub assistant: AssistantConfig,
    /// Bearer token guarding the archive; archive is closed when absent
    pub staff_token: Option<String>,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("http_port", &self.http_port)
            .field("host", &self.host)
            .field("environment", &self.environment)
            .field("database", &self.database)
            .field("media_root", &self.media_root)
            .field("llm", &self.llm)
            .field("assistant", &self.assistant)
            .field("staff_token", &self.staff_token.as_ref().map(|_| "[REDACTED]"))
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean variable does not parse
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let environment =
            Environment::from_str_or_default(&env_var_or(env_config::ENVIRONMENT, "development"));

        let http_port = env_var_or(env_config::HTTP_PORT, &defaults::HTTP_PORT.to_string())
            .parse()
            .context("Invalid HTTP_PORT value")?;

        let secure_cookies = env_var_or(
            env_config::SECURE_COOKIES,
            &environment.is_production().to_string(),
        )
        .parse()
        .context("Invalid SECURE_COOKIES value")?;

        let chat = RetryPolicy {
            max_attempts: parse_var(env_config::CHAT_MAX_ATTEMPTS, generation::CHAT_MAX_ATTEMPTS)?,
            pause: Duration::from_secs(parse_var(
                env_config::CHAT_RETRY_PAUSE_SECS,
                generation::CHAT_RETRY_PAUSE_SECS,
            )?),
            timeout: Duration::from_secs(parse_var(
                env_config::CHAT_TIMEOUT_SECS,
                generation::CHAT_TIMEOUT_SECS,
            )?),
        };

        let generator = RetryPolicy {
            max_attempts: parse_var(
                env_config::GENERATOR_MAX_ATTEMPTS,
                generation::GENERATOR_MAX_ATTEMPTS,
            )?,
            pause: Duration::ZERO,
            timeout: Duration::from_secs(parse_var(
                env_config::GENERATOR_TIMEOUT_SECS,
                generation::GENERATOR_TIMEOUT_SECS,
            )?),
        };

        Ok(Self {
            http_port,
            host: env_var_or(env_config::HOST, defaults::HOST),
            environment,
            database: DatabaseUrl::parse_url(&env_var_or(
                env_config::DATABASE_URL,
                defaults::DATABASE_URL,
            )),
            media_root: PathBuf::from(env_var_or(env_config::MEDIA_ROOT, defaults::MEDIA_ROOT)),
            llm: LlmConfig {
                api_key: non_empty_var(env_config::GEMINI_API_KEY),
                model: env_var_or(env_config::GEMINI_MODEL, DEFAULT_MODEL),
            },
            assistant: AssistantConfig { chat, generator },
            staff_token: non_empty_var(env_config::STAFF_TOKEN),
            secure_cookies,
        })
    }

    /// Log-safe configuration summary; secrets are reported only as present or absent
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Agreement Studio Configuration:\n\
             - Listen: {}:{}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Media Root: {}\n\
             - Gemini: {}\n\
             - Chat Budget: {} attempt(s), {}s timeout, {}s pause\n\
             - Generator Budget: {} attempt(s), {}s timeout\n\
             - Staff Archive: {}\n\
             - Secure Cookies: {}",
            self.host,
            self.http_port,
            self.environment,
            self.database,
            self.media_root.display(),
            if self.llm.api_key.is_some() {
                format!("Enabled ({})", self.llm.model)
            } else {
                "Offline (fallback responses only)".to_owned()
            },
            self.assistant.chat.max_attempts,
            self.assistant.chat.timeout.as_secs(),
            self.assistant.chat.pause.as_secs(),
            self.assistant.generator.max_attempts,
            self.assistant.generator.timeout.as_secs(),
            if self.staff_token.is_some() {
                "Enabled"
            } else {
                "Closed"
            },
            self.secure_cookies,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Get a non-blank environment variable
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr + ToString,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_var_or(key, &default.to_string())
        .parse()
        .with_context(|| format!("Invalid {key} value"))
}
