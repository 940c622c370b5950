// ABOUTME: Agreement type catalog seeding utility
// ABOUTME: Creates the five default agreement types, leaving existing ones untouched
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

//! Agreement type seeder.
//!
//! Usage:
//! ```bash
//! # Seed the catalog (uses DATABASE_URL from environment)
//! cargo run --bin seed-agreement-types
//!
//! # Override database URL
//! cargo run --bin seed-agreement-types -- --database-url sqlite:./data/agreements.db
//!
//! # Verbose output
//! cargo run --bin seed-agreement-types -- -v
//! ```

use agreement_studio::{
    config::environment::DatabaseUrl,
    constants::{defaults, env_config, DEFAULT_AGREEMENT_TYPES},
    database::Database,
};
use anyhow::Result;
use clap::Parser;
use std::env;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed-agreement-types",
    about = "Agreement Studio Agreement Type Seeder",
    long_about = "Create the default agreement types offered on the selection step"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    info!("=== Agreement Studio Type Seeder ===");

    let database_url = args
        .database_url
        .or_else(|| env::var(env_config::DATABASE_URL).ok())
        .unwrap_or_else(|| defaults::DATABASE_URL.into());

    info!("Connecting to database: {}", database_url);
    let database = Database::new(&DatabaseUrl::parse_url(&database_url)).await?;
    let types = database.agreement_types();

    let mut created = 0;
    for seed in DEFAULT_AGREEMENT_TYPES {
        let (agreement_type, was_created) = types.get_or_create(seed).await?;
        if was_created {
            created += 1;
            info!("Created: {} {}", agreement_type.icon, agreement_type.name);
        } else {
            info!("Exists:  {} {}", agreement_type.icon, agreement_type.name);
        }
    }

    info!("=== Seeding Complete ===");
    info!(
        "Created {} of {} agreement types",
        created,
        DEFAULT_AGREEMENT_TYPES.len()
    );

    Ok(())
}
