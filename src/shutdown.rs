// ABOUTME: Graceful shutdown trigger for the HTTP server
// ABOUTME: Resolves on Ctrl+C; a signal handler that cannot be installed never triggers shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

use std::fmt::Display;
use std::future::Future;

use tracing::{error, info};

/// Resolve once the process receives Ctrl+C
pub async fn signal() {
    wait_for(tokio::signal::ctrl_c()).await;
}

/// Resolve when `listener` reports a signal
///
/// If the listener fails the error is logged and this never resolves, so the
/// server keeps running instead of shutting down at startup.
pub async fn wait_for<F, E>(listener: F)
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match listener.await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_signal_resolves_shutdown() {
        let waited = tokio::time::timeout(
            Duration::from_millis(100),
            wait_for(async { Ok::<(), std::io::Error>(()) }),
        )
        .await;
        assert!(waited.is_ok());
    }

    #[tokio::test]
    async fn test_failed_listener_never_shuts_down() {
        let waited = tokio::time::timeout(
            Duration::from_millis(100),
            wait_for(async { Err::<(), _>(std::io::Error::other("no signal handler")) }),
        )
        .await;
        assert!(waited.is_err(), "server must keep running");
    }
}
