//! Polling loop that keeps the channel in sync with the feed.
//!
//! Cycles never overlap: the next check is scheduled only once the previous
//! one has finished, successfully or not.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;

use crate::config::CHECK_INTERVAL;
use crate::poster::Poster;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Pause between the end of a check and the start of the next one
    pub check_interval: Duration,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            check_interval: CHECK_INTERVAL,
        }
    }
}

impl DaemonConfig {
    /// Format interval for display
    pub fn format_interval(interval: Duration) -> String {
        let secs = interval.as_secs();
        if secs >= 86400 && secs.is_multiple_of(86400) {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs.is_multiple_of(3600) {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs.is_multiple_of(60) {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

/// Daemon runner
pub struct Daemon {
    poster: Poster,
    config: DaemonConfig,
}

impl Daemon {
    pub fn new(poster: Poster, config: DaemonConfig) -> Self {
        Self { poster, config }
    }

    pub fn poster(&self) -> &Poster {
        &self.poster
    }

    /// Run until SIGINT or SIGTERM.
    pub async fn run(self) -> Self {
        self.run_until(shutdown_signal()).await
    }

    /// Run until `shutdown` resolves. Shutdown is only observed between
    /// cycles, never in the middle of one.
    pub async fn run_until<F>(mut self, shutdown: F) -> Self
    where
        F: Future<Output = ()>,
    {
        tracing::info!(
            url = %self.poster.feed_url(),
            interval = %DaemonConfig::format_interval(self.config.check_interval),
            "Started RSS feed check loop"
        );

        tokio::pin!(shutdown);

        loop {
            self.run_cycle().await;

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.config.check_interval) => {}
            }
        }

        tracing::info!("Daemon shutting down");
        self
    }

    /// Run a single check cycle, logging instead of propagating failures.
    async fn run_cycle(&mut self) {
        let start = Utc::now();

        match self.poster.check_feed().await {
            Ok(report) => {
                let elapsed = Utc::now().signed_duration_since(start);
                tracing::info!(
                    delivered = report.delivered,
                    failed = report.failed,
                    watermark_advanced = report.watermark_advanced,
                    elapsed_secs = elapsed.num_milliseconds() as f64 / 1000.0,
                    "Check complete"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "RSS check failed");
            }
        }
    }
}

/// Resolves on the first SIGINT (or SIGTERM on unix).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to set up SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
