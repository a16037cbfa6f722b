//! One check cycle: fetch, select, deliver, persist.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::app::{AppContext, Result};
use crate::config::PACING_DELAY;
use crate::domain::Watermark;
use crate::publisher::Embed;
use crate::selector::{select_new_entries, SelectionKind};

/// Outcome of a completed cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub kind: SelectionKind,
    pub delivered: usize,
    pub failed: usize,
    pub watermark_advanced: bool,
}

pub struct Poster {
    ctx: AppContext,
    watermark: Watermark,
    pacing: Duration,
}

impl Poster {
    pub fn new(ctx: AppContext, watermark: Watermark) -> Self {
        Self {
            ctx,
            watermark,
            pacing: PACING_DELAY,
        }
    }

    /// Build a poster starting from the persisted watermark.
    pub fn load(ctx: AppContext) -> Result<Self> {
        let watermark = ctx.store.load()?;
        Ok(Self::new(ctx, watermark))
    }

    /// Override the pause between two deliveries.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn watermark(&self) -> &Watermark {
        &self.watermark
    }

    pub fn feed_url(&self) -> &str {
        &self.ctx.config.feed_url
    }

    pub async fn check_feed(&mut self) -> Result<CycleReport> {
        self.check_feed_at(Utc::now()).await
    }

    /// Run one cycle as if the current time were `now`.
    ///
    /// Fetch and channel failures abort the cycle before any state changes.
    /// A failed delivery is logged and does not stop the batch.
    pub async fn check_feed_at(&mut self, now: DateTime<Utc>) -> Result<CycleReport> {
        let url = self.ctx.config.feed_url.as_str();
        tracing::info!(url = %url, "Checking RSS feed");

        let body = self.ctx.fetcher.fetch(url).await?;
        let entries = self.ctx.normalizer.normalize(&body)?;
        self.ctx.publisher.ensure_channel().await?;

        let selection = select_new_entries(&entries, self.watermark.last_guid(), now);
        let mut report = CycleReport {
            kind: selection.kind,
            delivered: 0,
            failed: 0,
            watermark_advanced: false,
        };

        match selection.kind {
            SelectionKind::EmptyFeed => {
                tracing::info!("RSS feed has no items, skipping");
            }
            SelectionKind::Bootstrap => {
                tracing::info!(
                    guid = selection.watermark.as_deref().unwrap_or_default(),
                    "First run, initializing watermark without posting"
                );
            }
            SelectionKind::NothingNew => {
                tracing::info!("No new RSS items found");
            }
            SelectionKind::NewEntries => {
                tracing::info!(count = selection.deliver.len(), "Posting new RSS items");

                for (i, entry) in selection.deliver.iter().enumerate() {
                    if i > 0 {
                        tokio::time::sleep(self.pacing).await;
                    }

                    let embed = Embed::from_entry(entry);
                    match self.ctx.publisher.send(&embed).await {
                        Ok(()) => report.delivered += 1,
                        Err(e) => {
                            report.failed += 1;
                            tracing::error!(title = %embed.title, error = %e, "Failed to post item");
                        }
                    }
                }
            }
        }

        if let Some(next) = selection.watermark.as_deref() {
            if self.watermark.differs_from(next) {
                let next = Watermark::new(next);
                self.ctx.store.save(&next)?;
                tracing::debug!(guid = next.last_guid().unwrap_or_default(), "Watermark saved");
                self.watermark = next;
                report.watermark_advanced = true;
            }
        }

        Ok(report)
    }
}
