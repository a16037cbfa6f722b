//! # Courier
//!
//! Relays a single RSS/Atom feed into a Discord channel.
//!
//! ## Architecture
//!
//! Every check follows the same pipeline:
//!
//! ```text
//! Fetcher → Normalizer → Selector → Publisher → Store
//! ```
//!
//! - [`fetcher`]: downloads the feed
//! - [`normalizer`]: converts RSS/Atom/JSON Feed documents to [`domain::FeedEntry`]
//! - [`selector`]: decides which entries are new since the last check
//! - [`publisher`]: posts one embed per new entry
//! - [`store`]: persists the watermark (the last handled entry id)
//!
//! [`poster::Poster`] drives one such check and [`daemon::Daemon`] repeats it
//! every 15 minutes.
//!
//! ## Quick Start
//!
//! ```bash
//! export DISCORD_BOT_TOKEN=...
//! export DISCORD_CHANNEL_ID=123456789012345678
//! export RSS_FEED_URL=https://blog.rust-lang.org/feed.xml
//! courier
//! ```
//!
//! The first check only records the newest entry; posting starts with the
//! entries published after it.

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// fetcher, normalizer, publisher, store.
pub mod app;

/// Environment-based configuration and fixed timing constants.
pub mod config;

/// Polling loop with graceful shutdown.
pub mod daemon;

/// Core domain models.
///
/// - [`FeedEntry`](domain::FeedEntry): one entry of the polled feed
/// - [`Watermark`](domain::Watermark): id of the last handled entry
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Feed parsing and normalization.
pub mod normalizer;

/// One fetch-select-deliver-persist cycle.
pub mod poster;

/// Outbound chat delivery.
///
/// - [`Publisher`](publisher::Publisher): Async trait for message delivery
/// - [`DiscordClient`](publisher::DiscordClient): Discord REST implementation
pub mod publisher;

/// New-item detection.
pub mod selector;

/// Watermark persistence.
///
/// - [`WatermarkStore`](store::WatermarkStore): Trait defining storage operations
/// - [`JsonFileStore`](store::JsonFileStore): JSON file implementation
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;
