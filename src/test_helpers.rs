//! Fakes shared by the unit tests of the cycle and the scheduler.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::app::{AppContext, CourierError, Result};
use crate::config::{Config, DEFAULT_FEED_URL};
use crate::domain::Watermark;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::publisher::{BotUser, Embed, Publisher};
use crate::store::WatermarkStore;

/// Build an RSS 2.0 document. Items are `(guid, minutes since publication)`,
/// listed newest first.
pub fn rss(items: &[(&str, i64)]) -> Vec<u8> {
    let body: String = items
        .iter()
        .map(|(guid, minutes_ago)| {
            let published = (Utc::now() - Duration::minutes(*minutes_ago)).to_rfc2822();
            format!(
                "<item><title>Title {guid}</title><link>https://example.com/{guid}</link>\
                 <guid>{guid}</guid><pubDate>{published}</pubDate></item>"
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>Test</title>{body}</channel></rss>"#
    )
    .into_bytes()
}

#[derive(Default)]
pub struct FakeFetcher {
    body: Mutex<Option<Vec<u8>>>,
    pub calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn serving(body: Vec<u8>) -> Self {
        Self {
            body: Mutex::new(Some(body)),
            calls: AtomicUsize::new(0),
        }
    }

    /// A fetcher whose requests always fail.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn set_body(&self, body: Vec<u8>) {
        *self.body.lock().unwrap() = Some(body);
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.body
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| CourierError::Other(format!("connection refused: {}", url)))
    }
}

pub struct FakePublisher {
    pub sent: Mutex<Vec<Embed>>,
    pub sent_at: Mutex<Vec<tokio::time::Instant>>,
    pub attempts: AtomicUsize,
    pub channel_available: AtomicBool,
    /// Titles whose delivery fails.
    pub rejected_titles: Vec<String>,
}

impl Default for FakePublisher {
    fn default() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            sent_at: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            channel_available: AtomicBool::new(true),
            rejected_titles: Vec::new(),
        }
    }
}

impl FakePublisher {
    pub fn rejecting(titles: &[&str]) -> Self {
        Self {
            rejected_titles: titles.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn titles(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.title.clone())
            .collect()
    }
}

#[async_trait]
impl Publisher for FakePublisher {
    async fn current_user(&self) -> Result<BotUser> {
        Ok(BotUser {
            id: "1".into(),
            username: "courier".into(),
        })
    }

    async fn ensure_channel(&self) -> Result<()> {
        if self.channel_available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CourierError::ChannelUnavailable("123".into()))
        }
    }

    async fn send(&self, embed: &Embed) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.rejected_titles.contains(&embed.title) {
            return Err(CourierError::Discord {
                status: 400,
                message: "Invalid Form Body".into(),
            });
        }
        self.sent.lock().unwrap().push(embed.clone());
        self.sent_at.lock().unwrap().push(tokio::time::Instant::now());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub current: Mutex<Watermark>,
    pub saves: AtomicUsize,
}

impl MemoryStore {
    pub fn with(watermark: Watermark) -> Self {
        Self {
            current: Mutex::new(watermark),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn last_guid(&self) -> Option<String> {
        self.current.lock().unwrap().last_guid.clone()
    }
}

impl WatermarkStore for MemoryStore {
    fn load(&self) -> Result<Watermark> {
        Ok(self.current.lock().unwrap().clone())
    }

    fn save(&self, watermark: &Watermark) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.current.lock().unwrap() = watermark.clone();
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        bot_token: "test-token".into(),
        channel_id: "123".into(),
        feed_url: DEFAULT_FEED_URL.into(),
        state_file: PathBuf::from("unused.json"),
    }
}

pub fn context(
    fetcher: Arc<FakeFetcher>,
    publisher: Arc<FakePublisher>,
    store: Arc<MemoryStore>,
) -> AppContext {
    AppContext {
        config: test_config(),
        fetcher,
        normalizer: Normalizer::new(),
        publisher,
        store,
    }
}
