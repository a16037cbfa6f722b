use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+?src=["']([^"'>]+)["']"#).expect("static regex is valid")
});

/// A media reference attached to an entry (`media:content` or an enclosure).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: Option<String>,
    pub mime_type: Option<String>,
}

impl Media {
    pub fn new(url: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            mime_type: Some(mime_type.into()),
        }
    }

    /// The URL, if this is an image served over http(s).
    fn http_image_url(&self) -> Option<&str> {
        let url = self.url.as_deref()?;
        let is_image = self
            .mime_type
            .as_deref()
            .is_some_and(|t| t.starts_with("image/"));

        (is_image && url.starts_with("http")).then_some(url)
    }
}

/// A single entry of the polled feed. No field is guaranteed to be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedEntry {
    /// RSS `<guid>`.
    pub guid: Option<String>,
    /// Atom / JSON Feed `id`.
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub media: Vec<Media>,
    pub enclosure: Option<Media>,
    pub content: Option<String>,
    pub summary: Option<String>,
}

impl FeedEntry {
    /// Best-effort identifier used as the dedup key.
    ///
    /// Falls back to `guid`, then `id`, then `link`. Entries with none of those
    /// get a synthetic id built from the title and `now`, which is not stable
    /// across checks.
    pub fn identifier(&self, now: DateTime<Utc>) -> String {
        [&self.guid, &self.id, &self.link]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|value| !value.is_empty())
            .map(String::from)
            .unwrap_or_else(|| {
                format!(
                    "NO_GUID_{}_{}",
                    self.title.as_deref().unwrap_or("unknown"),
                    now.timestamp_millis()
                )
            })
    }

    /// Pick an image to show alongside the entry.
    ///
    /// Structured media wins over the enclosure, which wins over the first
    /// `<img>` tag found in the content (or summary) markup.
    pub fn image_url(&self) -> Option<&str> {
        if let Some(url) = self.media.iter().find_map(Media::http_image_url) {
            return Some(url);
        }

        if let Some(url) = self.enclosure.as_ref().and_then(Media::http_image_url) {
            return Some(url);
        }

        let html = self
            .content
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.summary.as_deref())?;
        let src = IMG_SRC.captures(html)?.get(1)?.as_str();
        src.starts_with("http").then_some(src)
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("No Title")
    }
}
