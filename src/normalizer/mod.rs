use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::Utc;
use feed_rs::model::{Entry, FeedType, Link, MediaContent};
use feed_rs::parser;
use html_escape::decode_html_entities;
use regex::Regex;
use url::Url;

use crate::app::{CourierError, Result};
use crate::domain::{FeedEntry, Media};

const ENCLOSURE_REL: &str = "enclosure";

static ENCLOSURE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<enclosure\b[^>]*?\burl\s*=\s*["']([^"']+)["']"#)
        .expect("enclosure regex is valid")
});

/// Turns raw RSS 0.9x/1.0/2.0, Atom or JSON Feed bytes into [`FeedEntry`]s,
/// keeping the feed's own order (newest first by convention).
#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, body: &[u8]) -> Result<Vec<FeedEntry>> {
        // Entries without an id stay without one so the link can stand in.
        let feed = parser::Builder::new()
            .id_generator(|_, _, _| String::new())
            .build()
            .parse(body)
            .map_err(|e| CourierError::FeedParse(e.to_string()))?;
        let uses_guid = matches!(
            feed.feed_type,
            FeedType::RSS0 | FeedType::RSS1 | FeedType::RSS2
        );
        let enclosures = if uses_guid {
            rss_enclosure_urls(body)
        } else {
            HashSet::new()
        };

        Ok(feed
            .entries
            .into_iter()
            .map(|entry| Self::convert(entry, uses_guid, &enclosures))
            .collect())
    }

    fn convert(entry: Entry, uses_guid: bool, enclosures: &HashSet<Url>) -> FeedEntry {
        let entry_id = Some(entry.id).filter(|id| !id.is_empty());
        let (guid, id) = if uses_guid {
            (entry_id, None)
        } else {
            (None, entry_id)
        };

        let link = entry
            .links
            .iter()
            .find(|l| !is_enclosure(l))
            .map(|l| l.href.clone());

        // feed-rs folds RSS <enclosure> into the media objects; split it back out.
        let (from_enclosure, from_media): (Vec<&MediaContent>, Vec<&MediaContent>) = entry
            .media
            .iter()
            .flat_map(|object| object.content.iter())
            .partition(|content| {
                content
                    .url
                    .as_ref()
                    .is_some_and(|url| enclosures.contains(url))
            });

        let media = from_media.into_iter().map(media_from_content).collect();

        let enclosure = entry
            .links
            .iter()
            .find(|l| is_enclosure(l))
            .map(|l| Media {
                url: Some(l.href.clone()),
                mime_type: l.media_type.clone(),
            })
            .or_else(|| from_enclosure.into_iter().next().map(media_from_content));

        FeedEntry {
            guid,
            id,
            title: entry
                .title
                .map(|t| decode_html_entities(&t.content).to_string()),
            link,
            published: entry
                .published
                .or(entry.updated)
                .map(|dt| dt.with_timezone(&Utc)),
            media,
            enclosure,
            content: entry.content.and_then(|c| c.body),
            summary: entry.summary.map(|s| s.content),
        }
    }
}

fn is_enclosure(link: &Link) -> bool {
    link.rel.as_deref() == Some(ENCLOSURE_REL)
}

fn media_from_content(content: &MediaContent) -> Media {
    Media {
        url: content.url.as_ref().map(|u| u.to_string()),
        mime_type: content.content_type.as_ref().map(|m| m.to_string()),
    }
}

/// URLs of every RSS `<enclosure>` element in the document.
fn rss_enclosure_urls(body: &[u8]) -> HashSet<Url> {
    let text = String::from_utf8_lossy(body);
    ENCLOSURE_URL
        .captures_iter(&text)
        .filter_map(|c| Url::parse(&decode_html_entities(c.get(1)?.as_str())).ok())
        .collect()
}
