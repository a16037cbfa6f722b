//! New-item detection.
//!
//! Given the entries of one fetch (newest first, as feeds publish them) and
//! the stored watermark, decide which entries still have to be delivered and
//! where the watermark should move afterwards.

use chrono::{DateTime, Duration, Utc};

use crate::domain::FeedEntry;

/// Entries published longer ago than this are never delivered.
pub const MAX_ENTRY_AGE_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// The fetch returned no entries.
    EmptyFeed,
    /// No watermark existed; it is initialized without delivering anything.
    Bootstrap,
    /// Nothing above the watermark survived the age filter.
    NothingNew,
    /// At least one entry must be delivered.
    NewEntries,
}

#[derive(Debug)]
pub struct Selection<'a> {
    pub kind: SelectionKind,
    /// Entries to deliver, oldest first.
    pub deliver: Vec<&'a FeedEntry>,
    /// Watermark after this check. Equal to the input when it does not move.
    pub watermark: Option<String>,
}

impl Selection<'_> {
    fn unchanged(kind: SelectionKind, watermark: Option<&str>) -> Self {
        Self {
            kind,
            deliver: Vec::new(),
            watermark: watermark.map(String::from),
        }
    }
}

/// Select the entries published since `watermark`.
///
/// Scanning stops at the entry whose identifier equals the watermark. Entries
/// with a publish date older than [`MAX_ENTRY_AGE_HOURS`] are skipped without
/// ending the scan; entries without a date are never considered old.
pub fn select_new_entries<'a>(
    entries: &'a [FeedEntry],
    watermark: Option<&str>,
    now: DateTime<Utc>,
) -> Selection<'a> {
    let Some(newest) = entries.first() else {
        return Selection::unchanged(SelectionKind::EmptyFeed, watermark);
    };
    let latest_id = newest.identifier(now);

    let Some(watermark) = watermark else {
        return Selection {
            kind: SelectionKind::Bootstrap,
            deliver: Vec::new(),
            watermark: Some(latest_id),
        };
    };

    let cutoff = now - Duration::hours(MAX_ENTRY_AGE_HOURS);
    let mut candidates: Vec<&FeedEntry> = Vec::new();

    for entry in entries {
        if entry.identifier(now) == watermark {
            break;
        }
        if entry.published.is_some_and(|published| published < cutoff) {
            continue;
        }
        candidates.push(entry);
    }

    if candidates.is_empty() {
        return Selection::unchanged(SelectionKind::NothingNew, Some(watermark));
    }

    // Feed order is newest first; deliver in reading order. The sort is
    // stable, so undated entries and ties keep their reversed feed order.
    candidates.reverse();
    candidates.sort_by_key(|entry| entry.published);

    Selection {
        kind: SelectionKind::NewEntries,
        deliver: candidates,
        watermark: Some(latest_id),
    }
}
