use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::fetcher::{fetch_feed, FetchOptions};
use super::parser::{parse_feed, FeedEntry};

/// Message returned when the scan collects nothing.
pub const NO_MATCHES_MESSAGE: &str = "no matching entries found.";

/// Outcome of a feed search.
///
/// Serializes as a JSON array that is never empty:
/// - `Matches` → `[{"title", "link", "description"}, ...]`
/// - `NoMatches` → `[{"message": "no matching entries found."}]`
/// - `Failed` → `[{"error": "<message>"}]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    /// Matching entries in document order (never empty)
    Matches(Vec<FeedEntry>),
    /// The feed was read but nothing matched
    NoMatches,
    /// The feed could not be fetched
    Failed(String),
}

impl SearchResult {
    fn from_matches(entries: Vec<FeedEntry>) -> Self {
        if entries.is_empty() {
            Self::NoMatches
        } else {
            Self::Matches(entries)
        }
    }
}

#[derive(serde::Serialize)]
struct MessageRecord<'a> {
    message: &'a str,
}

#[derive(serde::Serialize)]
struct ErrorRecord<'a> {
    error: &'a str,
}

impl Serialize for SearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Matches(entries) => serializer.collect_seq(entries),
            Self::NoMatches => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(&MessageRecord {
                    message: NO_MATCHES_MESSAGE,
                })?;
                seq.end()
            }
            Self::Failed(error) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(&ErrorRecord { error })?;
                seq.end()
            }
        }
    }
}

/// Case-insensitive substring filter over entries, capped at `max_results`.
///
/// An entry matches when the lower-cased query occurs in its lower-cased
/// title or description. The empty query matches everything. Scanning stops
/// as soon as `max_results` entries are collected; a non-positive cap
/// collects nothing.
pub fn filter_entries<I>(entries: I, query: &str, max_results: i64) -> Vec<FeedEntry>
where
    I: IntoIterator<Item = FeedEntry>,
{
    let cap = usize::try_from(max_results).unwrap_or(0);
    let query = query.to_lowercase();
    let mut results = Vec::new();
    if cap == 0 {
        return results;
    }

    for entry in entries {
        if entry.title.to_lowercase().contains(&query)
            || entry.description.to_lowercase().contains(&query)
        {
            results.push(entry);
            if results.len() >= cap {
                break;
            }
        }
    }

    results
}

/// Fetches `feed_url`, parses it best-effort and filters its entries.
///
/// Never fails: fetch errors come back as [`SearchResult::Failed`] and a
/// malformed document is searched with whatever entries could be recovered.
pub async fn search_feed(
    client: &reqwest::Client,
    feed_url: &str,
    query: &str,
    max_results: i64,
    options: &FetchOptions,
) -> SearchResult {
    let bytes = match fetch_feed(client, feed_url, options).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(feed = %feed_url, error = %e, "Error fetching or parsing feed");
            return SearchResult::Failed(e.to_string());
        }
    };

    let parsed = parse_feed(&bytes);
    tracing::info!(
        feed = %feed_url,
        well_formed = parsed.well_formed,
        entries = parsed.entries.len(),
        "Parsed feed"
    );
    if !parsed.well_formed {
        tracing::warn!(feed = %feed_url, "Feed is malformed, searching recovered entries");
    }

    SearchResult::from_matches(filter_entries(parsed.entries, query, max_results))
}
