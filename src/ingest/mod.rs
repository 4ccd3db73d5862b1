//! Best-effort ingestion of already-parsed feeds.
//!
//! Fetching, XML parsing, link scraping and entity extraction happen
//! upstream; this module receives their output and turns it into feed, link
//! and mention facts. A fact that fails to persist is logged and counted,
//! and the batch moves on to the next one.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, RssGraphError};
use crate::graph::{LinkFact, MentionFact};
use crate::interfaces::facts::FactSink;

mod urls;

pub use urls::{is_same_domain, normalize_to_feed_url};

pub const PERSON_ENTITY: &str = "PERSON";

/// An outbound link scraped from an item's content.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExtractedLink {
    pub url: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ParsedItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub links: Vec<ExtractedLink>,
    /// Normalized person names found in the item.
    #[serde(default)]
    pub people: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ParsedFeed {
    #[serde(default)]
    pub title: String,
    pub feed_url: String,
    /// Home page of the feed, used to recognise internal links. Falls back
    /// to `feed_url`.
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub items: Vec<ParsedItem>,
}

impl ParsedFeed {
    fn home_url(&self) -> &str {
        self.site_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(&self.feed_url)
    }
}

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub skip_same_domain: bool,
    pub normalize_targets: bool,
    pub name_blocklist: HashSet<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            skip_same_domain: true,
            normalize_targets: true,
            name_blocklist: HashSet::new(),
        }
    }
}

impl IngestOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            skip_same_domain: config.skip_same_domain(),
            normalize_targets: config.normalize_targets(),
            name_blocklist: config.name_blocklist().into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub feeds: usize,
    pub items: usize,
    pub links: usize,
    pub mentions: usize,
    pub failures: usize,
}

impl IngestReport {
    pub fn merge(&mut self, other: &IngestReport) {
        self.feeds += other.feeds;
        self.items += other.items;
        self.links += other.links;
        self.mentions += other.mentions;
        self.failures += other.failures;
    }
}

/// Ingests one parsed feed. Only a failure to register the source feed
/// itself is returned as an error; every later failure is absorbed into
/// `IngestReport::failures`.
pub async fn ingest_feed(
    sink: &dyn FactSink,
    feed: &ParsedFeed,
    options: &IngestOptions,
) -> Result<IngestReport> {
    let source_id = sink.add_feed(&feed.feed_url, &feed.title).await?;
    let mut report = IngestReport {
        feeds: 1,
        ..IngestReport::default()
    };

    for item in &feed.items {
        report.items += 1;

        for link in &item.links {
            if options.skip_same_domain && is_same_domain(feed.home_url(), &link.url) {
                continue;
            }
            let target_url = if options.normalize_targets {
                normalize_to_feed_url(&link.url)
            } else {
                link.url.clone()
            };

            let target_id = match sink.add_feed(&target_url, &link.text).await {
                Ok(id) => id,
                Err(err) => {
                    warn!(target_url = %target_url, error = %err, "skipping link target");
                    report.failures += 1;
                    continue;
                }
            };

            let fact = LinkFact {
                source_id,
                target_id,
                context: link.text.clone(),
                post_url: item.url.clone(),
                post_title: item.title.clone(),
            };
            match sink.add_link(&fact).await {
                Ok(_) => report.links += 1,
                Err(err) => {
                    warn!(post_url = %item.url, target_url = %target_url, error = %err, "skipping link");
                    report.failures += 1;
                }
            }
        }

        for name in &item.people {
            if options.name_blocklist.contains(name) {
                continue;
            }
            let fact = MentionFact {
                source_id,
                name: name.clone(),
                entity_type: PERSON_ENTITY.to_string(),
                context: String::new(),
                post_url: item.url.clone(),
                post_title: item.title.clone(),
            };
            match sink.add_mention(&fact).await {
                Ok(_) => report.mentions += 1,
                Err(err) => {
                    warn!(post_url = %item.url, name = %name, error = %err, "skipping mention");
                    report.failures += 1;
                }
            }
        }
    }

    info!(
        feed = %feed.feed_url,
        items = report.items,
        links = report.links,
        mentions = report.mentions,
        failures = report.failures,
        "ingested feed"
    );
    Ok(report)
}

/// Ingests every feed in order. A feed whose source cannot be registered
/// counts as one failure and the batch continues.
pub async fn ingest_batch(
    sink: &dyn FactSink,
    feeds: &[ParsedFeed],
    options: &IngestOptions,
) -> IngestReport {
    let mut total = IngestReport::default();
    for feed in feeds {
        match ingest_feed(sink, feed, options).await {
            Ok(report) => total.merge(&report),
            Err(err) => {
                warn!(feed = %feed.feed_url, error = %err, "skipping feed");
                total.failures += 1;
            }
        }
    }
    total
}

/// Accepts either a single feed object or an array of them.
pub fn parse_feeds_json(content: &str) -> Result<Vec<ParsedFeed>> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| RssGraphError::Serialization(e.to_string()))?;
    let feeds = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|feed: ParsedFeed| vec![feed])
    };
    feeds.map_err(|e| RssGraphError::Serialization(e.to_string()))
}
