use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, RssGraphError};

/// Domains too ubiquitous to be interesting in a "most linked" ranking.
pub const DEFAULT_COMMON_DOMAINS: &[&str] = &[
    "github.com",
    "twitter.com",
    "x.com",
    "youtube.com",
    "linkedin.com",
    "huggingface.co",
    "news.ycombinator.com",
    "arxiv.org",
    "nytimes.com",
    "openai.com",
    "anthropic.com",
    "google.com",
    "medium.com",
    "substack.com",
    "podcasts.apple.com",
    "scholar.google.com",
    "en.wikipedia.org",
    "reddit.com",
    "facebook.com",
];

pub const DEFAULT_ENTITY_TYPE: &str = "PERSON";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RankConfig {
    pub limit: Option<usize>,
    pub new_days: Option<u32>,
    pub common_domains: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MentionsConfig {
    pub limit: Option<usize>,
    pub entity_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SnapshotConfig {
    pub retention_days: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IngestConfig {
    pub skip_same_domain: Option<bool>,
    pub normalize_targets: Option<bool>,
    pub name_blocklist: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub db_path: Option<String>,
    pub rank: Option<RankConfig>,
    pub mentions: Option<MentionsConfig>,
    pub snapshots: Option<SnapshotConfig>,
    pub ingest: Option<IngestConfig>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| RssGraphError::Config(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| RssGraphError::Config(e.to_string()))?;
        Ok(config)
    }

    pub fn db_path(&self) -> String {
        self.db_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(str::to_string)
            .unwrap_or_else(default_db_path)
    }

    pub fn rank_limit(&self) -> usize {
        self.rank.as_ref().and_then(|r| r.limit).unwrap_or(20)
    }

    pub fn new_feed_days(&self) -> u32 {
        self.rank.as_ref().and_then(|r| r.new_days).unwrap_or(30)
    }

    pub fn common_domains(&self) -> Vec<String> {
        match self.rank.as_ref().and_then(|r| r.common_domains.clone()) {
            Some(domains) => domains,
            None => DEFAULT_COMMON_DOMAINS.iter().map(|d| d.to_string()).collect(),
        }
    }

    pub fn mentions_limit(&self) -> usize {
        self.mentions.as_ref().and_then(|m| m.limit).unwrap_or(30)
    }

    pub fn entity_type(&self) -> String {
        self.mentions
            .as_ref()
            .and_then(|m| m.entity_type.clone())
            .unwrap_or_else(|| DEFAULT_ENTITY_TYPE.to_string())
    }

    pub fn retention_days(&self) -> u32 {
        self.snapshots
            .as_ref()
            .and_then(|s| s.retention_days)
            .unwrap_or(90)
    }

    pub fn skip_same_domain(&self) -> bool {
        self.ingest
            .as_ref()
            .and_then(|i| i.skip_same_domain)
            .unwrap_or(true)
    }

    pub fn normalize_targets(&self) -> bool {
        self.ingest
            .as_ref()
            .and_then(|i| i.normalize_targets)
            .unwrap_or(true)
    }

    pub fn name_blocklist(&self) -> Vec<String> {
        self.ingest
            .as_ref()
            .and_then(|i| i.name_blocklist.clone())
            .unwrap_or_default()
    }
}

pub fn default_db_path() -> String {
    match std::env::var("HOME") {
        Ok(home) if !home.trim().is_empty() => Path::new(home.trim())
            .join(".rss-graph")
            .join("graph.db")
            .to_string_lossy()
            .into_owned(),
        _ => "./data/rss-graph.db".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_resolves_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.rank_limit(), 20);
        assert_eq!(config.new_feed_days(), 30);
        assert_eq!(config.mentions_limit(), 30);
        assert_eq!(config.entity_type(), "PERSON");
        assert_eq!(config.retention_days(), 90);
        assert!(config.skip_same_domain());
        assert!(config.normalize_targets());
        assert!(config.name_blocklist().is_empty());
        assert!(config.common_domains().iter().any(|d| d == "github.com"));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "db_path": "/tmp/g.db",
                "rank": {"limit": 5, "common_domains": ["example.org"]},
                "snapshots": {"retention_days": 7},
                "ingest": {"skip_same_domain": false, "name_blocklist": ["Will Smith"]}
            }"#,
        )
        .unwrap();
        assert_eq!(config.db_path(), "/tmp/g.db");
        assert_eq!(config.rank_limit(), 5);
        assert_eq!(config.common_domains(), vec!["example.org".to_string()]);
        assert_eq!(config.retention_days(), 7);
        assert!(!config.skip_same_domain());
        assert_eq!(config.name_blocklist(), vec!["Will Smith".to_string()]);
    }

    #[test]
    fn blank_db_path_falls_back() {
        let config = Config {
            db_path: Some("   ".to_string()),
            ..Config::default()
        };
        assert!(config.db_path().ends_with(".db"));
        assert_ne!(config.db_path().trim(), "");
    }
}
