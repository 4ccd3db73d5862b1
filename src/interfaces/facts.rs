use async_trait::async_trait;

use crate::error::Result;
use crate::graph::{GraphStore, LinkFact, MentionFact};

/// Where extracted facts are written. Ingestion talks to this rather than to
/// the store directly.
#[async_trait]
pub trait FactSink: Send + Sync {
    async fn add_feed(&self, url: &str, title: &str) -> Result<i32>;
    async fn add_link(&self, link: &LinkFact) -> Result<bool>;
    async fn add_mention(&self, mention: &MentionFact) -> Result<bool>;
}

#[async_trait]
impl FactSink for GraphStore {
    async fn add_feed(&self, url: &str, title: &str) -> Result<i32> {
        GraphStore::add_feed(self, url, title).await
    }

    async fn add_link(&self, link: &LinkFact) -> Result<bool> {
        GraphStore::add_link(self, link).await
    }

    async fn add_mention(&self, mention: &MentionFact) -> Result<bool> {
        GraphStore::add_mention(self, mention).await
    }
}
