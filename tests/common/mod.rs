#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use rss_graph::error::{Result, RssGraphError};
use rss_graph::graph::{GraphStore, LinkFact, MentionFact};
use rss_graph::interfaces::facts::FactSink;

/// Fresh store in its own temp directory. Keep the `TempDir` alive for the
/// duration of the test.
pub async fn temp_store() -> (TempDir, GraphStore) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("graph.db");
    let store = GraphStore::new(db_path.to_str().unwrap()).await.unwrap();
    (dir, store)
}

pub fn link(source_id: i32, target_id: i32, post_url: &str) -> LinkFact {
    LinkFact {
        source_id,
        target_id,
        context: format!("{source_id}->{target_id}"),
        post_url: post_url.to_string(),
        post_title: "Post".to_string(),
    }
}

pub fn mention(source_id: i32, name: &str, entity_type: &str, post_url: &str) -> MentionFact {
    MentionFact {
        source_id,
        name: name.to_string(),
        entity_type: entity_type.to_string(),
        context: String::new(),
        post_url: post_url.to_string(),
        post_title: "Post".to_string(),
    }
}

/// Adds `count` distinct mentions of `name` from `source_id`, one per post.
pub async fn mention_times(store: &GraphStore, source_id: i32, name: &str, count: usize, tag: &str) {
    for i in 0..count {
        let post = format!("https://posts.example/{tag}/{name}/{i}");
        store
            .add_mention(&mention(source_id, name, "PERSON", &post))
            .await
            .unwrap();
    }
}

/// Wraps a real store and fails selected operations.
pub struct FlakySink {
    pub inner: GraphStore,
    pub fail_feed_url: Option<String>,
    pub fail_link_post: Option<String>,
    pub fail_mention_name: Option<String>,
    pub calls: AtomicUsize,
}

impl FlakySink {
    pub fn new(inner: GraphStore) -> Self {
        Self {
            inner,
            fail_feed_url: None,
            fail_link_post: None,
            fail_mention_name: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl FactSink for FlakySink {
    async fn add_feed(&self, url: &str, title: &str) -> Result<i32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_feed_url.as_deref() == Some(url) {
            return Err(RssGraphError::Database("disk I/O error".to_string()));
        }
        self.inner.add_feed(url, title).await
    }

    async fn add_link(&self, link: &LinkFact) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_link_post.as_deref() == Some(link.post_url.as_str()) {
            return Err(RssGraphError::Database("constraint failed".to_string()));
        }
        self.inner.add_link(link).await
    }

    async fn add_mention(&self, mention: &MentionFact) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mention_name.as_deref() == Some(mention.name.as_str()) {
            return Err(RssGraphError::Database("database is locked".to_string()));
        }
        self.inner.add_mention(mention).await
    }
}
