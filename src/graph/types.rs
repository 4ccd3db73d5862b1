use serde::Serialize;

/// A registered content source, identified by its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedNode {
    pub id: i32,
    pub url: String,
    pub title: String,
    pub created_at: i64,
}

impl FeedNode {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "(untitled)"
        } else {
            &self.title
        }
    }
}

/// "A post on `source_id` cites `target_id`."
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEdge {
    pub id: i32,
    pub source_id: i32,
    pub target_id: i32,
    pub context: String,
    pub post_url: String,
    pub post_title: String,
    pub discovered_at: i64,
}

/// Link fact as handed over by an ingestion caller. Both endpoints must
/// already be registered feeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFact {
    pub source_id: i32,
    pub target_id: i32,
    pub context: String,
    pub post_url: String,
    pub post_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mention {
    pub id: i32,
    pub source_id: i32,
    pub name: String,
    pub entity_type: String,
    pub context: String,
    pub post_url: String,
    pub post_title: String,
    pub discovered_at: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionFact {
    pub source_id: i32,
    pub name: String,
    pub entity_type: String,
    pub context: String,
    pub post_url: String,
    pub post_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedFeed {
    pub feed: FeedNode,
    pub inbound_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedMention {
    pub name: String,
    pub entity_type: String,
    pub mention_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MentionSnapshot {
    pub id: i32,
    pub name: String,
    pub entity_type: String,
    pub mention_count: i64,
    pub snapshot_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RisingStatus {
    Hot,
    Rising,
    New,
}

impl RisingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RisingStatus::Hot => "hot",
            RisingStatus::Rising => "rising",
            RisingStatus::New => "new",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RisingMention {
    pub name: String,
    pub entity_type: String,
    pub current_count: i64,
    pub previous_count: i64,
    /// `(current - previous) / previous`, or the raw current count when
    /// there is no previous count.
    pub velocity: f64,
    pub status: RisingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untitled_feeds_get_a_placeholder() {
        let mut feed = FeedNode {
            id: 1,
            url: "https://a.example/".to_string(),
            title: String::new(),
            created_at: 0,
        };
        assert_eq!(feed.display_title(), "(untitled)");
        feed.title = "A".to_string();
        assert_eq!(feed.display_title(), "A");
        assert_eq!(RisingStatus::Hot.as_str(), "hot");
    }
}
