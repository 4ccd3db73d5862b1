use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use super::schema::feeds;
use super::types::FeedNode;
use super::{GraphStore, SqliteAsyncConn};
use crate::dates::now_ts;
use crate::error::{Result, RssGraphError};

#[derive(Queryable)]
struct FeedRow {
    id: i32,
    url: String,
    title: String,
    created_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = feeds)]
struct NewFeed<'a> {
    url: &'a str,
    title: &'a str,
    created_at: i64,
}

impl GraphStore {
    /// Registers `url` and returns its id. A URL that is already known keeps
    /// the title it was first registered with; `title` is ignored for it.
    pub async fn add_feed(&self, url: &str, title: &str) -> Result<i32> {
        let mut conn = self.conn().await?;
        if let Some(existing) = find_by_url(&mut conn, url).await? {
            return Ok(existing.id);
        }

        let inserted = diesel::insert_or_ignore_into(feeds::table)
            .values(&NewFeed {
                url,
                title,
                created_at: now_ts(),
            })
            .execute(&mut conn)
            .await
            .map_err(|e| RssGraphError::Database(e.to_string()))?;

        // Re-read rather than trusting last_insert_rowid: a concurrent insert
        // of the same URL turns ours into a no-op.
        let feed = find_by_url(&mut conn, url)
            .await?
            .ok_or_else(|| RssGraphError::Database(format!("feed vanished after insert: {url}")))?;
        if inserted > 0 {
            debug!(id = feed.id, url, "registered feed");
        }
        Ok(feed.id)
    }

    /// `Ok(None)` when the URL was never registered.
    pub async fn get_feed_by_url(&self, url: &str) -> Result<Option<FeedNode>> {
        let mut conn = self.conn().await?;
        find_by_url(&mut conn, url).await
    }

    pub async fn get_feed(&self, id: i32) -> Result<Option<FeedNode>> {
        let mut conn = self.conn().await?;
        let row: Option<FeedRow> = feeds::table
            .filter(feeds::id.eq(id))
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| RssGraphError::Database(e.to_string()))?;
        Ok(row.map(map_row))
    }

    pub async fn feed_count(&self) -> Result<i64> {
        let mut conn = self.conn().await?;
        feeds::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|e| RssGraphError::Database(e.to_string()))
    }
}

async fn find_by_url(conn: &mut SqliteAsyncConn, url: &str) -> Result<Option<FeedNode>> {
    let row: Option<FeedRow> = feeds::table
        .filter(feeds::url.eq(url))
        .first(conn)
        .await
        .optional()
        .map_err(|e| RssGraphError::Database(e.to_string()))?;
    Ok(row.map(map_row))
}

fn map_row(row: FeedRow) -> FeedNode {
    FeedNode {
        id: row.id,
        url: row.url,
        title: row.title,
        created_at: row.created_at,
    }
}
