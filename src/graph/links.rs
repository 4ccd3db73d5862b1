use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};
use diesel_async::RunQueryDsl;
use tracing::debug;

use super::schema::links;
use super::types::{FeedNode, LinkEdge, LinkFact, RankedFeed};
use super::GraphStore;
use crate::dates::{cutoff_ts, now_ts};
use crate::error::{Result, RssGraphError};

#[derive(Queryable)]
struct LinkRow {
    id: i32,
    source_id: i32,
    target_id: i32,
    context: String,
    post_url: String,
    post_title: String,
    discovered_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = links)]
struct NewLink<'a> {
    source_id: i32,
    target_id: i32,
    context: &'a str,
    post_url: &'a str,
    post_title: &'a str,
    discovered_at: i64,
}

#[derive(QueryableByName)]
struct RankedFeedRow {
    #[diesel(sql_type = Integer)]
    id: i32,
    #[diesel(sql_type = Text)]
    url: String,
    #[diesel(sql_type = Text)]
    title: String,
    #[diesel(sql_type = BigInt)]
    created_at: i64,
    #[diesel(sql_type = BigInt)]
    link_count: i64,
}

impl GraphStore {
    /// Records that a post on `source_id` cites `target_id`. Returns `false`
    /// when the `(source, target, post_url)` edge already existed.
    pub async fn add_link(&self, link: &LinkFact) -> Result<bool> {
        let mut conn = self.conn().await?;
        let inserted = diesel::insert_or_ignore_into(links::table)
            .values(&NewLink {
                source_id: link.source_id,
                target_id: link.target_id,
                context: &link.context,
                post_url: &link.post_url,
                post_title: &link.post_title,
                discovered_at: now_ts(),
            })
            .execute(&mut conn)
            .await
            .map_err(|e| RssGraphError::Database(e.to_string()))?;
        if inserted == 0 {
            debug!(
                source = link.source_id,
                target = link.target_id,
                post_url = %link.post_url,
                "link already recorded"
            );
        }
        Ok(inserted > 0)
    }

    pub async fn get_outbound_links(&self, feed_id: i32) -> Result<Vec<LinkEdge>> {
        let mut conn = self.conn().await?;
        let rows: Vec<LinkRow> = links::table
            .filter(links::source_id.eq(feed_id))
            .order(links::id.asc())
            .load(&mut conn)
            .await
            .map_err(|e| RssGraphError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(map_row).collect())
    }

    pub async fn get_inbound_links(&self, feed_id: i32) -> Result<Vec<LinkEdge>> {
        let mut conn = self.conn().await?;
        let rows: Vec<LinkRow> = links::table
            .filter(links::target_id.eq(feed_id))
            .order(links::id.asc())
            .load(&mut conn)
            .await
            .map_err(|e| RssGraphError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(map_row).collect())
    }

    /// Feeds ranked by inbound link count, highest first. Feeds nobody links
    /// to are left out; equal counts are ordered by feed id.
    pub async fn get_most_linked(&self, limit: usize) -> Result<Vec<RankedFeed>> {
        let mut conn = self.conn().await?;
        let rows: Vec<RankedFeedRow> = diesel::sql_query(
            "SELECT f.id AS id, f.url AS url, f.title AS title, f.created_at AS created_at,
                    COUNT(l.id) AS link_count
             FROM feeds f
             JOIN links l ON f.id = l.target_id
             GROUP BY f.id
             ORDER BY link_count DESC, f.id ASC
             LIMIT ?1",
        )
        .bind::<BigInt, _>(limit as i64)
        .load(&mut conn)
        .await
        .map_err(|e| RssGraphError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(map_ranked).collect())
    }

    /// Feeds registered within the last `days` days, newest first, each with
    /// its total inbound link count.
    pub async fn get_new_feeds(&self, days: u32, limit: usize) -> Result<Vec<RankedFeed>> {
        let cutoff = cutoff_ts(now_ts(), days);
        let mut conn = self.conn().await?;
        let rows: Vec<RankedFeedRow> = diesel::sql_query(
            "SELECT f.id AS id, f.url AS url, f.title AS title, f.created_at AS created_at,
                    COUNT(l.id) AS link_count
             FROM feeds f
             LEFT JOIN links l ON f.id = l.target_id
             WHERE f.created_at >= ?1
             GROUP BY f.id
             ORDER BY f.created_at DESC, f.id DESC
             LIMIT ?2",
        )
        .bind::<BigInt, _>(cutoff)
        .bind::<BigInt, _>(limit as i64)
        .load(&mut conn)
        .await
        .map_err(|e| RssGraphError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(map_ranked).collect())
    }
}

fn map_row(row: LinkRow) -> LinkEdge {
    LinkEdge {
        id: row.id,
        source_id: row.source_id,
        target_id: row.target_id,
        context: row.context,
        post_url: row.post_url,
        post_title: row.post_title,
        discovered_at: row.discovered_at,
    }
}

fn map_ranked(row: RankedFeedRow) -> RankedFeed {
    RankedFeed {
        feed: FeedNode {
            id: row.id,
            url: row.url,
            title: row.title,
            created_at: row.created_at,
        },
        inbound_count: row.link_count,
    }
}
