use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use diesel_async::RunQueryDsl;

use super::schema::mentions;
use super::types::{Mention, MentionFact, RankedMention};
use super::{GraphStore, SqliteAsyncConn};
use crate::dates::now_ts;
use crate::error::{Result, RssGraphError};

#[derive(Queryable)]
struct MentionRow {
    id: i32,
    source_id: i32,
    name: String,
    entity_type: String,
    context: String,
    post_url: String,
    post_title: String,
    discovered_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = mentions)]
struct NewMention<'a> {
    source_id: i32,
    name: &'a str,
    entity_type: &'a str,
    context: &'a str,
    post_url: &'a str,
    post_title: &'a str,
    discovered_at: i64,
}

#[derive(QueryableByName)]
struct NameCountRow {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = BigInt)]
    mention_count: i64,
}

impl GraphStore {
    /// Records a named entity seen in a post. Returns `false` when the
    /// `(source, name, post_url)` mention already existed.
    pub async fn add_mention(&self, mention: &MentionFact) -> Result<bool> {
        let mut conn = self.conn().await?;
        let inserted = diesel::insert_or_ignore_into(mentions::table)
            .values(&NewMention {
                source_id: mention.source_id,
                name: &mention.name,
                entity_type: &mention.entity_type,
                context: &mention.context,
                post_url: &mention.post_url,
                post_title: &mention.post_title,
                discovered_at: now_ts(),
            })
            .execute(&mut conn)
            .await
            .map_err(|e| RssGraphError::Database(e.to_string()))?;
        Ok(inserted > 0)
    }

    /// Names of `entity_type` ranked by how many mention facts they have.
    /// Equal counts are ordered by name.
    pub async fn get_most_mentioned(
        &self,
        entity_type: &str,
        limit: usize,
    ) -> Result<Vec<RankedMention>> {
        let mut conn = self.conn().await?;
        let rows: Vec<NameCountRow> = diesel::sql_query(
            "SELECT name, COUNT(*) AS mention_count
             FROM mentions
             WHERE entity_type = ?1
             GROUP BY name
             ORDER BY mention_count DESC, name ASC
             LIMIT ?2",
        )
        .bind::<Text, _>(entity_type)
        .bind::<BigInt, _>(limit as i64)
        .load(&mut conn)
        .await
        .map_err(|e| RssGraphError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| RankedMention {
                name: row.name,
                entity_type: entity_type.to_string(),
                mention_count: row.mention_count,
            })
            .collect())
    }

    pub async fn get_mentions_by_feed(&self, feed_id: i32) -> Result<Vec<Mention>> {
        let mut conn = self.conn().await?;
        let rows: Vec<MentionRow> = mentions::table
            .filter(mentions::source_id.eq(feed_id))
            .order(mentions::id.asc())
            .load(&mut conn)
            .await
            .map_err(|e| RssGraphError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(map_row).collect())
    }
}

/// Live per-name counts for one entity type, computed from the mention
/// facts themselves rather than any snapshot.
pub(super) async fn live_counts(
    conn: &mut SqliteAsyncConn,
    entity_type: &str,
) -> Result<HashMap<String, i64>> {
    let rows: Vec<NameCountRow> = diesel::sql_query(
        "SELECT name, COUNT(*) AS mention_count
         FROM mentions
         WHERE entity_type = ?1
         GROUP BY name",
    )
    .bind::<Text, _>(entity_type)
    .load(conn)
    .await
    .map_err(|e| RssGraphError::Database(e.to_string()))?;
    Ok(rows
        .into_iter()
        .map(|row| (row.name, row.mention_count))
        .collect())
}

fn map_row(row: MentionRow) -> Mention {
    Mention {
        id: row.id,
        source_id: row.source_id,
        name: row.name,
        entity_type: row.entity_type,
        context: row.context,
        post_url: row.post_url,
        post_title: row.post_title,
        discovered_at: row.discovered_at,
    }
}
