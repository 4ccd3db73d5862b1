use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;
use tracing::{debug, info};

use super::mentions::live_counts;
use super::schema::mention_snapshots;
use super::types::{MentionSnapshot, RisingMention};
use super::{velocity, GraphStore, SqliteAsyncConn};
use crate::error::{Result, RssGraphError};

#[derive(Queryable)]
struct SnapshotRow {
    id: i32,
    name: String,
    entity_type: String,
    mention_count: i64,
    snapshot_date: String,
}

impl GraphStore {
    /// Captures the current per-`(name, entity_type)` mention counts under
    /// `date`, replacing whatever was captured for that date before.
    /// Returns the number of snapshot rows written.
    pub async fn take_snapshot(&self, date: &str) -> Result<usize> {
        let mut conn = self.conn().await?;
        let written = diesel::sql_query(
            "INSERT OR REPLACE INTO mention_snapshots (name, entity_type, mention_count, snapshot_date)
             SELECT name, entity_type, COUNT(*), ?1
             FROM mentions
             GROUP BY name, entity_type",
        )
        .bind::<Text, _>(date)
        .execute(&mut conn)
        .await
        .map_err(|e| RssGraphError::Database(e.to_string()))?;
        info!(date, rows = written, "took mention snapshot");
        Ok(written)
    }

    /// Distinct snapshot dates, most recent first.
    pub async fn get_snapshot_dates(&self) -> Result<Vec<String>> {
        let mut conn = self.conn().await?;
        mention_snapshots::table
            .select(mention_snapshots::snapshot_date)
            .distinct()
            .order(mention_snapshots::snapshot_date.desc())
            .load(&mut conn)
            .await
            .map_err(|e| RssGraphError::Database(e.to_string()))
    }

    /// Snapshot rows of one entity type captured on `date`, by name.
    pub async fn get_snapshot(&self, entity_type: &str, date: &str) -> Result<Vec<MentionSnapshot>> {
        let mut conn = self.conn().await?;
        let rows: Vec<SnapshotRow> = mention_snapshots::table
            .filter(mention_snapshots::entity_type.eq(entity_type))
            .filter(mention_snapshots::snapshot_date.eq(date))
            .order(mention_snapshots::name.asc())
            .load(&mut conn)
            .await
            .map_err(|e| RssGraphError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(map_row).collect())
    }

    /// Deletes snapshot rows dated strictly before `before_date`. Live
    /// mention facts are untouched.
    pub async fn prune_snapshots(&self, before_date: &str) -> Result<usize> {
        let mut conn = self.conn().await?;
        let deleted = diesel::delete(
            mention_snapshots::table.filter(mention_snapshots::snapshot_date.lt(before_date)),
        )
        .execute(&mut conn)
        .await
        .map_err(|e| RssGraphError::Database(e.to_string()))?;
        info!(before_date, rows = deleted, "pruned mention snapshots");
        Ok(deleted)
    }

    /// Names of `entity_type` gaining mentions between `previous_date` and
    /// `current_date`, fastest growth first.
    ///
    /// With no snapshot for `current_date` the live counts stand in for it,
    /// so the ranking is usable before the first snapshot of the day. A
    /// missing `previous_date` snapshot makes every name new.
    pub async fn get_rising_mentions(
        &self,
        entity_type: &str,
        current_date: &str,
        previous_date: &str,
        limit: usize,
    ) -> Result<Vec<RisingMention>> {
        let mut conn = self.conn().await?;

        let mut current = snapshot_counts(&mut conn, entity_type, current_date).await?;
        if current.is_empty() {
            debug!(entity_type, current_date, "no snapshot, using live mention counts");
            current = live_counts(&mut conn, entity_type).await?;
        }
        let previous = snapshot_counts(&mut conn, entity_type, previous_date).await?;

        Ok(velocity::rank_rising(entity_type, &current, &previous, limit))
    }
}

async fn snapshot_counts(
    conn: &mut SqliteAsyncConn,
    entity_type: &str,
    date: &str,
) -> Result<HashMap<String, i64>> {
    let rows: Vec<(String, i64)> = mention_snapshots::table
        .filter(mention_snapshots::entity_type.eq(entity_type))
        .filter(mention_snapshots::snapshot_date.eq(date))
        .select((mention_snapshots::name, mention_snapshots::mention_count))
        .load(conn)
        .await
        .map_err(|e| RssGraphError::Database(e.to_string()))?;
    Ok(rows.into_iter().collect())
}

fn map_row(row: SnapshotRow) -> MentionSnapshot {
    MentionSnapshot {
        id: row.id,
        name: row.name,
        entity_type: row.entity_type,
        mention_count: row.mention_count,
        snapshot_date: row.snapshot_date,
    }
}
