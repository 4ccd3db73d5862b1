//! SQLite-backed relationship store: feeds, the links between them, the
//! entities their posts mention, and dated snapshots of mention counts.
//!
//! Every write is a single statement. Duplicate facts are absorbed by
//! `INSERT OR IGNORE` against the table's uniqueness key, so re-processing
//! the same post never fails and never double counts.

use std::path::Path;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{debug, info};

use crate::error::{Result, RssGraphError};

mod feeds;
mod links;
mod mentions;
mod schema;
mod snapshots;
pub mod types;
pub mod velocity;

pub use types::{
    FeedNode, LinkEdge, LinkFact, Mention, MentionFact, MentionSnapshot, RankedFeed,
    RankedMention, RisingMention, RisingStatus,
};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

type SqliteAsyncConn = SyncConnectionWrapper<SqliteConnection>;
type SqlitePool = Pool<SqliteAsyncConn>;
type SqlitePooledConn<'a> = PooledConnection<'a, SqliteAsyncConn>;

/// One writer at a time keeps SQLite from reporting `SQLITE_BUSY` on the
/// uniqueness-guarded inserts. Concurrent callers queue on the pool.
const POOL_SIZE: u32 = 1;

pub struct GraphStore {
    pool: SqlitePool,
}

impl GraphStore {
    /// Opens (creating if needed) the database at `sqlite_path` and applies
    /// pending migrations.
    pub async fn new(sqlite_path: impl AsRef<str>) -> Result<Self> {
        let sqlite_path = sqlite_path.as_ref();
        ensure_parent_dir(sqlite_path)?;
        run_migrations(sqlite_path).await?;

        let manager = AsyncDieselConnectionManager::<SqliteAsyncConn>::new(sqlite_path);
        let pool: SqlitePool = Pool::builder()
            .max_size(POOL_SIZE)
            .build(manager)
            .await
            .map_err(|e| RssGraphError::Database(e.to_string()))?;
        info!(path = sqlite_path, "opened graph store");
        Ok(Self { pool })
    }

    async fn conn(&self) -> Result<SqlitePooledConn<'_>> {
        self.pool
            .get()
            .await
            .map_err(|e| RssGraphError::Database(e.to_string()))
    }
}

fn ensure_parent_dir(path: &str) -> Result<()> {
    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| RssGraphError::Database(e.to_string()))?;
    }
    Ok(())
}

async fn run_migrations(database_url: &str) -> Result<()> {
    let database_url = database_url.to_string();
    tokio::task::spawn_blocking(move || {
        let mut conn = SqliteConnection::establish(&database_url)
            .map_err(|e| RssGraphError::Database(e.to_string()))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| RssGraphError::Database(e.to_string()))?;
        debug!(count = applied.len(), "applied graph migrations");
        Ok::<_, RssGraphError>(())
    })
    .await
    .map_err(|e| RssGraphError::Runtime(e.to_string()))??;
    Ok(())
}
