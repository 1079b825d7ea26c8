//! Database Test Utilities
//!
//! The sinks own their runtime, so these helpers do too; call them from
//! plain `#[test]` functions.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::path::Path;

/// Row read back from the track table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoredTrack {
    pub artist: String,
    pub title: String,
    pub album: String,
    pub year: String,
    pub filename: String,
    pub path: String,
    pub size: i64,
}

/// All rows of `table`, ordered by filename
pub fn read_tracks(db_path: &Path, table: &str) -> Vec<StoredTrack> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        let pool = SqlitePool::connect_with(SqliteConnectOptions::new().filename(db_path))
            .await
            .unwrap();
        let query = format!(
            "SELECT artist, title, album, year, filename, path, size FROM {} ORDER BY filename",
            table
        );
        let rows = sqlx::query_as::<_, StoredTrack>(&query)
            .fetch_all(&pool)
            .await
            .unwrap();
        pool.close().await;
        rows
    })
}
