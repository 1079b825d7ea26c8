//! Database connection and track table initialization
//!
//! One connection per run: the scanner is single-threaded and writes records
//! strictly in traversal order.

use super::{insert_track_sql, TableName, TrackRow};
use crate::Result;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::{debug, info};

/// Open (or create) a SQLite database file
pub async fn connect_sqlite(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Not a URL: `?` and `%` in the file name are ordinary characters
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);
    debug!("Connecting to database: {}", db_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    Ok(pool)
}

/// Connect to a MySQL server; the password is optional
pub async fn connect_mysql(
    host: &str,
    user: &str,
    password: Option<&str>,
    database: &str,
) -> Result<MySqlPool> {
    let mut options = MySqlConnectOptions::new()
        .host(host)
        .username(user)
        .database(database);
    if let Some(password) = password {
        options = options.password(password);
    }

    let pool = MySqlPoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    info!("Connected to MySQL database {} on {}", database, host);

    Ok(pool)
}

/// Create the track table in SQLite if it doesn't exist
pub async fn create_track_table_sqlite(pool: &SqlitePool, table: &TableName) -> Result<()> {
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id INTEGER PRIMARY KEY,
            artist VARCHAR(35),
            title VARCHAR(35),
            album VARCHAR(35),
            year VARCHAR(5),
            filename TEXT,
            path TEXT,
            size INTEGER
        )
        "#,
        table
    );

    sqlx::query(&sql).execute(pool).await?;
    info!("Track table ready: {}", table);

    Ok(())
}

/// Create the track table in MySQL if it doesn't exist
pub async fn create_track_table_mysql(pool: &MySqlPool, table: &TableName) -> Result<()> {
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
            artist VARCHAR(35) NULL,
            title VARCHAR(35) NULL,
            album VARCHAR(35) NULL,
            year VARCHAR(5) NULL,
            filename TEXT NULL,
            path TEXT NULL,
            size BIGINT NULL
        )
        "#,
        table
    );

    sqlx::query(&sql).execute(pool).await?;
    info!("Track table ready: {}", table);

    Ok(())
}

/// Insert one track row into SQLite
pub async fn insert_track_sqlite(
    pool: &SqlitePool,
    table: &TableName,
    row: &TrackRow<'_>,
) -> Result<()> {
    let sql = insert_track_sql(table);

    sqlx::query(&sql)
        .bind(row.artist)
        .bind(row.title)
        .bind(row.album)
        .bind(row.year)
        .bind(row.filename)
        .bind(row.path)
        .bind(row.size)
        .execute(pool)
        .await?;

    Ok(())
}

/// Insert one track row into MySQL
pub async fn insert_track_mysql(
    pool: &MySqlPool,
    table: &TableName,
    row: &TrackRow<'_>,
) -> Result<()> {
    let sql = insert_track_sql(table);

    sqlx::query(&sql)
        .bind(row.artist)
        .bind(row.title)
        .bind(row.album)
        .bind(row.year)
        .bind(row.filename)
        .bind(row.path)
        .bind(row.size)
        .execute(pool)
        .await?;

    Ok(())
}
