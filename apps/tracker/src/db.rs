use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

const CREATE_JOBS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company TEXT NOT NULL,
        job_title TEXT NOT NULL,
        status TEXT NOT NULL,
        application_link TEXT,
        notes TEXT,
        date_applied TEXT NOT NULL,
        location TEXT,
        source TEXT
    )
"#;

/// Creates the SQLite connection pool, creating the database file and its
/// parent directory when they do not exist yet.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    info!("Opening SQLite database at {database_url}");

    let path = database_path(database_url);
    if let Some(parent) = path.as_ref().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL '{database_url}'"))?
        .create_if_missing(true);

    // Every connection to an in-memory database sees its own empty database.
    let mut pool_options = SqlitePoolOptions::new();
    pool_options = if path.is_none() {
        pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(max_connections.max(1))
    };

    let pool = pool_options.connect_with(options).await?;

    info!("SQLite connection pool established");
    Ok(pool)
}

/// Creates the `jobs` table if it is absent. There are no other migrations.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_JOBS_TABLE)
        .execute(pool)
        .await
        .context("Failed to create jobs table")?;
    info!("Schema ready");
    Ok(())
}

/// File path behind a SQLite URL, or `None` for in-memory databases.
fn database_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = rest.split('?').next().unwrap_or_default().trim();
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}

/// In-memory pool with the schema applied.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = create_pool("sqlite::memory:", 1)
        .await
        .expect("in-memory pool");
    init_schema(&pool).await.expect("schema");
    pool
}
