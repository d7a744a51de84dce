//! Database access layer for carcass-server
//!
//! All connections are read-only: records are written by the external
//! ingestion pipeline, never by this service.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

mod carcass;
pub use carcass::{get_carcass, list_carcasses, CARCASS_TABLE};

/// Connect to the record store in read-only mode
///
/// Fails if the database file does not exist (read-only mode cannot
/// create it).
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        anyhow::bail!(
            "Database not found: {}\nThe carcass_analysis table is populated by the ingestion pipeline; point --database at its output.",
            db_path.display()
        );
    }

    // mode=ro: SQLite refuses every write on this connection
    let db_url = format!("sqlite://{}?mode=ro", db_path.display());
    let options = SqliteConnectOptions::from_str(&db_url)
        .context("Invalid database path")?
        .read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await
        .context("Failed to connect to database in read-only mode")?;

    // Verify read-only by attempting a write (should fail)
    #[cfg(debug_assertions)]
    {
        let write_test = sqlx::query("CREATE TABLE _test_write (id INTEGER)")
            .execute(&pool)
            .await;
        if write_test.is_ok() {
            anyhow::bail!("Database connection is not read-only: {}", db_path.display());
        }
    }

    Ok(pool)
}
