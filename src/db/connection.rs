// src/db/connection.rs
//
// Database connection management
//
// PRINCIPLES:
// - Explicit connection pooling
// - No hidden connection creation
// - Clear error propagation
// - Thread-safe access: the pool is the only object shared by refresh tasks

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Default database file path
///
/// Path structure: {APP_DATA}/skyfeed/skyfeed.db
pub fn get_database_path() -> AppResult<PathBuf> {
    let app_data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Other("Could not determine app data directory".to_string()))?;

    Ok(app_data_dir.join("skyfeed").join("skyfeed.db"))
}

/// Create the pool described by `config`
pub fn create_connection_pool(config: &DatabaseConfig) -> AppResult<ConnectionPool> {
    let db_path = match &config.path {
        Some(path) => path.clone(),
        None => get_database_path()?,
    };
    create_pool_at(&db_path, config.max_connections)
}

/// Create a pool over the SQLite file at `db_path`
///
/// Pool configuration:
/// - SQLite in WAL mode so readers do not block the refresh writers
/// - Busy timeout set to avoid immediate SQLITE_BUSY between tasks
pub fn create_pool_at(db_path: &Path, max_size: u32) -> AppResult<ConnectionPool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(max_size)
        .connection_timeout(Duration::from_secs(10))
        .build(manager)
        .map_err(|e| AppError::Pool(format!("Failed to create connection pool: {}", e)))?;

    debug!("Opened database pool at {} (max {})", db_path.display(), max_size);
    Ok(pool)
}

/// Get a connection from the pool
///
/// This is a convenience wrapper that provides better error messages.
pub fn get_connection(pool: &ConnectionPool) -> AppResult<PooledConn> {
    pool.get()
        .map_err(|e| AppError::Pool(format!("Failed to get database connection: {}", e)))
}

/// Create a standalone in-memory connection (for testing)
pub fn create_test_connection() -> AppResult<Connection> {
    let conn = Connection::open_in_memory().map_err(AppError::Database)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_database_path_shape() {
        if let Ok(path) = get_database_path() {
            assert!(path.ends_with("skyfeed/skyfeed.db"));
        }
    }

    #[test]
    fn test_pool_creates_parent_dirs_and_enables_wal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("feed.db");

        let pool = create_pool_at(&path, 2).unwrap();
        let conn = get_connection(&pool).unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        assert!(path.exists());
    }

    #[test]
    fn test_pool_from_config() {
        let dir = tempdir().unwrap();
        let config = DatabaseConfig {
            path: Some(dir.path().join("feed.db")),
            max_connections: 3,
            ..DatabaseConfig::default()
        };

        let pool = create_connection_pool(&config).unwrap();
        assert_eq!(pool.max_size(), 3);
    }

    #[test]
    fn test_test_connection() {
        let conn = create_test_connection().unwrap();
        let result: i32 = conn
            .query_row("SELECT 1 + 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(result, 2);
    }
}
