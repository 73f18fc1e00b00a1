//! SQLite database manager.
//!
//! ## Migrations
//!
//! Migrations live in `migrations/NNN_description.sql` and are listed in
//! `MIGRATIONS`. Each one runs exactly once, inside a transaction, and is
//! recorded in `schema_migrations`.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, error, info};

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial",
    sql: include_str!("migrations/001_initial.sql"),
}];

/// SQLite database wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database file and apply pending migrations.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {:?}", path))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        debug!("Opened database at {:?}", path);
        Self::init(conn)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        debug!("Opened in-memory database");
        Self::init(conn)
    }

    /// Open an in-memory database without running migrations.
    ///
    /// Models a message source that exists but has no inbox.
    pub fn open_unmigrated() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    fn init(conn: Connection) -> Result<Self> {
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL
            )",
        )?;

        let current = self.schema_version();
        let pending = MIGRATIONS.iter().filter(|m| m.version > current);

        for migration in pending {
            info!(
                "Running migration {} ({})...",
                migration.version, migration.name
            );

            let tx = self.conn.unchecked_transaction()?;
            if let Err(e) = self.conn.execute_batch(migration.sql) {
                error!(
                    "Migration {} ({}) failed: {}",
                    migration.version, migration.name, e
                );
                return Err(e).with_context(|| {
                    format!(
                        "Failed to run migration {} ({})",
                        migration.version, migration.name
                    )
                });
            }
            self.conn.execute(
                "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, datetime('now'))",
                rusqlite::params![migration.version, migration.name],
            )?;
            tx.commit()?;
        }

        debug!("Database schema at version {}", self.schema_version());
        Ok(())
    }

    /// Highest applied migration, 0 if none.
    pub fn schema_version(&self) -> i64 {
        self.conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0)
    }

    /// Get a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
