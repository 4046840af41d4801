//! Application configuration
//!
//! Fixed design constants and the small set of runtime settings
//! read from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

// ===== Trash Retention =====

/// Days a trash entry is kept before the expiry sweep purges it.
pub const TRASH_RETENTION_DAYS: i64 = 30;

// ===== Version History =====

/// Maximum number of versions retained per note. When a new version
/// pushes a note past this ceiling, the oldest versions are pruned.
pub const VERSION_RETENTION_LIMIT: i64 = 50;

/// Title substituted when a note is created with an empty title.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled Note";

// ===== Sweep Schedule =====

/// Cron expression for the periodic expired-trash sweep (hourly).
pub const SWEEP_CRON: &str = "0 0 * * * *";

/// Runtime configuration derived from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Read configuration from the environment, falling back to
    /// local-development defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let db_path = std::env::var("STARFIRE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/starfire.db"));

        let bind_addr = std::env::var("STARFIRE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3001".to_string())
            .parse()?;

        Ok(Self { db_path, bind_addr })
    }
}
