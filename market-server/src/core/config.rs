//! Server configuration
//!
//! All settings come from environment variables with sensible defaults:
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | `WORK_DIR` | `/var/lib/farm-market` | Working directory (database, logs) |
//! | `HTTP_PORT` | `3000` | HTTP API port |
//! | `CATALOG_PATH` | (unset) | JSON catalog file; seed data when unset |
//! | `LOG_DIR` | (unset) | Daily-rolling log file directory |
//! | `LOG_LEVEL` | `info` | Log verbosity |
//! | `ENVIRONMENT` | `development` | development \| staging \| production |

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database file
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Optional JSON catalog file; the built-in seed is used when unset
    pub catalog_path: Option<String>,
    /// Optional log file directory
    pub log_dir: Option<String>,
    /// Log verbosity
    pub log_level: String,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/farm-market".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            catalog_path: std::env::var("CATALOG_PATH").ok(),
            log_dir: std::env::var("LOG_DIR").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the fields tests care about
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Path of the redb database file inside the working directory
    pub fn db_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("market.redb")
    }
}
