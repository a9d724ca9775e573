//! Server configuration
//!
//! Environment-backed defaults, overridable from CLI flags in the binary.
//! The API and the asset server bind separately; the asset server only
//! ever serves the uploads directory.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{CoreError, Result};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the JSON API binds to (default: 127.0.0.1:5000)
    pub bind_addr: SocketAddr,

    /// Address the static asset server binds to (default: 127.0.0.1:5001)
    pub asset_addr: SocketAddr,

    /// SQLite connection string
    pub database_url: String,

    /// Directory uploaded images are stored in
    pub uploads_dir: PathBuf,

    /// Directory of static HTML pages rendered by name
    pub pages_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            asset_addr: SocketAddr::from(([127, 0, 0, 1], 5001)),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://patternbook.db".to_string()),
            uploads_dir: PathBuf::from("uploads"),
            pages_dir: PathBuf::from("pages"),
        }
    }
}

impl ServerConfig {
    /// Build a config from the environment.
    ///
    /// Recognized variables: `DATABASE_URL`, `PATTERNBOOK_BIND`,
    /// `PATTERNBOOK_ASSET_BIND`, `PATTERNBOOK_UPLOADS_DIR`,
    /// `PATTERNBOOK_PAGES_DIR`. Unset variables fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(bind) = env::var("PATTERNBOOK_BIND") {
            config.bind_addr = bind
                .parse()
                .map_err(|_| CoreError::config(format!("invalid PATTERNBOOK_BIND '{bind}'")))?;
        }
        if let Ok(bind) = env::var("PATTERNBOOK_ASSET_BIND") {
            config.asset_addr = bind.parse().map_err(|_| {
                CoreError::config(format!("invalid PATTERNBOOK_ASSET_BIND '{bind}'"))
            })?;
        }
        if let Ok(dir) = env::var("PATTERNBOOK_UPLOADS_DIR") {
            config.uploads_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("PATTERNBOOK_PAGES_DIR") {
            config.pages_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.asset_addr.port(), 5001);
        assert_eq!(config.uploads_dir, PathBuf::from("uploads"));
    }
}
