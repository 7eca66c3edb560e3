//! # Configuration Module
//!
//! Data directory setup and runtime settings for Moodmix.
//!
//! ## Data Storage
//!
//! Saved mixes live in a SQLite file under the platform data directory:
//! - Linux: `~/.local/share/moodmix/mixes.db`
//! - macOS: `~/Library/Application Support/moodmix/mixes.db`
//! - Windows: `%APPDATA%\moodmix\mixes.db`
//!
//! ## Live Recommendations
//!
//! An access token for the streaming service switches the gateway to live
//! recommendations. It is obtained elsewhere (the OAuth exchange is not part of
//! this crate) and handed in through `--token` or `SPOTIFY_ACCESS_TOKEN`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default Web API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com";

/// Default timeout for the single live request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Returns the platform-appropriate data directory for Moodmix, creating it if needed.
///
/// # Errors
///
/// Fails if the system data directory cannot be determined or the `moodmix`
/// subdirectory cannot be created.
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        )
    })?;

    let moodmix_dir = data_dir.join("moodmix");
    fs::create_dir_all(&moodmix_dir).with_context(|| {
        format!(
            "Failed to create Moodmix data directory at {}. Please check file permissions.",
            moodmix_dir.display()
        )
    })?;

    Ok(moodmix_dir)
}

/// Returns the default path of the mix database.
///
/// # Errors
///
/// Same as [`get_data_dir`].
///
/// # Examples
///
/// ```no_run
/// let db_path = moodmix::config::get_db_path()?;
/// println!("Database location: {}", db_path.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_db_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("mixes.db"))
}

/// Runtime settings, assembled from CLI flags and environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Path to the mix database
    pub db_path: PathBuf,
    /// Bearer token for the live recommendation source
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    /// Web API root
    pub api_base_url: String,
    /// Timeout for one live request
    pub timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::with_db_path(get_db_path().unwrap_or_else(|_| PathBuf::from("mixes.db")))
    }
}

impl RuntimeConfig {
    /// Configuration at the default database location, without a token.
    ///
    /// # Errors
    ///
    /// Same as [`get_db_path`].
    pub fn new() -> Result<Self> {
        Ok(Self::with_db_path(get_db_path()?))
    }

    /// Configuration with an explicit database path and no token.
    #[must_use]
    pub fn with_db_path(db_path: PathBuf) -> Self {
        Self {
            db_path,
            access_token: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the access token. Blank tokens count as none.
    #[must_use]
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_db_path_structure() {
        let path = get_db_path().expect("Should get valid path");

        assert!(path.is_absolute(), "Database path should be absolute");
        assert!(path.to_string_lossy().ends_with("mixes.db"));

        let parent = path.parent().expect("Should have parent directory");
        assert_eq!(parent.file_name().unwrap(), "moodmix");
        assert!(parent.is_dir());
    }

    #[test]
    fn test_get_db_path_consistent_results() {
        let path1 = get_db_path().expect("First call should succeed");
        let path2 = get_db_path().expect("Second call should succeed");

        assert_eq!(path1, path2);
    }

    #[test]
    fn test_blank_token_is_dropped() {
        let config = RuntimeConfig::with_db_path(PathBuf::from("/tmp/test.db"))
            .with_access_token(Some("   ".to_string()));
        assert!(config.access_token.is_none());

        let config = config.with_access_token(Some("abc".to_string()));
        assert_eq!(config.access_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_token_is_never_serialized() {
        let config = RuntimeConfig::with_db_path(PathBuf::from("/tmp/test.db"))
            .with_access_token(Some("secret".to_string()));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains(DEFAULT_API_BASE_URL));
    }
}
