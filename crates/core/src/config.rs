//! Layered application configuration.
//!
//! Values come from built-in defaults, then an optional TOML file under the
//! user's config directory, then `BLOOM_PORTAL_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Directory name used under the platform config/data roots.
pub const APP_DIR: &str = "bloom-portal";
/// Prefix for environment overrides, e.g. `BLOOM_PORTAL_USER_EMAIL`.
pub const ENV_PREFIX: &str = "BLOOM_PORTAL";

const DEFAULT_USER_EMAIL: &str = "customer@bloominsurance.com";
const DEFAULT_POLICY_ID: &str = "life-001";
const DEFAULT_VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
const DEFAULT_BANNER_VERSION: &str = "2026";

const DEFAULT_CONFIG_TOML: &str = r##"# Bloom Insurance portal configuration.
# Every key is optional; environment variables prefixed with BLOOM_PORTAL_
# take precedence over this file.

# user_email = "customer@bloominsurance.com"
# primary_policy_id = "life-001"
# enrollment_video_url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
# start_route = "/"
# banner_version = "2026"
# accent_color = "#8BC53F"
# state_dir = "/path/to/state"
"##;

/// Errors raised while locating or reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be created.
    #[error("failed to write config file {path}: {source}")]
    Io {
        /// Path of the file being written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The layered sources could not be merged or deserialized.
    #[error("invalid configuration: {0}")]
    Parse(#[from] config::ConfigError),
}

/// Resolved settings for a portal session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding persisted shell state (banner dismissals).
    pub state_dir: PathBuf,
    /// Address handed to the contact-preferences dialog.
    pub user_email: String,
    /// Policy opened by the banner's "View Your Policy" action.
    pub primary_policy_id: String,
    /// Video opened externally by the banner's "Watch Video" action.
    pub enrollment_video_url: String,
    /// Route the shell starts on.
    pub start_route: String,
    /// Revision of the enrollment announcement; bumping it re-shows the banner.
    pub banner_version: String,
    /// Optional accent colour override as `#rrggbb`.
    pub accent_color: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            user_email: DEFAULT_USER_EMAIL.to_string(),
            primary_policy_id: DEFAULT_POLICY_ID.to_string(),
            enrollment_video_url: DEFAULT_VIDEO_URL.to_string(),
            start_route: "/".to_string(),
            banner_version: DEFAULT_BANNER_VERSION.to_string(),
            accent_color: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file location and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(config_path())
    }

    /// Load configuration from an explicit file path and the environment.
    ///
    /// A missing file is not an error; defaults fill every absent key.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;
        let loaded: AppConfig = settings.try_deserialize()?;
        Ok(loaded.normalized())
    }

    /// File backing the persisted dismissal store.
    pub fn dismissal_store_path(&self) -> PathBuf {
        self.state_dir.join("dismissals.json")
    }

    fn normalized(mut self) -> Self {
        let route = self.start_route.trim();
        self.start_route = if route.is_empty() {
            "/".to_string()
        } else {
            route.to_string()
        };
        let policy = self.primary_policy_id.trim();
        self.primary_policy_id = if policy.is_empty() {
            DEFAULT_POLICY_ID.to_string()
        } else {
            policy.to_string()
        };
        self.accent_color = self
            .accent_color
            .take()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        self
    }
}

/// Default location of the configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Write a commented default config file when none exists yet.
pub fn ensure_default_config() -> Result<PathBuf, ConfigError> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, DEFAULT_CONFIG_TOML).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "wrote default configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.user_email, DEFAULT_USER_EMAIL);
        assert_eq!(config.primary_policy_id, "life-001");
        assert_eq!(config.start_route, "/");
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "primary_policy_id = \"term-042\"\nstart_route = \"  \"\naccent_color = \"#336699\"\n",
        )?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.primary_policy_id, "term-042");
        assert_eq!(config.start_route, "/");
        assert_eq!(config.accent_color.as_deref(), Some("#336699"));
        assert_eq!(config.banner_version, DEFAULT_BANNER_VERSION);
        Ok(())
    }

    #[test]
    fn blank_policy_id_falls_back_to_default() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "primary_policy_id = \"   \"\n")?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.primary_policy_id, DEFAULT_POLICY_ID);
        Ok(())
    }

    #[test]
    fn default_template_is_valid_toml() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, DEFAULT_CONFIG_TOML)?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config, AppConfig::load_from(dir.path().join("absent.toml"))?);
        assert!(DEFAULT_CONFIG_TOML.contains("# accent_color = \"#8BC53F\""));
        Ok(())
    }

    #[test]
    fn default_file_is_written_once_and_parses() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");
        write_default_config(&path)?;
        assert_eq!(AppConfig::load_from(&path)?.user_email, DEFAULT_USER_EMAIL);
        fs::write(&path, "user_email = \"kept@example.com\"\n")?;
        write_default_config(&path)?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.user_email, "kept@example.com");
        Ok(())
    }

    #[test]
    fn dismissal_store_lives_in_state_dir() {
        let config = AppConfig {
            state_dir: PathBuf::from("/tmp/portal"),
            ..AppConfig::default()
        };
        assert_eq!(
            config.dismissal_store_path(),
            PathBuf::from("/tmp/portal/dismissals.json")
        );
    }
}
