//! Dashboard configuration.
//!
//! Loaded from `region-pulse.json` in the working directory, or from the file
//! named by `REGION_PULSE_CONFIG`. Every field has a default, so a partial file
//! (or none at all) is fine.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_ENV: &str = "REGION_PULSE_CONFIG";
pub const SESSION_ENV: &str = "REGION_PULSE_SESSION";
const DEFAULT_CONFIG_FILE: &str = "region-pulse.json";

/// Set by terminal emulators, one value per window or tab
const TERMINAL_SESSION_ENVS: [&str; 2] = ["TERM_SESSION_ID", "WINDOWID"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: simd_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Current per-region snapshot
    pub snapshot_path: PathBuf,
    /// Per-region daily timeseries
    pub timeseries_path: PathBuf,
    /// Region shown when none is given on the command line
    pub region: String,
    pub refresh_interval_secs: u64,
    pub log_path: PathBuf,
    /// Overrides `REGION_PULSE_SESSION`
    pub session_id: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("data/data.min.json"),
            timeseries_path: PathBuf::from("data/timeseries.min.json"),
            region: "KL".to_string(),
            refresh_interval_secs: 100,
            log_path: PathBuf::from("region-pulse.log"),
            session_id: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut bytes = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        simd_json::serde::from_slice(&mut bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    /// Id scoping session storage to one terminal session.
    ///
    /// Config value first, then `REGION_PULSE_SESSION`, then the terminal's
    /// own session variables, then the launching shell's pid. `None` when no
    /// scope can be found; the caller then keeps session values in memory.
    pub fn session_id(&self) -> Option<String> {
        resolve_session_id(
            self.session_id.as_deref(),
            |name| env::var(name).ok(),
            parent_pid(),
        )
    }
}

fn resolve_session_id(
    configured: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
    parent_pid: Option<u32>,
) -> Option<String> {
    configured
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .or_else(|| {
            std::iter::once(SESSION_ENV)
                .chain(TERMINAL_SESSION_ENVS)
                .filter_map(|name| lookup(name))
                .find(|id| !id.is_empty())
        })
        .or_else(|| parent_pid.map(|pid| format!("ppid-{pid}")))
}

#[cfg(unix)]
fn parent_pid() -> Option<u32> {
    Some(std::os::unix::process::parent_id())
}

#[cfg(not(unix))]
fn parent_pid() -> Option<u32> {
    None
}

/// Where the config came from, reported once logging is up
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Builtin,
    /// The file existed but could not be used
    Fallback { path: PathBuf, error: String },
}

/// Resolve the config from the environment override or the default path.
/// A missing default file is not an error; a broken one falls back to defaults.
pub fn load_config_from_env() -> (DashboardConfig, ConfigSource) {
    let explicit = env::var(CONFIG_ENV).ok().map(PathBuf::from);
    let path = explicit
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if explicit.is_none() && !path.exists() {
        return (DashboardConfig::default(), ConfigSource::Builtin);
    }

    match DashboardConfig::from_file(&path) {
        Ok(config) => (config, ConfigSource::File(path)),
        Err(err) => (
            DashboardConfig::default(),
            ConfigSource::Fallback {
                path,
                error: err.to_string(),
            },
        ),
    }
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => tracing::info!(
                target: "region_pulse::config",
                path = %path.display(),
                "config.loaded=file"
            ),
            ConfigSource::Builtin => tracing::info!(
                target: "region_pulse::config",
                "config.loaded=builtin"
            ),
            ConfigSource::Fallback { path, error } => tracing::warn!(
                target: "region_pulse::config",
                path = %path.display(),
                error = %error,
                "config.load_failed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStorage;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region-pulse.json");
        fs::write(&path, r#"{"region": "TN", "refresh_interval_secs": 30}"#).unwrap();
        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.region, "TN");
        assert_eq!(config.refresh_interval(), Duration::from_secs(30));
        assert_eq!(config.snapshot_path, DashboardConfig::default().snapshot_path);
    }

    #[test]
    fn test_broken_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region-pulse.json");
        fs::write(&path, "{region").unwrap();
        assert!(matches!(DashboardConfig::from_file(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = DashboardConfig {
            refresh_interval_secs: 0,
            ..DashboardConfig::default()
        };
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_configured_session_id_wins() {
        let config = DashboardConfig {
            session_id: Some("tty3".to_string()),
            ..DashboardConfig::default()
        };
        assert_eq!(config.session_id().as_deref(), Some("tty3"));
    }

    #[test]
    fn test_session_id_fallback_order() {
        let env = |name: &str| match name {
            "TERM_SESSION_ID" => Some("w0t1p0".to_string()),
            "WINDOWID" => Some("8388621".to_string()),
            _ => None,
        };
        assert_eq!(resolve_session_id(None, env, Some(42)).as_deref(), Some("w0t1p0"));

        let explicit = |name: &str| (name == SESSION_ENV).then(|| "pinned".to_string());
        assert_eq!(resolve_session_id(None, explicit, Some(42)).as_deref(), Some("pinned"));

        // Empty values do not count as a scope
        assert_eq!(resolve_session_id(Some(""), no_env, Some(42)).as_deref(), Some("ppid-42"));
        assert_eq!(resolve_session_id(None, no_env, None), None);
    }

    #[test]
    fn test_default_sessions_in_different_shells_are_separate() {
        let dir = tempdir().unwrap();
        let first_shell = resolve_session_id(None, no_env, Some(1001)).unwrap();
        let second_shell = resolve_session_id(None, no_env, Some(1002)).unwrap();

        let launch = SessionStorage::open_in(dir.path(), &first_shell);
        launch.set("mapStatistic", "deceased").unwrap();
        drop(launch);

        let fresh = SessionStorage::open_in(dir.path(), &second_shell);
        assert_eq!(fresh.get("mapStatistic"), None);

        // Relaunching in the first shell restores the mode
        let relaunch = SessionStorage::open_in(dir.path(), &first_shell);
        assert_eq!(relaunch.get("mapStatistic").as_deref(), Some("deceased"));
    }
}
