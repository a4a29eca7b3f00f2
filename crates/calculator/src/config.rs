use std::env;
use std::path::PathBuf;

use analytics::TelemetryConfig;
use anyhow::{Context, Result};

const APP_DIR: &str = "graham-calc";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where the tutorial marker lives
    pub state_dir: PathBuf,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let state_dir = match env::var("GRAHAM_STATE_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_state_dir()?,
        };

        Ok(Self {
            state_dir,
            telemetry: TelemetryConfig::from_env(),
        })
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(mut self, state_dir: Option<PathBuf>, no_telemetry: bool) -> Self {
        if let Some(dir) = state_dir {
            self.state_dir = dir;
        }
        if no_telemetry {
            self.telemetry.enabled = false;
        }
        self
    }
}

fn default_state_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .context("Could not determine a config directory; set GRAHAM_STATE_DIR")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let config = AppConfig {
            state_dir: PathBuf::from("/tmp/env-dir"),
            telemetry: TelemetryConfig::default(),
        };

        let config = config.with_overrides(Some(PathBuf::from("/tmp/flag-dir")), true);
        assert_eq!(config.state_dir, PathBuf::from("/tmp/flag-dir"));
        assert!(!config.telemetry.enabled);
    }

    #[test]
    fn test_no_overrides_keeps_environment_values() {
        let config = AppConfig {
            state_dir: PathBuf::from("/tmp/env-dir"),
            telemetry: TelemetryConfig::default(),
        };

        let config = config.with_overrides(None, false);
        assert_eq!(config.state_dir, PathBuf::from("/tmp/env-dir"));
        assert!(config.telemetry.enabled);
    }
}
