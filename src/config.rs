//! Configuration Management
//!
//! Optional TOML configuration for the CLI and embedding applications:
//! default strategy preference, default inter-key pacing, and a display
//! override. CLI flags merge over file values.

use crate::engine::AutotypeMethod;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound for the configured pacing delay; anything larger is
/// almost certainly a units mistake (a 10s gap per key).
const MAX_DELAY_MS: u64 = 10_000;

/// Autotype configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutotypeConfig {
    /// Default strategy preference
    pub method: AutotypeMethod,
    /// Default milliseconds between injected keys
    pub inter_key_delay_ms: u64,
    /// Display to connect to; `None` uses `$DISPLAY`
    pub display: Option<String>,
}

impl Default for AutotypeConfig {
    fn default() -> Self {
        Self {
            method: AutotypeMethod::PreferXtest,
            inter_key_delay_ms: 10,
            display: None,
        }
    }
}

impl AutotypeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: AutotypeConfig =
            toml::from_str(&content).context("failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default location, or defaults when no file exists
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Default config file location (`$XDG_CONFIG_HOME/xautotype/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("xautotype").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.inter_key_delay_ms > MAX_DELAY_MS {
            anyhow::bail!(
                "inter_key_delay_ms must be at most {} (got {})",
                MAX_DELAY_MS,
                self.inter_key_delay_ms
            );
        }
        Ok(())
    }

    /// Merge CLI overrides over file values
    pub fn with_overrides(mut self, delay_ms: Option<u64>, force_send_event: bool) -> Self {
        if let Some(delay) = delay_ms {
            self.inter_key_delay_ms = delay;
        }
        if force_send_event {
            self.method = AutotypeMethod::ForceSendEvent;
        }
        self
    }

    /// Configured pacing delay as a [`Duration`]
    pub fn inter_key_delay(&self) -> Duration {
        Duration::from_millis(self.inter_key_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AutotypeConfig::default();
        assert_eq!(config.method, AutotypeMethod::PreferXtest);
        assert_eq!(config.inter_key_delay_ms, 10);
        assert!(config.display.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config: AutotypeConfig = toml::from_str(
            r#"
            method = "force-send-event"
            inter_key_delay_ms = 25
            display = ":1"
            "#,
        )
        .unwrap();
        assert_eq!(config.method, AutotypeMethod::ForceSendEvent);
        assert_eq!(config.inter_key_delay_ms, 25);
        assert_eq!(config.display.as_deref(), Some(":1"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AutotypeConfig = toml::from_str("inter_key_delay_ms = 0").unwrap();
        assert_eq!(config.method, AutotypeMethod::PreferXtest);
        assert_eq!(config.inter_key_delay_ms, 0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = toml::from_str::<AutotypeConfig>("delay = 10");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_huge_delay() {
        let config = AutotypeConfig {
            inter_key_delay_ms: 60_000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "method = \"prefer-xtest\"").unwrap();
        writeln!(file, "inter_key_delay_ms = 5").unwrap();

        let config = AutotypeConfig::load(file.path()).unwrap();
        assert_eq!(config.inter_key_delay_ms, 5);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "inter_key_delay_ms = 99999").unwrap();
        assert!(AutotypeConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = AutotypeConfig::default().with_overrides(Some(50), true);
        assert_eq!(config.inter_key_delay_ms, 50);
        assert_eq!(config.method, AutotypeMethod::ForceSendEvent);
        assert_eq!(config.inter_key_delay(), Duration::from_millis(50));

        let config = AutotypeConfig::default().with_overrides(None, false);
        assert_eq!(config.inter_key_delay_ms, 10);
        assert_eq!(config.method, AutotypeMethod::PreferXtest);
    }
}
