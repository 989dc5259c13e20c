//! Configuration loading and typed config structures for the broker.
//!
//! The configuration lives in `prompter-config.yaml` in the working
//! directory and is read once at startup. Every field has a default, so
//! the file is optional. The listening port can also be set from the
//! environment with `PROMPTER_PORT`, which wins over the file.
//!
//! ```yaml
//! server:
//!   port: 5533
//! logging:
//!   level: info
//! ```

use std::path::Path;

use serde::Deserialize;

/// Default configuration file name, relative to the working directory.
pub const CONFIG_FILE: &str = "prompter-config.yaml";

/// Environment variable overriding [`ServerSettings::port`].
pub const PORT_ENV: &str = "PROMPTER_PORT";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The port override is not a valid TCP port.
    #[error("invalid {PORT_ENV} value: {value:?}")]
    InvalidPort {
        /// The rejected value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level broker configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PrompterConfig {
    /// Network listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl PrompterConfig {
    /// Load configuration from `path` if it exists, defaults otherwise,
    /// then apply the environment port override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::InvalidPort`] if `PROMPTER_PORT` is malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_port_override(std::env::var(PORT_ENV).ok())?;
        Ok(config)
    }

    /// Read configuration from `path`, or defaults if there is no such
    /// file. No environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read,
    /// or [`ConfigError::Yaml`] if it is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string. No environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Replace the port with `value` when one is given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if `value` is not a `u16`.
    pub fn apply_port_override(&mut self, value: Option<String>) -> Result<(), ConfigError> {
        if let Some(value) = value {
            self.server.port = value
                .trim()
                .parse::<u16>()
                .map_err(|_parse| ConfigError::InvalidPort { value })?;
        }
        Ok(())
    }
}

/// Network listener settings.
///
/// The broker always binds to loopback; only the port is configurable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// TCP port for the prompt API and the panel.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

const fn default_port() -> u16 {
    5533
}

fn default_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PrompterConfig::default();
        assert_eq!(config.server.port, 5533);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
server:
  port: 6001
logging:
  level: debug
";
        let config = PrompterConfig::parse(yaml).unwrap();
        assert_eq!(config.server.port, 6001);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_partial_yaml_fills_defaults() {
        let config = PrompterConfig::parse("logging:\n  level: warn\n").unwrap();
        assert_eq!(config.server.port, 5533);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn parse_rejects_bad_yaml() {
        assert!(matches!(
            PrompterConfig::parse("server: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn port_override_replaces_file_value() {
        let mut config = PrompterConfig::default();
        config.apply_port_override(Some(String::from(" 7000 "))).unwrap();
        assert_eq!(config.server.port, 7000);

        config.apply_port_override(None).unwrap();
        assert_eq!(config.server.port, 7000);
    }

    #[test]
    fn port_override_rejects_garbage() {
        let mut config = PrompterConfig::default();
        let err = config.apply_port_override(Some(String::from("99999")));
        assert!(matches!(err, Err(ConfigError::InvalidPort { .. })));
        assert_eq!(config.server.port, 5533);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = PrompterConfig::from_file(Path::new("does-not-exist.yaml")).unwrap();
        assert_eq!(config, PrompterConfig::default());
        assert_eq!(config.server.port, 5533);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn existing_file_is_read() {
        let path = std::env::temp_dir().join(format!("prompter-config-{}.yaml", std::process::id()));
        std::fs::write(&path, "server:\n  port: 6100\n").unwrap();

        let config = PrompterConfig::from_file(&path);
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.server.port, 6100);
        assert_eq!(config.logging.level, "info");
    }
}
