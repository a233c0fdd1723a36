use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKSHELF_ENV";
const CONFIG_DIR_ENV: &str = "BOOKSHELF_CONFIG_DIR";
const ENV_PREFIX: &str = "BOOKSHELF";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// and `BOOKSHELF_*` variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment: Environment = std::env::var(ENV_VAR_NAME)
            .unwrap_or_else(|_| DEFAULT_ENV.to_string())
            .parse()?;

        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .context("unable to resolve current directory")?,
        };

        Self::load_from(&config_dir, environment)
    }

    /// Load configuration from an explicit directory and environment.
    pub fn load_from(config_dir: &Path, environment: Environment) -> anyhow::Result<Self> {
        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment.as_str()));

        tracing::debug!(
            base = %base_path.display(),
            overlay = %environment_path.display(),
            "loading settings"
        );

        let cfg = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        // The selected environment always wins over any `environment` key in files.
        settings.environment = environment;

        Ok(settings)
    }

    /// `host:port` the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseSettings {
    /// JSON file with an array of books loaded into the store at startup.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_log_level")]
    pub log_level: String,
}

impl TelemetrySettings {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_level: Self::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_server_binds_all_interfaces() {
        let settings = Settings::default();
        assert_eq!(settings.bind_address(), "0.0.0.0:8080");
        assert_eq!(settings.server.request_timeout_ms, 15000);
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let err = "qa".parse::<Environment>().unwrap_err();
        assert!(err.to_string().contains("unsupported environment 'qa'"));
    }

    #[test]
    fn missing_config_dir_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(dir.path(), Environment::Staging).unwrap();

        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.server.port, 8080);
        assert!(settings.database.seed_path.is_none());
    }

    #[test]
    fn environment_overlay_overrides_base_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.toml"),
            "[server]\nport = 3000\nhost = \"127.0.0.1\"\n\n[telemetry]\nlog_format = \"json\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("production.toml"),
            "[server]\nport = 4000\n\n[database]\nseed_path = \"seed/books.json\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(dir.path(), Environment::Production).unwrap();

        assert_eq!(settings.server.port, 4000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.telemetry.log_format, LogFormat::Json);
        assert_eq!(
            settings.database.seed_path,
            Some(PathBuf::from("seed/books.json"))
        );
    }
}
