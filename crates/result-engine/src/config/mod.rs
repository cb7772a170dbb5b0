mod fixtures;

pub use fixtures::{EngineConfig, Fixtures};

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const ENV_PREFIX: &str = "RESULT_ENGINE_";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment stage, only reported in the startup log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppEnvironment {
    #[default]
    Development,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            _ => Self::Development,
        }
    }
}

/// Process settings read from `RESULT_ENGINE_*` variables (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    /// JSON file holding thresholds, recruiter rules and transcript data.
    /// The built-in demo fixtures are used when unset.
    pub fixtures_path: Option<PathBuf>,
}

/// Non-blank value of `RESULT_ENGINE_<key>`.
fn setting(key: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}{key}"))
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = match setting("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            environment: setting("ENV")
                .map(|value| AppEnvironment::parse(&value))
                .unwrap_or_default(),
            server: ServerConfig {
                host: setting("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: setting("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            },
            fixtures_path: setting("FIXTURES").map(PathBuf::from),
        })
    }

    /// Reads the configured fixture file, falling back to the demo data set.
    pub fn fixtures(&self) -> Result<Fixtures, ConfigError> {
        match &self.fixtures_path {
            Some(path) => Fixtures::from_path(path),
            None => Ok(Fixtures::demo()),
        }
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    FixtureIo { path: PathBuf, source: std::io::Error },
    FixtureFormat { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "RESULT_ENGINE_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "RESULT_ENGINE_HOST must be localhost or an IP address")
            }
            ConfigError::FixtureIo { path, .. } => {
                write!(f, "unable to read fixtures from {}", path.display())
            }
            ConfigError::FixtureFormat { path, source } => {
                write!(f, "invalid fixture file {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::FixtureIo { source, .. } => Some(source),
            ConfigError::FixtureFormat { source, .. } => Some(source),
        }
    }
}
