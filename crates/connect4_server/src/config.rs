//! Server configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables (`.env` included), then command-line flags.

use axum::http::{HeaderValue, Method};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, info, instrument};

/// Origin entry that admits every origin.
pub const ANY_ORIGIN: &str = "*";

/// Configuration for the game server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    host: String,

    /// Port to bind.
    port: u16,

    /// Path of the SQLite database file.
    database_path: String,

    /// Log filter used when `RUST_LOG` is unset (e.g. "info", "debug").
    log_filter: String,

    /// Browser origins allowed to call the API; `"*"` admits any.
    allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_path: "connect4.db".to_string(),
            log_filter: "info".to_string(),
            allowed_origins: vec![ANY_ORIGIN.to_string()],
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Resolves configuration from an optional file plus the process
    /// environment, after loading `.env` if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file or an environment value is invalid.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_vars(|key| std::env::var(key).ok())
    }

    /// Overrides fields from `HOST`, `PORT`, `DATABASE_PATH`, `LOG_LEVEL` and
    /// `ALLOWED_ORIGINS` (comma-separated) as reported by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `PORT` is not a valid port number.
    #[instrument(skip(self, lookup))]
    pub fn with_vars(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid PORT '{}': {}", port, e)))?;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database_path = path;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_filter = level.to_lowercase();
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(self)
    }

    /// Applies command-line overrides; `None` keeps the current value.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        database_path: Option<String>,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(path) = database_path {
            self.database_path = path;
        }
        self
    }

    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Cross-origin policy for browser clients.
    ///
    /// A `"*"` entry admits any origin; otherwise only the listed origins
    /// are echoed back. An empty list admits none.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an origin is not a valid header value.
    #[instrument(skip(self), fields(origins = ?self.allowed_origins))]
    pub fn cors_layer(&self) -> Result<CorsLayer, ConfigError> {
        let allow_origin = if self.allowed_origins.iter().any(|o| o == ANY_ORIGIN) {
            AllowOrigin::any()
        } else {
            let origins = self
                .allowed_origins
                .iter()
                .map(|origin| {
                    HeaderValue::from_str(origin).map_err(|e| {
                        ConfigError::new(format!("Invalid origin '{}': {}", origin, e))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            AllowOrigin::list(origins)
        };

        debug!("CORS policy built");
        Ok(CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
