use anyhow::{Context, Result};
use chrono::FixedOffset;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use database::PoolSettings;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use todo_api::{parse_utc_offset, ServerOptions};

/// Prefix for structured environment overrides, e.g. `TODO_SERVER__PORT`
const ENV_PREFIX: &str = "TODO";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
    pub health: HealthConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// SQLite file path, `sqlite://` URL or `:memory:`
    pub path: String,
    /// Maximum number of database connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connection_timeout: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub port: u16,
    /// Per-request deadline in seconds; 0 disables it
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DisplayConfig {
    /// Offset used to render timestamps, e.g. `+09:00`
    pub utc_offset: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, json, compact)
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HealthConfig {
    /// Ping the store from `/healthz`
    pub deep: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl Config {
    /// Load configuration from the embedded defaults, `CONFIG_FILE` and the
    /// environment
    pub fn from_env() -> Result<Self> {
        Self::load(env::var("CONFIG_FILE").ok().as_deref(), false)
    }

    /// Load configuration with `path` layered over the embedded defaults
    ///
    /// Unlike `CONFIG_FILE`, an explicitly requested file must exist.
    pub fn from_file(path: &str) -> Result<Self> {
        Self::load(Some(path), true)
    }

    fn load(config_file: Option<&str>, required: bool) -> Result<Self> {
        let mut builder = ConfigBuilder::builder().add_source(File::from_str(
            include_str!("../config/default.toml"),
            FileFormat::Toml,
        ));

        if let Some(config_file) = config_file {
            builder = builder.add_source(
                File::with_name(config_file)
                    .required(required)
                    .format(FileFormat::Toml),
            );
        }

        builder = builder.add_source(env_source());

        let config = builder.build().context("Failed to build configuration")?;

        let mut result: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        result.apply_standard_env_vars(|key| env::var(key).ok())?;

        Ok(result)
    }

    /// Apply the conventional deployment variables
    ///
    /// `DB_PATH`, `PORT` (`8080`, `:8080` or `host:8080`), `LISTEN_ADDR` and
    /// `LOG_LEVEL` win over everything except CLI flags.
    pub fn apply_standard_env_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_path) = lookup("DB_PATH").filter(|v| !v.is_empty()) {
            self.database.path = db_path;
        }

        if let Some(listen_addr) = lookup("LISTEN_ADDR").filter(|v| !v.is_empty()) {
            self.server.listen_addr = listen_addr;
        }

        if let Some(port) = lookup("PORT").filter(|v| !v.is_empty()) {
            self.apply_port(&port)?;
        }

        if let Some(log_level) = lookup("LOG_LEVEL").filter(|v| !v.is_empty()) {
            self.logging.level = log_level;
        }

        Ok(())
    }

    /// Apply a port value in any of the accepted forms
    pub fn apply_port(&mut self, raw: &str) -> Result<()> {
        let (host, port) = match raw.rsplit_once(':') {
            Some((host, port)) => (host, port),
            None => ("", raw),
        };

        self.server.port = port
            .parse()
            .with_context(|| format!("Invalid port '{raw}'"))?;

        if !host.is_empty() {
            self.server.listen_addr = host.to_string();
        }

        Ok(())
    }

    /// Get the server socket address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.listen_addr, self.server.port)
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        parse_utc_offset(&self.display.utc_offset).context("Invalid display.utc_offset")
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self.server.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.database.max_connections,
            acquire_timeout: Duration::from_secs(self.database.connection_timeout),
        }
    }

    /// Options handed to the HTTP layer
    pub fn server_options(&self) -> Result<ServerOptions> {
        Ok(ServerOptions {
            utc_offset: self.utc_offset()?,
            deep_health: self.health.deep,
            request_timeout: self.request_timeout(),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ));
            }
        }

        if self.database.path.trim().is_empty() {
            return Err(anyhow::anyhow!("Database path cannot be empty"));
        }

        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!(
                "Database max_connections must be greater than 0"
            ));
        }

        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        self.utc_offset()?;

        Ok(())
    }
}

/// `TODO_<SECTION>__<KEY>` overrides, e.g. `TODO_DATABASE__MAX_CONNECTIONS`
fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: ".sqlite3/todo.db".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            server: ServerConfig {
                listen_addr: "127.0.0.1".to_string(),
                port: 8080,
                request_timeout_secs: 0,
            },
            display: DisplayConfig {
                utc_offset: "+09:00".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
            health: HealthConfig { deep: false },
        }
    }
}
