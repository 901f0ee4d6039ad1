//! Configuration loading and types
//!
//! Values come from the process environment, after an optional `.env` file
//! has been merged into it.

use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

use eyre::{WrapErr, bail};

/// Top-level configuration for the daemon
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Database settings
    pub database: DatabaseConfig,
    /// Logging settings
    pub log: LogConfig,
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on, all interfaces
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Socket address the listener binds to
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

/// Database settings
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Connection string; may be empty, in which case connecting fails
    pub url: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
    /// Apply embedded migrations at startup
    pub migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: mathtermind_db::Database::DEFAULT_POOL_SIZE,
            migrate: false,
        }
    }
}

// The URL usually embeds a password.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &if self.url.is_empty() { "" } else { "<redacted>" })
            .field("max_connections", &self.max_connections)
            .field("migrate", &self.migrate)
            .finish()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, colored when attached to a terminal
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => bail!("unknown log format '{other}', expected 'pretty' or 'json'"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default filter directive (trace, debug, info, warn, error); `RUST_LOG` wins
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from `.env` and the process environment
    ///
    /// # Errors
    /// Returns error if a variable is present but invalid
    pub fn load() -> eyre::Result<Self> {
        // A missing .env file is the normal case outside development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// # Errors
    /// Returns error if a variable is present but invalid
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let mut config = Config::default();

        if let Some(port) = lookup("SERVER_PORT") {
            if port.trim().is_empty() {
                bail!("SERVER_PORT cannot be empty");
            }
            config.server.port = port
                .trim()
                .parse()
                .wrap_err_with(|| format!("invalid SERVER_PORT '{port}'"))?;
        }

        if let Some(url) = lookup("DATABASE_URL") {
            config.database.url = url;
        }
        if let Some(max) = lookup("DATABASE_MAX_CONNECTIONS") {
            config.database.max_connections = max
                .trim()
                .parse()
                .wrap_err_with(|| format!("invalid DATABASE_MAX_CONNECTIONS '{max}'"))?;
        }
        if let Some(migrate) = lookup("DATABASE_MIGRATE") {
            config.database.migrate = parse_flag(&migrate)
                .wrap_err_with(|| format!("invalid DATABASE_MIGRATE '{migrate}'"))?;
        }

        if let Some(level) = lookup("LOG_LEVEL").filter(|l| !l.trim().is_empty()) {
            config.log.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.log.format = format.parse()?;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> eyre::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => bail!("expected a boolean"),
    }
}
