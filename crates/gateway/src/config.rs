//! Gateway configuration.

use std::env;
use std::str::FromStr;

use common::{AppResult, DatabaseConfig, ServerConfig};
use user_service_lib::RepositoryKind;

/// Gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// HTTP listener
    pub server: ServerConfig,
    /// Store connection and retry policy
    pub database: DatabaseConfig,
    /// Raw backend name, parsed when the repository is built
    pub backend: String,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_defaults = ServerConfig::default();
        let db_defaults = DatabaseConfig::default();

        Self {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(server_defaults.host),
                port: parse_or(&lookup, "SERVER_PORT", server_defaults.port),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or(db_defaults.url),
                max_connections: parse_or(
                    &lookup,
                    "DB_MAX_CONNECTIONS",
                    db_defaults.max_connections,
                ),
                connect_retries: parse_or(
                    &lookup,
                    "DB_CONNECT_RETRIES",
                    db_defaults.connect_retries,
                ),
                retry_delay_ms: parse_or(
                    &lookup,
                    "DB_CONNECT_RETRY_DELAY_MS",
                    db_defaults.retry_delay_ms,
                ),
            },
            backend: lookup("REPOSITORY_BACKEND")
                .or_else(|| lookup("LIBRARY_TYPE"))
                .unwrap_or_else(|| RepositoryKind::default().to_string()),
        }
    }

    /// Parse the configured backend name.
    pub fn repository_kind(&self) -> AppResult<RepositoryKind> {
        RepositoryKind::from_str(&self.backend)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            backend: RepositoryKind::default().to_string(),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
