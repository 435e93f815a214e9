use serde::{Deserialize, Serialize};

/// Maximum number of addresses a country list request may ask for.
pub const MAX_ADDRESS_LIMIT: u32 = 1000;

/// Address count used when the caller supplies no usable limit.
pub const DEFAULT_ADDRESS_LIMIT: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub limits: LimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    /// How many range rows a country list query fetches. The row limit
    /// bounds ranges, not addresses, so it must be at least
    /// `MAX_ADDRESS_LIMIT` for expansion to fill any requested list even
    /// when every matched range covers a single address.
    pub range_fetch_limit: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str =
            std::env::var("DATABASE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

        let backend = match backend_str.to_lowercase().as_str() {
            "postgres" | "postgresql" => DatabaseBackend::Postgres,
            _ => DatabaseBackend::Sqlite,
        };

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./proxyscope.db".to_string());

        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let max_lifetime_secs = std::env::var("DB_MAX_LIFETIME_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(180);

        let host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let mut range_fetch_limit = std::env::var("RANGE_FETCH_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(MAX_ADDRESS_LIMIT);

        if range_fetch_limit < MAX_ADDRESS_LIMIT {
            tracing::warn!(
                "RANGE_FETCH_LIMIT {} is below the maximum address limit {}, raising it",
                range_fetch_limit,
                MAX_ADDRESS_LIMIT
            );
            range_fetch_limit = MAX_ADDRESS_LIMIT;
        }

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections,
                max_lifetime_secs,
            },
            server: ServerConfig { host, port },
            limits: LimitConfig { range_fetch_limit },
        })
    }
}
