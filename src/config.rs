use std::env;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Application configuration loaded from `.env` and the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    // Store
    pub db_path: String,

    // Web server
    pub api_host: String,
    pub api_port: u16,
    pub max_workers: usize,

    // CORS
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_port = get("API_PORT", "8000");
        let api_port = api_port.trim().parse().map_err(|_| ConfigError::Invalid {
            key: "API_PORT",
            expected: "a port number",
            value: api_port.clone(),
        })?;

        let max_workers = get("MAX_WORKERS", "8");
        let max_workers = match max_workers.trim().parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "MAX_WORKERS",
                    expected: "a positive integer",
                    value: max_workers,
                })
            }
        };

        Ok(Self {
            db_path: get("DB_PATH", "airbnb.sqlite3"),
            api_host: get("API_HOST", "0.0.0.0"),
            api_port,
            max_workers,
            cors_origins: split_origins(&get(
                "CORS_ORIGINS",
                "http://localhost:5173,http://localhost:3000",
            )),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.api_host, self.api_port);
        raw.parse().map_err(|_| ConfigError::Invalid {
            key: "API_HOST",
            expected: "an IP address",
            value: self.api_host.clone(),
        })
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
