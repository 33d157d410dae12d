use std::env;
use std::net::SocketAddr;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub session_cookie: String,
}

impl Config {
    /// Reads settings from the environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://dept_portal.db".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is not a socket address: {}", e)))?;

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse::<u32>().map_err(|_| {
                AppError::Config(format!("DB_MAX_CONNECTIONS must be a number, got {:?}", raw))
            })?,
            Err(_) => 5,
        };

        let session_cookie = env::var("SESSION_COOKIE").unwrap_or_else(|_| "session".to_string());

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            session_cookie,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_connections: 1,
            session_cookie: "session".to_string(),
        }
    }
}
