use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Built frontend to serve on non-API paths (SPA fallback to index.html)
    pub static_dir: Option<PathBuf>,
    pub max_request_size_bytes: usize,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Unset means the in-memory store is used
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub ttl_minutes: i64,
    pub sweep_interval_secs: u64,
    pub cookie_name: String,
    pub secure_cookie: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("STATIC_DIR") {
            if !v.trim().is_empty() {
                self.server.static_dir = Some(PathBuf::from(v));
            }
        }
        if let Ok(v) = env::var("SERVER_MAX_REQUEST_SIZE_BYTES") {
            self.server.max_request_size_bytes = v.parse().unwrap_or(self.server.max_request_size_bytes);
        }
        if let Ok(v) = env::var("SERVER_CORS_ORIGINS") {
            self.server.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_TTL_MINUTES") {
            self.session.ttl_minutes = v.parse().unwrap_or(self.session.ttl_minutes);
        }
        if let Ok(v) = env::var("SESSION_SWEEP_INTERVAL_SECS") {
            self.session.sweep_interval_secs = v.parse().unwrap_or(self.session.sweep_interval_secs);
        }
        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            if !v.trim().is_empty() {
                self.session.cookie_name = v;
            }
        }
        if let Ok(v) = env::var("SESSION_SECURE_COOKIE") {
            self.session.secure_cookie = v.parse().unwrap_or(self.session.secure_cookie);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3001,
                static_dir: None,
                max_request_size_bytes: 50 * 1024 * 1024, // 50MB
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            session: SessionConfig {
                ttl_minutes: 15,
                sweep_interval_secs: 60,
                cookie_name: "session_id".to_string(),
                secure_cookie: false,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3001,
                static_dir: None,
                max_request_size_bytes: 25 * 1024 * 1024, // 25MB
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            session: SessionConfig {
                ttl_minutes: 15,
                sweep_interval_secs: 60,
                cookie_name: "session_id".to_string(),
                secure_cookie: true,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3001,
                static_dir: None,
                max_request_size_bytes: 25 * 1024 * 1024, // 25MB
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            session: SessionConfig {
                ttl_minutes: 15,
                sweep_interval_secs: 300,
                cookie_name: "session_id".to_string(),
                secure_cookie: true,
            },
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.session.ttl_minutes)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.session.ttl_minutes, 15);
        assert!(!config.session.secure_cookie);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.session.secure_cookie);
        assert_eq!(config.session_ttl(), chrono::Duration::minutes(15));
    }
}
