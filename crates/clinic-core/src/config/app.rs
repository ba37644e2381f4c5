//! `[server]` section.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JSON bodies larger than this are rejected with 413.
    pub body_limit_bytes: usize,
    /// How long in-flight jobs get to finish after a shutdown signal.
    pub shutdown_grace_seconds: u64,
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// `host:port` as a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::configuration(format!("Invalid server address: {e}")))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            body_limit_bytes: 1024 * 1024,
            shutdown_grace_seconds: 30,
            cors: CorsConfig::default(),
        }
    }
}

/// Browser origins allowed to call the API: the patient portal and the
/// staff console. A single `"*"` allows any origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub max_age_seconds: u64,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            max_age_seconds: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_addr() {
        let server = ServerConfig {
            host: "127.0.0.1".into(),
            port: 9000,
            ..Default::default()
        };
        assert_eq!(server.bind_addr().unwrap().port(), 9000);

        let bad = ServerConfig {
            host: "not a host".into(),
            ..Default::default()
        };
        assert!(bad.bind_addr().is_err());
    }
}
