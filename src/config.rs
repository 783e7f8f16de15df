// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup. Missing
//! mandatory values abort the process before the listener binds, never
//! lazily at first request.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the document store | Required |
//! | `JWT_SECRET` | HS256 signing secret for bearer tokens | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `CORS_ALLOWED_ORIGINS` | Comma-separated origin allowlist | permissive |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::net::SocketAddr;

/// Environment variable name for the document store root directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the token signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Configuration error raised during startup validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Process-wide configuration, resolved once in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address the server binds to.
    pub addr: SocketAddr,
    /// Root directory of the JSON document store.
    pub data_dir: String,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,
    /// Explicit CORS origin allowlist; empty means permissive.
    pub cors_allowed_origins: Vec<String>,
    /// `json` or `pretty` log output.
    pub log_json: bool,
}

impl Config {
    /// Load and validate configuration from the environment.
    ///
    /// # Errors
    /// Returns `ConfigError` if `JWT_SECRET` or `DATA_DIR` is absent or the
    /// bind address cannot be parsed. Callers must treat this as fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let data_dir =
            std::env::var(DATA_DIR_ENV).map_err(|_| ConfigError::Missing(DATA_DIR_ENV))?;
        if data_dir.trim().is_empty() {
            return Err(ConfigError::Invalid(DATA_DIR_ENV));
        }

        let jwt_secret =
            std::env::var(JWT_SECRET_ENV).map_err(|_| ConfigError::Missing(JWT_SECRET_ENV))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid(JWT_SECRET_ENV));
        }

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::Invalid("HOST"))?;

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let log_json = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            addr,
            data_dir,
            jwt_secret,
            cors_allowed_origins,
            log_json,
        })
    }
}
