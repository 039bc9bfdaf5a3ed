//! Server configuration, loaded once at startup from the environment.

use std::fmt::Debug;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Runtime configuration for the HTTP server.
///
/// Every knob except the JWT secret has a development-friendly default:
///
/// - `HOST` (default `0.0.0.0`)
/// - `PORT` (default `3000`)
/// - `CORS_ORIGINS` -- comma-separated, default `http://localhost:5173`
/// - `REQUEST_TIMEOUT_SECS` (default `30`)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// # Panics
    ///
    /// Panics on unparsable values (and, via [`JwtConfig::from_env`], on a
    /// missing `JWT_SECRET`). Startup is the right time to fail on bad
    /// configuration.
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parsed("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_parsed("REQUEST_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Read `var` from the environment, falling back to `default` when unset.
fn env_parsed<T>(var: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Debug,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{var} is not valid: {e:?}")),
        Err(_) => default,
    }
}
