//! Server configuration from `CASHCARD_*` environment variables

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, Level};

use cashcard_core::page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use cashcard_core::PageDefaults;
use cashcard_gate::{
    AuthorizationGate, AuthorizationGateBuilder, BasicHandler, GateError, InMemoryUserBackend,
    DEFAULT_REALM,
};

use crate::api::handlers::{CardServiceConfig, DEFAULT_REQUIRED_ROLE};
use crate::seed;

pub const ENV_PORT: &str = "CASHCARD_PORT";
pub const ENV_BIND: &str = "CASHCARD_BIND";
pub const ENV_LOG_LEVEL: &str = "CASHCARD_LOG_LEVEL";
pub const ENV_DATABASE_URL: &str = "CASHCARD_DATABASE_URL";
pub const ENV_USERS_FILE: &str = "CASHCARD_USERS_FILE";
pub const ENV_SEED_DEMO_DATA: &str = "CASHCARD_SEED_DEMO_DATA";
pub const ENV_DEFAULT_PAGE_SIZE: &str = "CASHCARD_DEFAULT_PAGE_SIZE";
pub const ENV_MAX_PAGE_SIZE: &str = "CASHCARD_MAX_PAGE_SIZE";
pub const ENV_REQUIRED_ROLE: &str = "CASHCARD_REQUIRED_ROLE";
pub const ENV_REALM: &str = "CASHCARD_REALM";

/// Configuration errors, reported once at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to read users file {path:?}: {source}")]
    UsersFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid user directory: {0}")]
    Users(#[from] GateError),
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub log_level: Level,
    pub database_url: Option<String>,
    pub users_file: Option<PathBuf>,
    pub seed_demo_data: bool,
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub required_role: String,
    pub realm: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
            log_level: Level::INFO,
            database_url: None,
            users_file: None,
            seed_demo_data: true,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            required_role: DEFAULT_REQUIRED_ROLE.into(),
            realm: DEFAULT_REALM.into(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`; unset variables keep defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let config = Self {
            bind: non_empty(ENV_BIND).unwrap_or(defaults.bind),
            port: parse_var(&non_empty, ENV_PORT)?.unwrap_or(defaults.port),
            log_level: parse_var(&non_empty, ENV_LOG_LEVEL)?.unwrap_or(defaults.log_level),
            database_url: non_empty(ENV_DATABASE_URL),
            users_file: non_empty(ENV_USERS_FILE).map(PathBuf::from),
            seed_demo_data: match non_empty(ENV_SEED_DEMO_DATA) {
                Some(value) => parse_bool(ENV_SEED_DEMO_DATA, &value)?,
                None => defaults.seed_demo_data,
            },
            default_page_size: parse_var(&non_empty, ENV_DEFAULT_PAGE_SIZE)?
                .unwrap_or(defaults.default_page_size),
            max_page_size: parse_var(&non_empty, ENV_MAX_PAGE_SIZE)?
                .unwrap_or(defaults.max_page_size),
            required_role: non_empty(ENV_REQUIRED_ROLE).unwrap_or(defaults.required_role),
            realm: non_empty(ENV_REALM).unwrap_or(defaults.realm),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.realm.contains('"') {
            return Err(invalid(ENV_REALM, &self.realm, "must not contain '\"'"));
        }
        if self.max_page_size == 0 {
            return Err(invalid(ENV_MAX_PAGE_SIZE, "0", "must be at least 1"));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(invalid(
                ENV_DEFAULT_PAGE_SIZE,
                &self.default_page_size.to_string(),
                &format!("must be between 1 and {}", self.max_page_size),
            ));
        }
        Ok(())
    }

    /// Socket address to listen on
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Card API settings derived from this configuration
    pub fn card_service(&self) -> CardServiceConfig {
        CardServiceConfig {
            page_defaults: PageDefaults {
                size: self.default_page_size,
                max_size: self.max_page_size,
                ..PageDefaults::default()
            },
            required_role: self.required_role.clone(),
        }
    }

    /// Build the gate from the users file, or the demo directory if none
    pub fn build_gate(&self) -> Result<Arc<AuthorizationGate>, ConfigError> {
        let users = match &self.users_file {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| ConfigError::UsersFile {
                    path: path.clone(),
                    source,
                })?;
                let users = InMemoryUserBackend::from_json(&json)?;
                info!(path = ?path, count = users.list_users().len(), "Loaded user directory");
                users
            }
            None => {
                info!("No users file configured, using demo user directory");
                seed::demo_users()?
            }
        };

        Ok(Arc::new(
            AuthorizationGateBuilder::new()
                .with_handler(BasicHandler::new(users))
                .with_realm(self.realm.clone())
                .build(),
        ))
    }
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| invalid(var, &value, &e.to_string())),
        None => Ok(None),
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(var, value, "expected true or false")),
    }
}
