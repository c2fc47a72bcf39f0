//! Core types for the Authorization Gate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authentication schemes named in the `Authorization` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// RFC 7617 username/password
    Basic,
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scheme::Basic => write!(f, "Basic"),
        }
    }
}

impl std::str::FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Scheme::Basic),
            _ => Err(format!("Unknown authentication scheme: {}", s)),
        }
    }
}

/// An authenticated principal
///
/// `name` is what gets stored as a card's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Principal name
    pub name: String,

    /// Roles granted to this principal
    #[serde(default)]
    pub roles: Vec<String>,

    /// Scheme that authenticated this principal
    pub scheme: Scheme,

    /// When authentication succeeded
    pub authenticated_at: DateTime<Utc>,
}

impl Principal {
    /// Create a principal authenticated now
    pub fn new(name: impl Into<String>, scheme: Scheme) -> Self {
        Self {
            name: name.into(),
            roles: Vec::new(),
            scheme,
            authenticated_at: Utc::now(),
        }
    }

    /// Set roles
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    /// Check for an exact role name
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
