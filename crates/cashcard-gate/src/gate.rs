//! Authorization Gate - routes `Authorization` headers to credential handlers

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{GateError, Result};
use crate::types::{Principal, Scheme};

/// Realm advertised in `WWW-Authenticate` challenges
pub const DEFAULT_REALM: &str = "cashcard";

/// Trait for credential handlers
///
/// Each handler validates the credential part of one authentication
/// scheme and produces the principal it identifies.
#[async_trait]
pub trait CredentialHandler: Send + Sync {
    /// Scheme this handler processes
    fn scheme(&self) -> Scheme;

    /// Validate a credential and resolve its principal
    ///
    /// # Arguments
    /// * `credential` - Everything after the scheme token in the header
    ///
    /// # Returns
    /// * `Ok(Principal)` - Authenticated principal with its roles
    /// * `Err(GateError)` - If the credential is rejected
    async fn validate(&self, credential: &str) -> Result<Principal>;

    /// Get a description of this handler (for logging)
    fn description(&self) -> &str {
        "credential handler"
    }
}

/// Authorization Gate
///
/// Holds one handler per scheme and dispatches each request's
/// `Authorization` header to the matching handler.
pub struct AuthorizationGate {
    handlers: HashMap<Scheme, Arc<dyn CredentialHandler>>,
    realm: String,
}

impl AuthorizationGate {
    /// Create a gate with no handlers
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            realm: DEFAULT_REALM.to_string(),
        }
    }

    /// Register a credential handler, replacing any for the same scheme
    pub fn register_handler<H: CredentialHandler + 'static>(&mut self, handler: H) {
        let scheme = handler.scheme();
        debug!(
            scheme = %scheme,
            description = handler.description(),
            "Registered credential handler"
        );
        self.handlers.insert(scheme, Arc::new(handler));
    }

    /// Value for the `WWW-Authenticate` header on a 401
    pub fn challenge(&self) -> String {
        format!("Basic realm=\"{}\"", self.realm)
    }

    /// Authenticate a request from its `Authorization` header value
    ///
    /// # Returns
    /// * `Ok(Principal)` - The authenticated principal
    /// * `Err(GateError)` - Missing, malformed or rejected credentials
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Principal> {
        let header = authorization.ok_or(GateError::MissingCredentials)?;
        let (scheme, credential) = split_header(header)?;

        let handler = self.handlers.get(&scheme).ok_or_else(|| {
            warn!(scheme = %scheme, "No handler for authentication scheme");
            GateError::NoHandler(scheme.to_string())
        })?;

        let result = handler.validate(credential).await;

        match &result {
            Ok(principal) => {
                debug!(
                    scheme = %scheme,
                    principal = %principal.name,
                    "Credential validated"
                );
            }
            Err(e) => {
                warn!(
                    scheme = %scheme,
                    error = %e,
                    "Credential validation failed"
                );
            }
        }

        result
    }
}

impl Default for AuthorizationGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `"<scheme> <credential>"`
fn split_header(header: &str) -> Result<(Scheme, &str)> {
    let header = header.trim();
    let (scheme, credential) = header
        .split_once(' ')
        .ok_or_else(|| GateError::InvalidFormat("Expected '<scheme> <credential>'".into()))?;

    let scheme = scheme
        .parse::<Scheme>()
        .map_err(|_| GateError::UnsupportedScheme(scheme.to_string()))?;

    let credential = credential.trim();
    if credential.is_empty() {
        return Err(GateError::InvalidFormat("Empty credential".into()));
    }

    Ok((scheme, credential))
}

/// Builder for creating an AuthorizationGate with handlers
pub struct AuthorizationGateBuilder {
    gate: AuthorizationGate,
}

impl AuthorizationGateBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            gate: AuthorizationGate::new(),
        }
    }

    /// Add a credential handler
    pub fn with_handler<H: CredentialHandler + 'static>(mut self, handler: H) -> Self {
        self.gate.register_handler(handler);
        self
    }

    /// Set the challenge realm
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.gate.realm = realm.into();
        self
    }

    /// Build the gate
    pub fn build(self) -> AuthorizationGate {
        self.gate
    }
}

impl Default for AuthorizationGateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
