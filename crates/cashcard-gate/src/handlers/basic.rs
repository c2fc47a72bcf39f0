//! HTTP Basic Credential Handler
//!
//! Validates `username:password` pairs against a user backend.

use argon2::Argon2;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};
use tracing::debug;

use crate::error::{GateError, Result};
use crate::gate::CredentialHandler;
use crate::types::{Principal, Scheme};

/// Decoded Basic credentials
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Decode the base64 `username:password` token
    ///
    /// The password may itself contain colons; the username may not.
    pub fn decode(token: &str) -> Result<Self> {
        let decoded = String::from_utf8(STANDARD.decode(token.trim())?)?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| GateError::InvalidFormat("Missing ':' separator".into()))?;

        if username.is_empty() {
            return Err(GateError::InvalidFormat("Empty username".into()));
        }

        Ok(Self::new(username, password))
    }

    /// Encode as a base64 token
    pub fn encode(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.username, self.password))
    }

    /// Full `Authorization` header value
    pub fn header_value(&self) -> String {
        format!("Basic {}", self.encode())
    }
}

/// A directory entry
///
/// The password is kept only as an argon2id PHC string.
#[derive(Clone)]
pub struct UserRecord {
    pub username: String,
    password_hash: String,
    pub roles: Vec<String>,
    pub enabled: bool,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("roles", &self.roles)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl UserRecord {
    /// Create a record, hashing the plaintext password with a fresh salt
    pub fn new(username: impl Into<String>, password: &str) -> Result<Self> {
        Ok(Self {
            username: username.into(),
            password_hash: hash_password(password)?,
            roles: Vec::new(),
            enabled: true,
        })
    }

    /// Set roles
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    /// Enable or disable the account
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Check a candidate password against the stored hash
    pub fn verify_password(&self, password: &str) -> bool {
        verify_hash(password, &self.password_hash)
    }
}

/// Serialized form of a directory entry
#[derive(Debug, Clone, Deserialize)]
pub struct UserSpec {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl TryFrom<UserSpec> for UserRecord {
    type Error = GateError;

    fn try_from(spec: UserSpec) -> Result<Self> {
        if spec.username.is_empty() || spec.username.contains(':') {
            return Err(GateError::InvalidUser(format!(
                "Username '{}' must be non-empty and contain no ':'",
                spec.username
            )));
        }

        Ok(UserRecord::new(spec.username, &spec.password)?
            .with_roles(spec.roles)
            .with_enabled(spec.enabled))
    }
}

// ── Password helpers ──

/// Hash a plain password with argon2id.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| GateError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against an argon2id hash.
fn verify_hash(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Hash checked for unknown usernames, so a miss costs one verification
/// just like a wrong password.
fn decoy_hash() -> Option<&'static str> {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();
    DECOY
        .get_or_init(|| hash_password("cashcard-decoy").ok())
        .as_deref()
}

/// Backend trait for user lookup
///
/// Implement this trait to plug in a different user directory.
#[async_trait]
pub trait UserBackend: Send + Sync {
    /// Look up a user by name
    async fn find_user(&self, username: &str) -> Result<Option<UserRecord>>;

    /// Get a description of this backend
    fn description(&self) -> &str {
        "user backend"
    }
}

/// In-memory user directory
pub struct InMemoryUserBackend {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserBackend {
    /// Create an empty directory
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Build a directory from serialized entries
    pub fn from_specs(specs: Vec<UserSpec>) -> Result<Self> {
        let backend = Self::new();
        for spec in specs {
            backend.register_user(UserRecord::try_from(spec)?)?;
        }
        Ok(backend)
    }

    /// Build a directory from a JSON array of entries
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<UserSpec> = serde_json::from_str(json)?;
        Self::from_specs(specs)
    }

    /// Add or replace a user
    pub fn register_user(&self, record: UserRecord) -> Result<()> {
        let mut users = self
            .users
            .write()
            .map_err(|_| GateError::Internal("User directory lock poisoned".into()))?;
        users.insert(record.username.clone(), record);
        Ok(())
    }

    /// List all usernames
    pub fn list_users(&self) -> Vec<String> {
        self.users
            .read()
            .map(|users| users.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for InMemoryUserBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserBackend for InMemoryUserBackend {
    async fn find_user(&self, username: &str) -> Result<Option<UserRecord>> {
        let users = self
            .users
            .read()
            .map_err(|_| GateError::Internal("User directory lock poisoned".into()))?;
        Ok(users.get(username).cloned())
    }

    fn description(&self) -> &str {
        "in-memory user backend"
    }
}

/// HTTP Basic Credential Handler
pub struct BasicHandler {
    backend: Arc<dyn UserBackend>,
}

impl BasicHandler {
    /// Create a handler over the given backend
    pub fn new<B: UserBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }
}

#[async_trait]
impl CredentialHandler for BasicHandler {
    fn scheme(&self) -> Scheme {
        Scheme::Basic
    }

    fn description(&self) -> &str {
        "HTTP Basic handler"
    }

    async fn validate(&self, credential: &str) -> Result<Principal> {
        let credentials = BasicCredentials::decode(credential)?;
        debug!(
            username = %credentials.username,
            backend = self.backend.description(),
            "Validating Basic credentials"
        );

        let Some(record) = self.backend.find_user(&credentials.username).await? else {
            if let Some(decoy) = decoy_hash() {
                verify_hash(&credentials.password, decoy);
            }
            return Err(GateError::UnknownUser);
        };

        if !record.verify_password(&credentials.password) {
            return Err(GateError::BadPassword);
        }

        if !record.enabled {
            return Err(GateError::Disabled);
        }

        Ok(Principal::new(record.username, Scheme::Basic).with_roles(record.roles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> InMemoryUserBackend {
        let backend = InMemoryUserBackend::new();
        backend
            .register_user(
                UserRecord::new("sarah1", "abc123")
                    .unwrap()
                    .with_roles(vec!["CARD-OWNER".into()]),
            )
            .unwrap();
        backend
            .register_user(UserRecord::new("retired", "pw").unwrap().with_enabled(false))
            .unwrap();
        backend
    }

    #[test]
    fn test_credentials_roundtrip_with_colon_in_password() {
        let credentials = BasicCredentials::new("sarah1", "a:b:c");
        let decoded = BasicCredentials::decode(&credentials.encode()).unwrap();

        assert_eq!(decoded, credentials);
        assert!(credentials.header_value().starts_with("Basic "));
    }

    #[test]
    fn test_credentials_decode_rejects_garbage() {
        assert!(matches!(
            BasicCredentials::decode("!!not-base64!!"),
            Err(GateError::InvalidFormat(_))
        ));

        let no_colon = STANDARD.encode("sarah1");
        assert!(matches!(
            BasicCredentials::decode(&no_colon),
            Err(GateError::InvalidFormat(_))
        ));

        let no_user = STANDARD.encode(":abc123");
        assert!(matches!(
            BasicCredentials::decode(&no_user),
            Err(GateError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let rendered = format!("{:?}", BasicCredentials::new("sarah1", "abc123"));
        assert!(!rendered.contains("abc123"));
    }

    #[tokio::test]
    async fn test_handler_accepts_valid_credentials() {
        let handler = BasicHandler::new(directory());
        let token = BasicCredentials::new("sarah1", "abc123").encode();

        let principal = handler.validate(&token).await.unwrap();
        assert_eq!(principal.name, "sarah1");
        assert_eq!(principal.scheme, Scheme::Basic);
        assert!(principal.has_role("CARD-OWNER"));
    }

    #[tokio::test]
    async fn test_handler_rejects_wrong_password() {
        let handler = BasicHandler::new(directory());
        let token = BasicCredentials::new("sarah1", "wrong").encode();

        let result = handler.validate(&token).await;
        assert!(matches!(result, Err(GateError::BadPassword)));
    }

    #[tokio::test]
    async fn test_handler_rejects_unknown_user() {
        let handler = BasicHandler::new(directory());
        let token = BasicCredentials::new("abdo", "abc123").encode();

        let result = handler.validate(&token).await;
        assert!(matches!(result, Err(GateError::UnknownUser)));
    }

    #[tokio::test]
    async fn test_handler_rejects_disabled_user() {
        let handler = BasicHandler::new(directory());
        let token = BasicCredentials::new("retired", "pw").encode();

        let result = handler.validate(&token).await;
        assert!(matches!(result, Err(GateError::Disabled)));
    }

    #[tokio::test]
    async fn test_directory_from_json() {
        let backend = InMemoryUserBackend::from_json(
            r#"[
                {"username": "kumar2", "password": "xyz789", "roles": ["CARD-OWNER"]},
                {"username": "mo1", "password": "asdf123"}
            ]"#,
        )
        .unwrap();

        let mut users = backend.list_users();
        users.sort();
        assert_eq!(users, vec!["kumar2", "mo1"]);

        let mo1 = backend.find_user("mo1").await.unwrap().unwrap();
        assert!(mo1.roles.is_empty());
        assert!(mo1.enabled);
        assert!(mo1.verify_password("asdf123"));
    }

    #[test]
    fn test_directory_rejects_bad_usernames() {
        let result = InMemoryUserBackend::from_json(r#"[{"username": "a:b", "password": "x"}]"#);
        assert!(matches!(result, Err(GateError::InvalidUser(_))));

        let result = InMemoryUserBackend::from_json(r#"{"username": "a"}"#);
        assert!(matches!(result, Err(GateError::InvalidUser(_))));
    }

    #[test]
    fn test_password_stored_as_salted_argon2id() {
        let sarah = UserRecord::new("sarah1", "abc123").unwrap();
        let kumar = UserRecord::new("kumar2", "abc123").unwrap();

        assert!(sarah.password_hash.starts_with("$argon2id$"));
        assert!(!sarah.password_hash.contains("abc123"));
        assert_ne!(sarah.password_hash, kumar.password_hash);

        assert!(sarah.verify_password("abc123"));
        assert!(kumar.verify_password("abc123"));
        assert!(!sarah.verify_password("abc124"));
    }

    #[test]
    fn test_debug_omits_password_hash() {
        let record = UserRecord::new("sarah1", "abc123").unwrap();
        assert!(!format!("{:?}", record).contains("argon2"));
    }

    #[test]
    fn test_decoy_hash_is_verifiable() {
        let decoy = decoy_hash().unwrap();

        assert!(PasswordHash::new(decoy).is_ok());
        assert!(!verify_hash("abc123", decoy));
        assert_eq!(decoy_hash(), Some(decoy));
    }

    #[test]
    fn test_malformed_stored_hash_never_verifies() {
        assert!(!verify_hash("abc123", "abc123"));
        assert!(!verify_hash("", ""));
    }
}
