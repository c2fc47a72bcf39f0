//! Authorization Gate
//!
//! The gate turns the `Authorization` header of an incoming request into an
//! authenticated [`Principal`], or rejects it.
//!
//! ## Architecture
//!
//! The gate keeps one credential handler per authentication scheme:
//!
//! - **Basic**: `username:password` checked against a [`UserBackend`]
//!
//! A principal carries its name (stored as the owner of the records it
//! creates) and its roles. Role checks are left to the caller.
//!
//! ## Usage
//!
//! ```ignore
//! use cashcard_gate::{AuthorizationGateBuilder, handlers::*};
//!
//! let users = InMemoryUserBackend::new();
//! users.register_user(
//!     UserRecord::new("sarah1", "abc123")?.with_roles(vec!["CARD-OWNER".into()]),
//! )?;
//!
//! let gate = AuthorizationGateBuilder::new()
//!     .with_handler(BasicHandler::new(users))
//!     .build();
//!
//! let principal = gate.authenticate(Some("Basic c2FyYWgxOmFiYzEyMw==")).await?;
//! println!("Principal: {}", principal.name);
//! ```

pub mod error;
pub mod gate;
pub mod handlers;
pub mod types;

pub use error::{GateError, Result};
pub use gate::{AuthorizationGate, AuthorizationGateBuilder, CredentialHandler, DEFAULT_REALM};
pub use handlers::{
    BasicCredentials, BasicHandler, InMemoryUserBackend, UserBackend, UserRecord, UserSpec,
};
pub use types::{Principal, Scheme};
