//! Credential handlers for the supported authentication schemes

pub mod basic;

pub use basic::{
    BasicCredentials, BasicHandler, InMemoryUserBackend, UserBackend, UserRecord, UserSpec,
};
