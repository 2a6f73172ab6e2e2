//! Account directory behind a pluggable trait.
//!
//! Default: `InMemoryAuthProvider` (process-local, plaintext, simulated latency).
//! A network-backed directory implements `AuthProvider` and replaces it in `main`;
//! the state store only ever sees the trait object.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::User;

pub use self::memory::InMemoryAuthProvider;

/// Internal detail of an auth failure. Callers surface every variant the same way.
#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Email or password does not match")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    AlreadyRegistered,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError>;

    async fn register(&self, email: &str, password: &str, name: &str) -> Result<User, AuthError>;
}
