//! Persistence gateway: JSON blobs under three fixed keys in a key-value store.
//!
//! The blobs carry no schema version; a format change means deleting the keys.

pub mod memory;
pub mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{Profile, Resume, User};

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

pub const USER_KEY: &str = "fastcv-user";
pub const PROFILE_KEY: &str = "fastcv-profile";
pub const RESUMES_KEY: &str = "fastcv-resumes";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Malformed blob under '{key}': {source}")]
    Serde {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable string-keyed storage. Implement this to move the blobs elsewhere.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed reads and writes of the session records.
#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn KeyValueStore>,
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load_user(&self) -> Result<Option<User>, StorageError> {
        self.read(USER_KEY).await
    }

    pub async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        self.write(USER_KEY, user).await
    }

    pub async fn load_profile(&self) -> Result<Option<Profile>, StorageError> {
        self.read(PROFILE_KEY).await
    }

    pub async fn save_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        self.write(PROFILE_KEY, profile).await
    }

    pub async fn load_resumes(&self) -> Result<Vec<Resume>, StorageError> {
        Ok(self.read(RESUMES_KEY).await?.unwrap_or_default())
    }

    pub async fn save_resumes(&self, resumes: &[Resume]) -> Result<(), StorageError> {
        self.write(RESUMES_KEY, resumes).await
    }

    /// Deletes all three session keys.
    pub async fn clear_session(&self) -> Result<(), StorageError> {
        for key in [USER_KEY, PROFILE_KEY, RESUMES_KEY] {
            self.store.remove(key).await?;
        }
        debug!("Cleared persisted session keys");
        Ok(())
    }

    async fn read<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, StorageError> {
        match self.store.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Serde { key, source }),
            None => Ok(None),
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serde { key, source })?;
        self.store.set(key, raw).await
    }
}
