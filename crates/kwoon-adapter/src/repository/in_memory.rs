//! In-Memory Repository Implementation
//!
//! Keeps the profile as the same JSON text the file repository writes, so
//! decoding (and corruption handling) behaves identically. Useful for
//! testing and demos.

use std::sync::{Arc, RwLock};

use kwoon_domain::model::profile::{Profile, ProfileRecord};
use kwoon_domain::repository::profile_repository::{ProfileRepository, RepositoryError};

/// In-memory Profile Repository
///
/// Thread-safe implementation using RwLock. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileRepository {
    slot: Arc<RwLock<Option<String>>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(RwLock::new(None)),
        }
    }

    /// Start with raw stored text, valid or not
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(raw.into()))),
        }
    }

    /// The stored text, if any
    pub fn raw(&self) -> Result<Option<String>, RepositoryError> {
        let slot = self.slot.read().map_err(|_| RepositoryError::PersistenceError {
            message: "Failed to acquire read lock".to_string(),
        })?;
        Ok(slot.clone())
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn load(&self) -> Result<Option<ProfileRecord>, RepositoryError> {
        let slot = self.slot.read().map_err(|_| RepositoryError::PersistenceError {
            message: "Failed to acquire read lock".to_string(),
        })?;

        match slot.as_deref() {
            Some(raw) => super::decode_record(raw, "memory").map(Some),
            None => Ok(None),
        }
    }

    fn save(&mut self, profile: &Profile) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(profile).map_err(|e| RepositoryError::PersistenceError {
            message: e.to_string(),
        })?;
        let mut slot = self.slot.write().map_err(|_| RepositoryError::PersistenceError {
            message: "Failed to acquire write lock".to_string(),
        })?;
        *slot = Some(raw);
        Ok(())
    }

    fn discard(&mut self) -> Result<(), RepositoryError> {
        let mut slot = self.slot.write().map_err(|_| RepositoryError::PersistenceError {
            message: "Failed to acquire write lock".to_string(),
        })?;
        *slot = None;
        Ok(())
    }
}
