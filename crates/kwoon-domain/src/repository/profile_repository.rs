//! Profile Repository - Abstract persistence for the single profile
//!
//! There is at most one profile per store. The repository hands back the
//! lenient [`ProfileRecord`]; turning it into a valid [`Profile`] is the
//! job of [`crate::service::integrity::IntegrityGuard`].

use thiserror::Error;

use crate::model::profile::{Profile, ProfileRecord};

/// Errors that can occur during repository operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The stored record exists but cannot be read
    #[error("Stored profile is corrupted: {message}")]
    Corrupted { message: String },

    /// Failed to read or write the underlying store
    #[error("Persistence error: {message}")]
    PersistenceError { message: String },
}

/// Profile Repository Trait
///
/// This is a PORT in hexagonal architecture.
/// The domain defines what it needs; adapters provide implementations.
pub trait ProfileRepository {
    /// Read the stored record, `None` when nothing is stored
    fn load(&self) -> Result<Option<ProfileRecord>, RepositoryError>;

    /// Save the profile (create or replace)
    fn save(&mut self, profile: &Profile) -> Result<(), RepositoryError>;

    /// Remove the stored record, if any
    fn discard(&mut self) -> Result<(), RepositoryError>;

    /// Check if a record is stored
    fn exists(&self) -> Result<bool, RepositoryError> {
        Ok(self.load()?.is_some())
    }
}
