//! Use case errors

use kwoon_domain::{EngineError, RepositoryError};
use thiserror::Error;

/// Errors returned by the [`crate::Dojo`] facade
#[derive(Debug, Error)]
pub enum DojoError {
    /// A progression or session rule rejected the operation
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Failed to serialize profile: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No profile exists yet")]
    NoProfile,

    #[error("A profile already exists")]
    ProfileExists,

    #[error("Unknown activity: {id}")]
    UnknownActivity { id: String },

    #[error("Unknown plan: {id}")]
    UnknownPlan { id: String },

    #[error("Unknown theme: {theme}")]
    UnknownTheme { theme: String },

    #[error("Unknown avatar: {id}")]
    UnknownAvatar { id: String },

    #[error("A training session is already in progress")]
    SessionInProgress,

    #[error("No training session")]
    NoSession,
}

pub type Result<T> = std::result::Result<T, DojoError>;
