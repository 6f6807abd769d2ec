//! Domain errors
//!
//! Every rule violation is returned as a value. Nothing in the domain panics
//! on caller input.

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::session::SessionStatus;

/// Errors raised by the progression and session engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Not enough stamina for the requested spend
    #[error("Insufficient stamina: {required} required, {available} available")]
    InsufficientResource { required: u32, available: u32 },

    /// Empty or malformed plan template
    #[error("Invalid plan: {reason}")]
    InvalidPlan { reason: String },

    /// Externally supplied profile failed structural validation
    #[error("Invalid import: {reason}")]
    InvalidImport { reason: String },

    /// Profile input (name, body metrics) is unusable
    #[error("Invalid profile: {reason}")]
    InvalidProfile { reason: String },

    /// XP deltas must be strictly positive
    #[error("XP amount must be greater than zero")]
    InvalidXpAmount,

    /// Operation not allowed in the session's current status
    #[error("Cannot {operation} a session that is {status}")]
    InvalidSessionState {
        operation: &'static str,
        status: SessionStatus,
    },

    /// No completable daily challenge exists for the given date
    #[error("No daily challenge is assigned for {date}")]
    NoDailyChallenge { date: NaiveDate },

    /// Content gated behind a higher rank
    #[error("Requires rank {required}, current rank is {current}")]
    RankLocked { required: u32, current: u32 },
}

/// Errors raised while building a catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Catalog must define at least one rank")]
    NoRanks,

    #[error("Rank level {level} is defined more than once")]
    DuplicateRankLevel { level: u32 },

    #[error("Rank threshold {min_xp} XP is used by more than one rank")]
    DuplicateRankThreshold { min_xp: u64 },

    #[error("Rank level {level} is out of order: levels must increase with their XP thresholds")]
    RankOrder { level: u32 },

    #[error("Activity '{id}' is defined more than once")]
    DuplicateActivity { id: String },

    #[error("Activity id '{id}' is reserved")]
    ReservedActivityId { id: String },

    #[error("Plan '{id}' is defined more than once")]
    DuplicatePlan { id: String },

    #[error("Achievement '{key}' is defined more than once")]
    DuplicateAchievement { key: String },

    #[error("Avatar '{id}' is defined more than once")]
    DuplicateAvatar { id: String },

    #[error("Plan '{plan}' is invalid: {reason}")]
    InvalidPlan { plan: String, reason: String },

    #[error("Achievement '{key}' refers to unknown activity '{activity}'")]
    UnknownAchievementActivity { key: String, activity: String },
}
