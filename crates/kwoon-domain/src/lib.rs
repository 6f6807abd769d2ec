//! # Kwoon Domain Layer
//!
//! The heart of Kwoon: the progression and session engine as pure
//! business logic.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - Entities & Value Objects                      ││
//! │  │  repository/- Trait definitions (not implementations)       ││
//! │  │  service/   - Domain services (ledger, stamina, sessions)   ││
//! │  │  event      - What every operation reports                  ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Golden Rule
//!
//! **This crate performs no I/O.**
//!
//! Time arrives as an explicit `now` or `today`, randomness as a borrowed
//! `rand::Rng`, persistence through the [`ProfileRepository`] port. Nothing
//! here reads a clock, touches a file or writes a log line.

pub mod error;
pub mod event;
pub mod model;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CatalogError, EngineError};
pub use event::EngineEvent;

pub use model::{
    achievement::{Achievement, AchievementRule},
    activity::{Activity, ActivityId, Discipline},
    catalog::{Avatar, Catalog, CatalogDocument},
    plan::{Difficulty, Phase, PhaseKind, PlanCategory, PlanId, PlanItem, PlanTemplate},
    profile::{NewProfile, Profile, ProfileRecord},
    rank::{Rank, RankLadder, RankProgress},
    session::{Session, SessionStatus},
};

pub use repository::profile_repository::{ProfileRepository, RepositoryError};

pub use service::{
    achievements::AchievementEvaluator, daily::DailyChallengeRotator, integrity::IntegrityGuard,
    ledger::ProgressionLedger, session_runner::SessionRunner, stamina::StaminaPolicy,
};
