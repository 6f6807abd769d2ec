//! Domain Services - Business logic that doesn't belong to a single entity
//!
//! Services are stateless apart from a borrowed catalog or policy. They
//! mutate the profile they are handed and report what happened as
//! [`crate::event::EngineEvent`]s. Every precondition is checked before the
//! first mutation, so a rejected call leaves the profile unchanged.

pub mod achievements;
pub mod daily;
pub mod integrity;
pub mod ledger;
pub mod session_runner;
pub mod stamina;
