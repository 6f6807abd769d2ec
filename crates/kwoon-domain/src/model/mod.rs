//! Domain Models - The vocabulary of Kwoon
//!
//! These types represent the "Ubiquitous Language" of the training hall.
//! Catalog content (ranks, activities, plans, achievements) is read-only;
//! the profile and the session are the only mutable entities.

pub mod achievement;
pub mod activity;
pub mod catalog;
pub mod plan;
pub mod profile;
pub mod rank;
pub mod session;
