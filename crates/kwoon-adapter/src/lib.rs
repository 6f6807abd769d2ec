//! # Kwoon Adapter Layer
//!
//! Outbound adapters (Hexagonal Architecture).
//!
//! ## Structure
//!
//! - `catalog` - Catalog sources (built-in YAML, user files)
//! - `repository/` - Persistence implementations of `ProfileRepository`

pub mod catalog;
pub mod repository;
