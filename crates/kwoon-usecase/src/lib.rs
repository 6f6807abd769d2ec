//! # Kwoon Use Case Layer
//!
//! Application-specific business rules.
//! This layer orchestrates the flow of data between the domain and adapters:
//! it owns the current profile and session, wires the domain services
//! together and persists after every change.

pub mod dojo;
pub mod error;
pub mod store;

pub use kwoon_domain;

pub use dojo::{Dojo, DojoSettings};
pub use error::{DojoError, Result};
pub use store::ProfileStore;
