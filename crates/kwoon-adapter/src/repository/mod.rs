//! Persistence Adapters - Repository implementations
//!
//! These implement the repository traits from kwoon-domain.

pub mod in_memory;
pub mod json_file;

use kwoon_domain::model::profile::ProfileRecord;
use kwoon_domain::repository::profile_repository::RepositoryError;
use tracing::warn;

/// Decode stored profile text
///
/// Only text that is not JSON, or JSON whose root is not an object, counts
/// as corrupted. Fields with the wrong shape are dropped and logged.
fn decode_record(raw: &str, origin: &str) -> Result<ProfileRecord, RepositoryError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| RepositoryError::Corrupted {
            message: format!("{}: {}", origin, e),
        })?;

    let (record, dropped) =
        ProfileRecord::from_stored(value).ok_or_else(|| RepositoryError::Corrupted {
            message: format!("{}: profile is not a JSON object", origin),
        })?;

    if !dropped.is_empty() {
        warn!(origin, fields = ?dropped, "Ignoring unreadable profile fields");
    }
    Ok(record)
}
