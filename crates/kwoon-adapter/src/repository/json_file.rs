//! JSON File Repository
//!
//! Stores the profile as a single pretty-printed JSON document. Writes go to
//! a sibling temp file first and are renamed into place, so a crash mid-write
//! never leaves a half-written profile behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use kwoon_domain::model::profile::{Profile, ProfileRecord};
use kwoon_domain::repository::profile_repository::{ProfileRepository, RepositoryError};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonFileProfileRepository {
    path: PathBuf,
}

impl JsonFileProfileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        tmp
    }
}

fn persistence_error(action: &str, path: &Path, e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::PersistenceError {
        message: format!("Failed to {} {}: {}", action, path.display(), e),
    }
}

impl ProfileRepository for JsonFileProfileRepository {
    fn load(&self) -> Result<Option<ProfileRecord>, RepositoryError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(RepositoryError::Corrupted {
                    message: e.to_string(),
                })
            }
            Err(e) => return Err(persistence_error("read", &self.path, e)),
        };

        super::decode_record(&raw, &self.path.display().to_string()).map(Some)
    }

    fn save(&mut self, profile: &Profile) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| persistence_error("create", parent, e))?;
        }

        let data = serde_json::to_vec_pretty(profile)
            .map_err(|e| persistence_error("encode", &self.path, e))?;

        let tmp = self.temp_path();
        fs::write(&tmp, data).map_err(|e| persistence_error("write", &tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| persistence_error("replace", &self.path, e))?;

        debug!(path = %self.path.display(), "Wrote profile");
        Ok(())
    }

    fn discard(&mut self) -> Result<(), RepositoryError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(persistence_error("remove", &self.path, e)),
        }
    }
}
