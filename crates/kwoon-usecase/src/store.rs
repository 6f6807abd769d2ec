//! Profile Store - Loading, saving, importing and exporting the profile
//!
//! Wraps a [`ProfileRepository`] and runs every record it reads through the
//! [`IntegrityGuard`]. A corrupted record fails closed: it is discarded and
//! the store reports that no profile exists.

use chrono::{DateTime, Utc};
use kwoon_domain::{IntegrityGuard, Profile, ProfileRecord, ProfileRepository, RepositoryError};
use tracing::{debug, info, warn};

use crate::error::Result;

pub struct ProfileStore<R> {
    repository: R,
}

impl<R: ProfileRepository> ProfileStore<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Load and repair the stored profile
    pub fn load(
        &mut self,
        guard: &IntegrityGuard<'_>,
        now: DateTime<Utc>,
    ) -> Result<Option<Profile>> {
        match self.repository.load() {
            Ok(Some(record)) => {
                let profile = guard.repair(record, now);
                debug!(student_id = %profile.student_id(), xp = profile.xp(), "Loaded profile");
                Ok(Some(profile))
            }
            Ok(None) => {
                debug!("No stored profile");
                Ok(None)
            }
            Err(RepositoryError::Corrupted { message }) => {
                warn!(error = %message, "Stored profile is corrupted, discarding it");
                if let Err(e) = self.repository.discard() {
                    warn!(error = %e, "Failed to discard corrupted profile");
                }
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&mut self, profile: &Profile) -> Result<()> {
        self.repository.save(profile)?;
        debug!(xp = profile.xp(), stamina = profile.stamina(), "Saved profile");
        Ok(())
    }

    pub fn discard(&mut self) -> Result<()> {
        self.repository.discard()?;
        info!("Discarded stored profile");
        Ok(())
    }

    /// Validate an external document and turn it into a profile
    ///
    /// Nothing is saved here; the caller decides when to replace the
    /// current profile.
    pub fn import(
        &self,
        document: serde_json::Value,
        guard: &IntegrityGuard<'_>,
        now: DateTime<Utc>,
    ) -> Result<Profile> {
        let record = ProfileRecord::from_import(document)?;
        Ok(guard.repair(record, now))
    }

    pub fn export(&self, profile: &Profile) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(profile)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog, now};
    use kwoon_adapter::repository::in_memory::InMemoryProfileRepository;
    use kwoon_domain::{EngineError, NewProfile};
    use serde_json::json;

    use crate::error::DojoError;

    #[test]
    fn test_load_missing_profile() {
        let catalog = catalog();
        let guard = IntegrityGuard::new(&catalog, 100);
        let mut store = ProfileStore::new(InMemoryProfileRepository::new());

        assert!(store.load(&guard, now()).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let catalog = catalog();
        let guard = IntegrityGuard::new(&catalog, 100);
        let mut store = ProfileStore::new(InMemoryProfileRepository::new());
        let profile = Profile::create(NewProfile::named("Ana"), 100, now()).unwrap();

        store.save(&profile).unwrap();
        let loaded = store.load(&guard, now()).unwrap().unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_corrupted_record_is_discarded() {
        let catalog = catalog();
        let guard = IntegrityGuard::new(&catalog, 100);
        let repository = InMemoryProfileRepository::with_raw("{ not json");
        let mut store = ProfileStore::new(repository.clone());

        assert!(store.load(&guard, now()).unwrap().is_none());
        assert!(repository.raw().unwrap().is_none());
    }

    /// Reads corrupted text but refuses to delete it
    struct StuckRepository;

    impl ProfileRepository for StuckRepository {
        fn load(&self) -> std::result::Result<Option<ProfileRecord>, RepositoryError> {
            Err(RepositoryError::Corrupted {
                message: "unexpected end of input".to_string(),
            })
        }

        fn save(&mut self, _profile: &Profile) -> std::result::Result<(), RepositoryError> {
            Ok(())
        }

        fn discard(&mut self) -> std::result::Result<(), RepositoryError> {
            Err(RepositoryError::PersistenceError {
                message: "read-only".to_string(),
            })
        }
    }

    #[test]
    fn test_corrupted_record_without_discard_is_no_profile() {
        let catalog = catalog();
        let guard = IntegrityGuard::new(&catalog, 100);
        let mut store = ProfileStore::new(StuckRepository);

        assert!(store.load(&guard, now()).unwrap().is_none());
    }

    #[test]
    fn test_import_rejects_bad_document() {
        let catalog = catalog();
        let guard = IntegrityGuard::new(&catalog, 100);
        let store = ProfileStore::new(InMemoryProfileRepository::new());

        let result = store.import(json!({ "xp": "abc", "name": "Bob" }), &guard, now());
        assert!(matches!(
            result,
            Err(DojoError::Engine(EngineError::InvalidImport { .. }))
        ));
    }

    #[test]
    fn test_export_is_camel_case_document() {
        let store = ProfileStore::new(InMemoryProfileRepository::new());
        let profile = Profile::create(NewProfile::named("Ana"), 100, now()).unwrap();

        let value = store.export(&profile).unwrap();
        assert_eq!(value["name"], "Ana");
        assert_eq!(value["maxStamina"], 100);
        assert!(value.get("studentId").is_some());
    }
}
