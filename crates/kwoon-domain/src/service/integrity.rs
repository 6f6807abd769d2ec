//! Integrity Guard - Turns a stored or imported record into a valid profile
//!
//! Missing fields get defaults, derived fields are recomputed and any value
//! that would break a profile invariant is corrected:
//! - rank level recomputed from XP
//! - stamina clamped to the pool
//! - history entries sharing a date merged
//! - unknown or repeated achievement keys dropped

use chrono::{DateTime, Utc};

use crate::model::catalog::Catalog;
use crate::model::profile::{student_id_for, HistoryEntry, Profile, ProfileRecord};

pub struct IntegrityGuard<'a> {
    catalog: &'a Catalog,
    max_stamina: u32,
}

impl<'a> IntegrityGuard<'a> {
    pub fn new(catalog: &'a Catalog, max_stamina: u32) -> Self {
        Self {
            catalog,
            max_stamina,
        }
    }

    pub fn repair(&self, record: ProfileRecord, now: DateTime<Utc>) -> Profile {
        let created_at = record.created_at.unwrap_or(now);
        let max_stamina = record.max_stamina.unwrap_or(self.max_stamina);
        let xp = record.xp.unwrap_or(0);

        let name = record
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| Profile::DEFAULT_NAME.to_string());

        let student_id = record
            .student_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| student_id_for(created_at));

        let theme = record
            .theme
            .filter(|t| self.catalog.has_theme(t))
            .unwrap_or_else(|| Profile::DEFAULT_THEME.to_string());

        let mut achievements: Vec<String> = Vec::new();
        for key in record.achievements.unwrap_or_default() {
            if self.catalog.achievement(&key).is_some() && !achievements.contains(&key) {
                achievements.push(key);
            }
        }

        let mut history: Vec<HistoryEntry> = Vec::new();
        for entry in record.history.unwrap_or_default() {
            match history.iter_mut().find(|h| h.date == entry.date) {
                Some(existing) => {
                    existing.xp_gained = existing.xp_gained.saturating_add(entry.xp_gained)
                }
                None => history.push(entry),
            }
        }

        Profile {
            name,
            height_cm: record.height_cm.filter(|h| h.is_finite() && *h > 0.0),
            weight_kg: record.weight_kg.filter(|w| w.is_finite() && *w > 0.0),
            avatar: record.avatar,
            created_at,
            student_id,
            xp,
            unlocked_rank_level: self.catalog.ladder().rank_for_xp(xp).level,
            achievements,
            stamina: record.stamina.unwrap_or(max_stamina).min(max_stamina),
            max_stamina,
            last_stamina_update: record.last_stamina_update.unwrap_or(now),
            history,
            training_stats: record.training_stats.unwrap_or_default(),
            daily: record.daily.unwrap_or_default(),
            streak: record.streak.unwrap_or(0),
            custom_plans: record.custom_plans.unwrap_or_default(),
            theme,
            new_content: record.new_content.unwrap_or_default(),
            is_new: record.is_new.unwrap_or(false),
        }
    }

    /// Set the cached rank from XP without reporting a rank-up
    ///
    /// Used for freshly created profiles, whose starting rank is the
    /// catalog's lowest rather than an unlock.
    pub fn align_rank(&self, profile: &mut Profile) {
        profile.unlocked_rank_level = self.catalog.ladder().rank_for_xp(profile.xp).level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::fixtures::catalog;
    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 1, 10, 0, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
    }

    #[test]
    fn test_repair_empty_record_fills_defaults() {
        let catalog = catalog();
        let profile = IntegrityGuard::new(&catalog, 100).repair(ProfileRecord::default(), now());

        assert_eq!(profile.name(), "Student");
        assert_eq!(profile.xp(), 0);
        assert_eq!(profile.rank_level(), 0);
        assert_eq!(profile.stamina(), 100);
        assert_eq!(profile.last_stamina_update(), now());
        assert_eq!(profile.created_at(), now());
        assert_eq!(profile.student_id(), student_id_for(now()));
        assert_eq!(profile.theme(), "default");
        assert!(profile.achievements().is_empty());
    }

    #[test]
    fn test_repair_recomputes_rank_from_xp() {
        let catalog = catalog();
        let record = ProfileRecord {
            xp: Some(2500),
            unlocked_rank_level: Some(0),
            ..ProfileRecord::default()
        };

        let profile = IntegrityGuard::new(&catalog, 100).repair(record, now());
        assert_eq!(profile.rank_level(), 1);
    }

    #[test]
    fn test_repair_clamps_and_cleans() {
        let catalog = catalog();
        let record: ProfileRecord = serde_json::from_value(json!({
            "name": "Bob",
            "xp": 10,
            "stamina": 250,
            "maxStamina": 100,
            "theme": "neon",
            "achievements": ["first_steps", "bogus", "first_steps"],
            "history": [
                { "date": "2024-10-01", "xpGained": 10 },
                { "date": "2024-10-02", "xpGained": 5 },
                { "date": "2024-10-01", "xpGained": 20 }
            ]
        }))
        .unwrap();

        let profile = IntegrityGuard::new(&catalog, 100).repair(record, now());

        assert_eq!(profile.stamina(), 100);
        assert_eq!(profile.theme(), "default");
        assert_eq!(profile.achievements(), ["first_steps".to_string()]);
        assert_eq!(profile.history().len(), 2);
        assert_eq!(profile.xp_on(day(1)), 30);
        assert_eq!(profile.history()[1].date, day(2));
    }

    #[test]
    fn test_repair_keeps_valid_record() {
        let catalog = catalog();
        let guard = IntegrityGuard::new(&catalog, 100);
        let original = guard.repair(
            ProfileRecord {
                name: Some("Ana".to_string()),
                xp: Some(6100),
                theme: Some("forest".to_string()),
                stamina: Some(30),
                ..ProfileRecord::default()
            },
            now(),
        );

        let repaired = guard.repair(ProfileRecord::from(&original), now());
        assert_eq!(repaired, original);
        assert_eq!(repaired.theme(), "forest");
        assert_eq!(repaired.rank_level(), 2);
    }

    #[test]
    fn test_align_rank_for_ladder_not_starting_at_zero() {
        let mut doc = crate::model::catalog::fixtures::document();
        doc.ranks = crate::model::rank::RankLadder::new(vec![
            crate::model::rank::Rank::new(1, "Novice", 0),
            crate::model::rank::Rank::new(2, "Adept", 500),
        ])
        .unwrap();
        doc.activities.iter_mut().for_each(|a| a.required_rank = 1);
        let catalog = Catalog::new(doc).unwrap();

        let mut profile = Profile::create(
            crate::model::profile::NewProfile::named("Ana"),
            100,
            now(),
        )
        .unwrap();
        IntegrityGuard::new(&catalog, 100).align_rank(&mut profile);
        assert_eq!(profile.rank_level(), 1);
    }
}
