//! Achievement Evaluator
//!
//! Checks every catalog achievement the profile does not hold yet. Rules
//! are evaluated against the profile as it was before this pass grants
//! anything, so the outcome does not depend on catalog order.

use crate::event::EngineEvent;
use crate::model::catalog::Catalog;
use crate::model::profile::Profile;

pub struct AchievementEvaluator<'a> {
    catalog: &'a Catalog,
}

impl<'a> AchievementEvaluator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Keys whose rule holds but that are not yet granted
    pub fn pending(&self, profile: &Profile) -> Vec<&'a str> {
        self.catalog
            .achievements()
            .iter()
            .filter(|a| !profile.has_achievement(&a.key))
            .filter(|a| a.rule.is_satisfied(profile))
            .map(|a| a.key.as_str())
            .collect()
    }

    /// Grant every pending achievement, returning one event per new key
    pub fn evaluate(&self, profile: &mut Profile) -> Vec<EngineEvent> {
        self.pending(profile)
            .into_iter()
            .filter(|key| profile.grant_achievement(key))
            .map(|key| EngineEvent::AchievementUnlocked {
                key: key.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::activity::ActivityId;
    use crate::model::catalog::fixtures::catalog;
    use crate::model::profile::NewProfile;
    use chrono::{TimeZone, Utc};

    fn profile() -> Profile {
        let now = Utc.with_ymd_and_hms(2024, 8, 1, 7, 0, 0).unwrap();
        Profile::create(NewProfile::named("Ana"), 100, now).unwrap()
    }

    #[test]
    fn test_nothing_unlocked_for_fresh_profile() {
        let catalog = catalog();
        let mut p = profile();
        assert!(AchievementEvaluator::new(&catalog).evaluate(&mut p).is_empty());
        assert!(p.achievements().is_empty());
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let catalog = catalog();
        let evaluator = AchievementEvaluator::new(&catalog);
        let mut p = profile();
        p.record_activity(&ActivityId::new("c1"), 60);
        p.streak = 3;

        let first = evaluator.evaluate(&mut p);
        assert_eq!(first.len(), 2);
        assert!(p.has_achievement("first_steps"));
        assert!(p.has_achievement("three_day_streak"));

        let snapshot = p.clone();
        assert!(evaluator.evaluate(&mut p).is_empty());
        assert_eq!(p, snapshot);
    }

    #[test]
    fn test_pending_does_not_mutate() {
        let catalog = catalog();
        let mut p = profile();
        p.record_activity(&ActivityId::plan(), 900);

        let pending = AchievementEvaluator::new(&catalog).pending(&p);
        assert_eq!(pending, vec!["first_steps", "first_plan"]);
        assert!(p.achievements().is_empty());
    }
}
