//! Achievement - A one-time unlockable milestone
//!
//! Achievements are data: each one carries a rule evaluated against the
//! profile. Rules only read the profile, so evaluation is order-independent.

use serde::{Deserialize, Serialize};

use super::activity::ActivityId;
use super::profile::Profile;

/// Condition under which an achievement unlocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AchievementRule {
    /// Any activity or plan has been completed
    FirstTraining,
    XpAtLeast { xp: u64 },
    RankAtLeast { level: u32 },
    StreakAtLeast { days: u32 },
    /// A specific activity completed at least `count` times
    ActivityCount { activity: ActivityId, count: u32 },
    PlansCompleted { count: u32 },
    /// Total recorded training time, in minutes
    TrainingMinutes { minutes: u64 },
    /// Distinct calendar dates with XP
    DaysTrained { days: u32 },
}

impl AchievementRule {
    pub fn is_satisfied(&self, profile: &Profile) -> bool {
        match self {
            AchievementRule::FirstTraining => {
                profile.training_stats().values().any(|s| s.count > 0)
            }
            AchievementRule::XpAtLeast { xp } => profile.xp() >= *xp,
            AchievementRule::RankAtLeast { level } => profile.rank_level() >= *level,
            AchievementRule::StreakAtLeast { days } => profile.streak() >= *days,
            AchievementRule::ActivityCount { activity, count } => {
                profile.activity_stats(activity).count >= *count
            }
            AchievementRule::PlansCompleted { count } => {
                profile.activity_stats(&ActivityId::plan()).count >= *count
            }
            AchievementRule::TrainingMinutes { minutes } => {
                profile.total_training_seconds() / 60 >= *minutes
            }
            AchievementRule::DaysTrained { days } => {
                let trained = profile.history().iter().filter(|h| h.xp_gained > 0).count();
                trained >= *days as usize
            }
        }
    }

    /// Activity the rule depends on, if any
    pub fn activity(&self) -> Option<&ActivityId> {
        match self {
            AchievementRule::ActivityCount { activity, .. } => Some(activity),
            _ => None,
        }
    }
}

/// A catalog achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub rule: AchievementRule,
}

impl Achievement {
    pub fn new(key: impl Into<String>, title: impl Into<String>, rule: AchievementRule) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            description: String::new(),
            rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::profile::NewProfile;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn profile() -> Profile {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        Profile::create(NewProfile::named("Ana"), 100, now).unwrap()
    }

    #[test]
    fn test_first_training_needs_a_completion() {
        let mut p = profile();
        assert!(!AchievementRule::FirstTraining.is_satisfied(&p));

        p.record_activity(&ActivityId::new("c1"), 60);
        assert!(AchievementRule::FirstTraining.is_satisfied(&p));
    }

    #[test]
    fn test_activity_count_and_plans() {
        let mut p = profile();
        let rule = AchievementRule::ActivityCount {
            activity: ActivityId::new("wc_siu_nim_tao"),
            count: 2,
        };
        p.record_activity(&ActivityId::new("wc_siu_nim_tao"), 300);
        assert!(!rule.is_satisfied(&p));
        p.record_activity(&ActivityId::new("wc_siu_nim_tao"), 300);
        assert!(rule.is_satisfied(&p));

        let plans = AchievementRule::PlansCompleted { count: 1 };
        assert!(!plans.is_satisfied(&p));
        p.record_activity(&ActivityId::plan(), 900);
        assert!(plans.is_satisfied(&p));
    }

    #[test]
    fn test_training_minutes_and_days() {
        let mut p = profile();
        p.record_activity(&ActivityId::new("c1"), 3599);
        assert!(!AchievementRule::TrainingMinutes { minutes: 60 }.is_satisfied(&p));
        p.record_activity(&ActivityId::new("c1"), 1);
        assert!(AchievementRule::TrainingMinutes { minutes: 60 }.is_satisfied(&p));

        p.record_history(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), 10);
        p.record_history(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), 10);
        assert!(AchievementRule::DaysTrained { days: 2 }.is_satisfied(&p));
        assert!(!AchievementRule::DaysTrained { days: 3 }.is_satisfied(&p));
    }

    #[test]
    fn test_rule_deserializes_from_tagged_map() {
        let json = r#"{"kind":"activityCount","activity":"wc_chi_sao","count":10}"#;
        let rule: AchievementRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.activity().map(|a| a.as_str()), Some("wc_chi_sao"));

        let json = r#"{"kind":"firstTraining"}"#;
        let rule: AchievementRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule, AchievementRule::FirstTraining);
    }
}
