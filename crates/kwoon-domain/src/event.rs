//! Engine events
//!
//! Every engine operation reports what happened as a list of events. The
//! engine itself never prints or notifies; callers decide what to show.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::activity::ActivityId;
use crate::model::plan::{PhaseKind, PlanId, PlanPosition};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineEvent {
    #[serde(rename_all = "camelCase")]
    XpAwarded {
        amount: u64,
        activity: ActivityId,
        total_xp: u64,
    },
    /// Levels of the previous and new rank
    RankUp { from: u32, to: u32 },
    AchievementUnlocked { key: String },
    StaminaRegenerated { amount: u32, stamina: u32 },
    StaminaSpent { amount: u32, stamina: u32 },
    /// `activity` is `None` when nothing was eligible
    DailyChallengeAssigned {
        date: NaiveDate,
        activity: Option<ActivityId>,
    },
    DailyChallengeCompleted { activity: ActivityId, streak: u32 },
    StreakReset { previous: u32 },
    #[serde(rename_all = "camelCase")]
    SessionStarted { plan: PlanId, stamina_spent: u32 },
    ItemAdvanced { phase: usize, item: usize },
    PhaseAdvanced { phase: usize, kind: PhaseKind },
    SessionPaused,
    SessionResumed,
    SessionAborted { plan: PlanId },
    #[serde(rename_all = "camelCase")]
    PlanCompleted { plan: PlanId, xp_awarded: u64 },
}

impl EngineEvent {
    pub(crate) fn item_advanced(position: PlanPosition) -> Self {
        EngineEvent::ItemAdvanced {
            phase: position.phase,
            item: position.item,
        }
    }
}

impl core::fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EngineEvent::XpAwarded {
                amount, activity, ..
            } => write!(f, "+{} XP ({})", amount, activity),
            EngineEvent::RankUp { from, to } => write!(f, "Rank up: {} -> {}", from, to),
            EngineEvent::AchievementUnlocked { key } => write!(f, "Achievement unlocked: {}", key),
            EngineEvent::StaminaRegenerated { amount, stamina } => {
                write!(f, "Stamina +{} (now {})", amount, stamina)
            }
            EngineEvent::StaminaSpent { amount, stamina } => {
                write!(f, "Stamina -{} (now {})", amount, stamina)
            }
            EngineEvent::DailyChallengeAssigned { date, activity } => match activity {
                Some(activity) => write!(f, "Daily challenge for {}: {}", date, activity),
                None => write!(f, "No daily challenge available for {}", date),
            },
            EngineEvent::DailyChallengeCompleted { activity, streak } => write!(
                f,
                "Daily challenge {} completed (streak {})",
                activity, streak
            ),
            EngineEvent::StreakReset { previous } => {
                write!(f, "Streak of {} days was reset", previous)
            }
            EngineEvent::SessionStarted {
                plan,
                stamina_spent,
            } => write!(f, "Session {} started (stamina -{})", plan, stamina_spent),
            EngineEvent::ItemAdvanced { phase, item } => {
                write!(f, "Next item ({}.{})", phase + 1, item + 1)
            }
            EngineEvent::PhaseAdvanced { kind, .. } => write!(f, "Phase: {}", kind),
            EngineEvent::SessionPaused => write!(f, "Session paused"),
            EngineEvent::SessionResumed => write!(f, "Session resumed"),
            EngineEvent::SessionAborted { plan } => write!(f, "Session {} aborted", plan),
            EngineEvent::PlanCompleted { plan, xp_awarded } => {
                write!(f, "Plan {} completed (+{} XP)", plan, xp_awarded)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = EngineEvent::XpAwarded {
            amount: 100,
            activity: ActivityId::new("c1"),
            total_xp: 2000,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "xpAwarded");
        assert_eq!(value["totalXp"], 2000);
        assert_eq!(value["activity"], "c1");
    }

    #[test]
    fn test_event_display() {
        let event = EngineEvent::RankUp { from: 0, to: 1 };
        assert_eq!(event.to_string(), "Rank up: 0 -> 1");
    }
}
