//! Catalog - Read-only content the engine works against
//!
//! The catalog holds the rank ladder, activities, plans, achievements,
//! themes and avatars. It is built once from a [`CatalogDocument`] and
//! validated as a whole; a catalog value is always internally consistent.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::achievement::Achievement;
use super::activity::{Activity, ActivityId};
use super::plan::{Difficulty, PlanCategory, PlanTemplate};
use super::profile::Profile;
use super::rank::RankLadder;
use crate::error::{CatalogError, EngineError};

/// A selectable avatar, gated by rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Avatar {
    pub id: String,
    #[serde(default)]
    pub required_rank: u32,
}

/// Raw catalog shape as read from YAML or JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    pub ranks: RankLadder,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub plans: Vec<PlanTemplate>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub avatars: Vec<Avatar>,
}

/// Validated catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogDocument", into = "CatalogDocument")]
pub struct Catalog {
    ladder: RankLadder,
    activities: Vec<Activity>,
    plans: Vec<PlanTemplate>,
    achievements: Vec<Achievement>,
    themes: Vec<String>,
    avatars: Vec<Avatar>,
    activity_index: HashMap<ActivityId, usize>,
}

impl Catalog {
    pub fn new(document: CatalogDocument) -> Result<Self, CatalogError> {
        let CatalogDocument {
            ranks,
            activities,
            plans,
            achievements,
            mut themes,
            avatars,
        } = document;

        let mut activity_index = HashMap::with_capacity(activities.len());
        for (index, activity) in activities.iter().enumerate() {
            if activity.id.as_str() == ActivityId::PLAN {
                return Err(CatalogError::ReservedActivityId {
                    id: activity.id.to_string(),
                });
            }
            if activity_index.insert(activity.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateActivity {
                    id: activity.id.to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        for plan in &plans {
            if !seen.insert(plan.id.as_str()) {
                return Err(CatalogError::DuplicatePlan {
                    id: plan.id.to_string(),
                });
            }
            check_plan(plan, &activity_index).map_err(|reason| CatalogError::InvalidPlan {
                plan: plan.id.to_string(),
                reason,
            })?;
        }

        let mut seen = HashSet::new();
        for achievement in &achievements {
            if !seen.insert(achievement.key.as_str()) {
                return Err(CatalogError::DuplicateAchievement {
                    key: achievement.key.clone(),
                });
            }
            if let Some(activity) = achievement.rule.activity() {
                if !activity_index.contains_key(activity) {
                    return Err(CatalogError::UnknownAchievementActivity {
                        key: achievement.key.clone(),
                        activity: activity.to_string(),
                    });
                }
            }
        }

        let mut seen = HashSet::new();
        for avatar in &avatars {
            if !seen.insert(avatar.id.as_str()) {
                return Err(CatalogError::DuplicateAvatar {
                    id: avatar.id.clone(),
                });
            }
        }

        if !themes.iter().any(|t| t == Profile::DEFAULT_THEME) {
            themes.insert(0, Profile::DEFAULT_THEME.to_string());
        }
        let mut seen = HashSet::new();
        themes.retain(|t| seen.insert(t.clone()));

        Ok(Self {
            ladder: ranks,
            activities,
            plans,
            achievements,
            themes,
            avatars,
            activity_index,
        })
    }

    pub fn ladder(&self) -> &RankLadder {
        &self.ladder
    }

    // ========== Activities ==========

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn activity(&self, id: &ActivityId) -> Option<&Activity> {
        self.activity_index.get(id).map(|&i| &self.activities[i])
    }

    /// Activities a practitioner holding `rank_level` may train
    pub fn eligible_activities(&self, rank_level: u32) -> Vec<&Activity> {
        self.activities
            .iter()
            .filter(|a| a.is_unlocked_at(rank_level))
            .collect()
    }

    // ========== Plans ==========

    pub fn plans(&self) -> &[PlanTemplate] {
        &self.plans
    }

    pub fn plan(&self, id: &str) -> Option<&PlanTemplate> {
        self.plans.iter().find(|p| p.id.as_str() == id)
    }

    pub fn plans_for(
        &self,
        category: PlanCategory,
        difficulty: Difficulty,
    ) -> impl Iterator<Item = &PlanTemplate> {
        self.plans
            .iter()
            .filter(move |p| p.category == Some(category) && p.difficulty == Some(difficulty))
    }

    /// Check that a plan is walkable against this catalog
    pub fn validate_plan(&self, plan: &PlanTemplate) -> Result<(), EngineError> {
        check_plan(plan, &self.activity_index).map_err(|reason| EngineError::InvalidPlan { reason })
    }

    // ========== Achievements ==========

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn achievement(&self, key: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.key == key)
    }

    // ========== Presentation ==========

    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes.iter().any(|t| t == theme)
    }

    pub fn avatars(&self) -> &[Avatar] {
        &self.avatars
    }

    pub fn avatar(&self, id: &str) -> Option<&Avatar> {
        self.avatars.iter().find(|a| a.id == id)
    }

    pub fn unlocked_avatars(&self, rank_level: u32) -> impl Iterator<Item = &Avatar> {
        self.avatars
            .iter()
            .filter(move |a| a.required_rank <= rank_level)
    }
}

fn check_plan(plan: &PlanTemplate, index: &HashMap<ActivityId, usize>) -> Result<(), String> {
    if plan.total_items() == 0 {
        return Err("plan has no items".to_string());
    }
    if let Some(unknown) = plan.activity_ids().find(|id| !index.contains_key(*id)) {
        return Err(format!("unknown activity '{}'", unknown));
    }
    Ok(())
}

impl TryFrom<CatalogDocument> for Catalog {
    type Error = CatalogError;

    fn try_from(document: CatalogDocument) -> Result<Self, Self::Error> {
        Self::new(document)
    }
}

impl From<Catalog> for CatalogDocument {
    fn from(catalog: Catalog) -> Self {
        Self {
            ranks: catalog.ladder,
            activities: catalog.activities,
            plans: catalog.plans,
            achievements: catalog.achievements,
            themes: catalog.themes,
            avatars: catalog.avatars,
        }
    }
}
