//! Activity - A timed training item from the catalog
//!
//! Activity is a Value Object: activities with the same ID are the same
//! catalog entry. They describe what a practitioner trains, how long it takes,
//! what it costs and what it yields.

use serde::{Deserialize, Serialize};

/// Unique identifier for an Activity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(String);

impl ActivityId {
    /// Synthetic activity id under which completed plans are recorded
    pub const PLAN: &'static str = "plan";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id used when crediting a completed plan
    pub fn plan() -> Self {
        Self::new(Self::PLAN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ActivityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Broad family an activity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Discipline {
    /// Technique, forms, sensitivity drills, weapons
    Skill,
    /// Warm-ups, strength and endurance work
    Conditioning,
}

impl core::fmt::Display for Discipline {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Discipline::Skill => write!(f, "skill"),
            Discipline::Conditioning => write!(f, "conditioning"),
        }
    }
}

/// A catalog activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub discipline: Discipline,
    /// Catalog grouping such as "Forms" or "Warm-up & Mobility"
    #[serde(default)]
    pub group: String,
    /// XP credited when the activity is completed on its own
    #[serde(default)]
    pub xp_yield: u64,
    pub duration_seconds: u32,
    #[serde(default)]
    pub stamina_cost: u32,
    /// Lowest rank level allowed to train this activity
    #[serde(default)]
    pub required_rank: u32,
}

impl Activity {
    pub fn new(id: impl Into<String>, title: impl Into<String>, discipline: Discipline) -> Self {
        Self {
            id: ActivityId::new(id),
            title: title.into(),
            description: String::new(),
            discipline,
            group: String::new(),
            xp_yield: 0,
            duration_seconds: 0,
            stamina_cost: 0,
            required_rank: 0,
        }
    }

    /// Builder: set XP, duration and stamina cost
    pub fn with_reward(mut self, xp_yield: u64, duration_seconds: u32, stamina_cost: u32) -> Self {
        self.xp_yield = xp_yield;
        self.duration_seconds = duration_seconds;
        self.stamina_cost = stamina_cost;
        self
    }

    /// Builder: gate behind a rank
    pub fn with_required_rank(mut self, level: u32) -> Self {
        self.required_rank = level;
        self
    }

    /// Builder: set the catalog group
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Whether a practitioner holding `rank_level` may train this
    pub fn is_unlocked_at(&self, rank_level: u32) -> bool {
        self.required_rank <= rank_level
    }
}
