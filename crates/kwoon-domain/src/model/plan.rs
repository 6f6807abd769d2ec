//! Plan - An ordered, phased sequence of timed activities
//!
//! A plan is walked phase by phase (warm-up, main, cool-down) and item by
//! item. Empty phases are allowed and are skipped when walking.

use serde::{Deserialize, Serialize};

use super::activity::ActivityId;

/// Unique identifier for a Plan
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(String);

impl PlanId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for PlanId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which part of the session a phase is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    WarmUp,
    Main,
    CoolDown,
}

impl core::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PhaseKind::WarmUp => write!(f, "warm-up"),
            PhaseKind::Main => write!(f, "main"),
            PhaseKind::CoolDown => write!(f, "cool-down"),
        }
    }
}

/// Recommended-plan families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlanCategory {
    Conditioning,
    Skill,
    Mix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// One timed step of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    pub activity_id: ActivityId,
    pub duration_seconds: u32,
}

impl PlanItem {
    pub fn new(activity_id: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            activity_id: ActivityId::new(activity_id),
            duration_seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub kind: PhaseKind,
    #[serde(default)]
    pub items: Vec<PlanItem>,
}

impl Phase {
    pub fn new(kind: PhaseKind, items: Vec<PlanItem>) -> Self {
        Self { kind, items }
    }
}

/// Location of an item inside a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanPosition {
    pub phase: usize,
    pub item: usize,
}

/// A plan template, either from the catalog or authored by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTemplate {
    pub id: PlanId,
    pub name: String,
    /// `None` for user-authored plans
    #[serde(default)]
    pub category: Option<PlanCategory>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub phases: Vec<Phase>,
    /// XP credited once when the whole plan completes
    #[serde(default)]
    pub xp_reward: u64,
    /// Stamina paid up front when the plan starts
    #[serde(default)]
    pub stamina_cost: u32,
}

impl PlanTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PlanId::new(id),
            name: name.into(),
            category: None,
            difficulty: None,
            phases: Vec::new(),
            xp_reward: 0,
            stamina_cost: 0,
        }
    }

    /// Builder: append a phase
    pub fn with_phase(mut self, kind: PhaseKind, items: Vec<PlanItem>) -> Self {
        self.phases.push(Phase::new(kind, items));
        self
    }

    /// Builder: set reward and cost
    pub fn with_reward(mut self, xp_reward: u64, stamina_cost: u32) -> Self {
        self.xp_reward = xp_reward;
        self.stamina_cost = stamina_cost;
        self
    }

    /// Builder: classify as a recommended plan
    pub fn with_classification(mut self, category: PlanCategory, difficulty: Difficulty) -> Self {
        self.category = Some(category);
        self.difficulty = Some(difficulty);
        self
    }

    pub fn total_items(&self) -> usize {
        self.phases.iter().map(|p| p.items.len()).sum()
    }

    pub fn total_duration_seconds(&self) -> u64 {
        self.phases
            .iter()
            .flat_map(|p| p.items.iter())
            .map(|i| u64::from(i.duration_seconds))
            .sum()
    }

    /// Every activity referenced by the plan, in walking order
    pub fn activity_ids(&self) -> impl Iterator<Item = &ActivityId> {
        self.phases
            .iter()
            .flat_map(|p| p.items.iter())
            .map(|i| &i.activity_id)
    }

    pub fn item(&self, position: PlanPosition) -> Option<&PlanItem> {
        self.phases
            .get(position.phase)
            .and_then(|p| p.items.get(position.item))
    }

    /// First item of the first non-empty phase
    pub fn first_position(&self) -> Option<PlanPosition> {
        self.first_item_from_phase(0)
    }

    /// The item after `position`, crossing into later non-empty phases
    pub fn next_position(&self, position: PlanPosition) -> Option<PlanPosition> {
        let phase = self.phases.get(position.phase)?;
        if position.item + 1 < phase.items.len() {
            return Some(PlanPosition {
                phase: position.phase,
                item: position.item + 1,
            });
        }
        self.first_item_from_phase(position.phase + 1)
    }

    fn first_item_from_phase(&self, start: usize) -> Option<PlanPosition> {
        self.phases
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, p)| !p.items.is_empty())
            .map(|(phase, _)| PlanPosition { phase, item: 0 })
    }
}
