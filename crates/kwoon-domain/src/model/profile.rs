//! Profile - The single progression record of a practitioner
//!
//! Profile is an Entity. Its fields are only mutated by the domain services
//! of this crate, which keep the invariants:
//! - `0 <= stamina <= max_stamina`
//! - the cached rank level matches the XP
//! - achievement keys are unique
//! - at most one history entry per calendar date
//!
//! [`ProfileRecord`] is the lenient, all-optional shape used when reading a
//! stored or imported document. It becomes a `Profile` only after
//! [`crate::service::integrity::IntegrityGuard::repair`] fills the gaps.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::activity::ActivityId;
use super::plan::PlanTemplate;
use crate::error::EngineError;

/// XP gained on one calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub xp_gained: u64,
}

/// Per-activity training counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityStats {
    pub count: u32,
    pub total_seconds: u64,
}

/// The featured activity of one calendar date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyChallenge {
    pub date: Option<NaiveDate>,
    /// `None` when nothing was eligible on that date
    pub activity: Option<ActivityId>,
    pub completed: bool,
}

/// "Something new unlocked" markers for the presentation layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewContent {
    pub skill: bool,
    pub belts: bool,
}

/// Input for creating a profile
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProfile {
    pub name: String,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub avatar: Option<String>,
}

impl NewProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: set body metrics
    pub fn with_body(mut self, height_cm: f64, weight_kg: f64) -> Self {
        self.height_cm = Some(height_cm);
        self.weight_kg = Some(weight_kg);
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.name.trim().is_empty() {
            return Err(EngineError::InvalidProfile {
                reason: "name must not be empty".to_string(),
            });
        }
        for (field, value) in [("height", self.height_cm), ("weight", self.weight_kg)] {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(EngineError::InvalidProfile {
                        reason: format!("{} must be a positive number", field),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The progression record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub(crate) name: String,
    pub(crate) height_cm: Option<f64>,
    pub(crate) weight_kg: Option<f64>,
    pub(crate) avatar: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) student_id: String,
    pub(crate) xp: u64,
    pub(crate) unlocked_rank_level: u32,
    pub(crate) achievements: Vec<String>,
    pub(crate) stamina: u32,
    pub(crate) max_stamina: u32,
    pub(crate) last_stamina_update: DateTime<Utc>,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) training_stats: BTreeMap<String, ActivityStats>,
    pub(crate) daily: DailyChallenge,
    pub(crate) streak: u32,
    pub(crate) custom_plans: Vec<PlanTemplate>,
    pub(crate) theme: String,
    pub(crate) new_content: NewContent,
    pub(crate) is_new: bool,
}

impl Profile {
    pub const DEFAULT_THEME: &'static str = "default";
    pub const DEFAULT_NAME: &'static str = "Student";

    /// Create a fresh profile with a full stamina pool
    ///
    /// The rank level starts at 0; callers holding a catalog whose lowest
    /// rank differs should run it through the ledger's rank refresh.
    pub fn create(
        input: NewProfile,
        max_stamina: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, EngineError> {
        input.validate()?;

        Ok(Self {
            name: input.name.trim().to_string(),
            height_cm: input.height_cm,
            weight_kg: input.weight_kg,
            avatar: input.avatar,
            created_at: now,
            student_id: student_id_for(now),
            xp: 0,
            unlocked_rank_level: 0,
            achievements: Vec::new(),
            stamina: max_stamina,
            max_stamina,
            last_stamina_update: now,
            history: Vec::new(),
            training_stats: BTreeMap::new(),
            daily: DailyChallenge::default(),
            streak: 0,
            custom_plans: Vec::new(),
            theme: Self::DEFAULT_THEME.to_string(),
            new_content: NewContent::default(),
            is_new: true,
        })
    }

    // ========== Getters ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn height_cm(&self) -> Option<f64> {
        self.height_cm
    }

    pub fn weight_kg(&self) -> Option<f64> {
        self.weight_kg
    }

    /// Body-mass index rounded to one decimal, when both metrics are known
    pub fn bmi(&self) -> Option<f64> {
        let height_m = self.height_cm? / 100.0;
        let weight = self.weight_kg?;
        if height_m <= 0.0 {
            return None;
        }
        Some((weight / (height_m * height_m) * 10.0).round() / 10.0)
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    /// Cached rank level, always equal to the ladder's rank for `xp`
    pub fn rank_level(&self) -> u32 {
        self.unlocked_rank_level
    }

    pub fn achievements(&self) -> &[String] {
        &self.achievements
    }

    pub fn has_achievement(&self, key: &str) -> bool {
        self.achievements.iter().any(|a| a == key)
    }

    pub fn stamina(&self) -> u32 {
        self.stamina
    }

    pub fn max_stamina(&self) -> u32 {
        self.max_stamina
    }

    pub fn last_stamina_update(&self) -> DateTime<Utc> {
        self.last_stamina_update
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn xp_on(&self, date: NaiveDate) -> u64 {
        self.history
            .iter()
            .find(|h| h.date == date)
            .map(|h| h.xp_gained)
            .unwrap_or(0)
    }

    pub fn training_stats(&self) -> &BTreeMap<String, ActivityStats> {
        &self.training_stats
    }

    pub fn activity_stats(&self, activity: &ActivityId) -> ActivityStats {
        self.training_stats
            .get(activity.as_str())
            .copied()
            .unwrap_or_default()
    }

    /// Seconds trained across every activity and plan
    pub fn total_training_seconds(&self) -> u64 {
        self.training_stats.values().map(|s| s.total_seconds).sum()
    }

    pub fn daily(&self) -> &DailyChallenge {
        &self.daily
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn custom_plans(&self) -> &[PlanTemplate] {
        &self.custom_plans
    }

    pub fn custom_plan(&self, id: &str) -> Option<&PlanTemplate> {
        self.custom_plans.iter().find(|p| p.id.as_str() == id)
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn new_content(&self) -> NewContent {
        self.new_content
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    // ========== Preference Mutations ==========
    //
    // These carry presentation state; validation against the catalog
    // (known theme, avatar unlocked) is the caller's job.

    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.theme = theme.into();
    }

    pub fn set_avatar(&mut self, avatar: impl Into<String>) {
        self.avatar = Some(avatar.into());
    }

    pub fn update_details(&mut self, input: NewProfile) -> Result<(), EngineError> {
        input.validate()?;
        self.name = input.name.trim().to_string();
        self.height_cm = input.height_cm;
        self.weight_kg = input.weight_kg;
        if input.avatar.is_some() {
            self.avatar = input.avatar;
        }
        Ok(())
    }

    pub fn acknowledge_new_content(&mut self) {
        self.new_content = NewContent::default();
    }

    /// Clear the first-run flag
    pub fn mark_onboarded(&mut self) {
        self.is_new = false;
    }

    /// Add or replace a user-authored plan by id
    pub fn upsert_custom_plan(&mut self, plan: PlanTemplate) {
        match self.custom_plans.iter_mut().find(|p| p.id == plan.id) {
            Some(existing) => *existing = plan,
            None => self.custom_plans.push(plan),
        }
    }

    pub fn remove_custom_plan(&mut self, id: &str) -> Option<PlanTemplate> {
        let index = self.custom_plans.iter().position(|p| p.id.as_str() == id)?;
        Some(self.custom_plans.remove(index))
    }

    // ========== Crate-internal Mutations ==========

    /// Add a key unless already present. Returns whether it was added.
    pub(crate) fn grant_achievement(&mut self, key: &str) -> bool {
        if self.has_achievement(key) {
            return false;
        }
        self.achievements.push(key.to_string());
        true
    }

    /// Merge XP into the entry for `date`, appending one if needed
    pub(crate) fn record_history(&mut self, date: NaiveDate, xp: u64) {
        match self.history.iter_mut().find(|h| h.date == date) {
            Some(entry) => entry.xp_gained = entry.xp_gained.saturating_add(xp),
            None => self.history.push(HistoryEntry {
                date,
                xp_gained: xp,
            }),
        }
    }

    pub(crate) fn record_activity(&mut self, activity: &ActivityId, seconds: u64) {
        let stats = self
            .training_stats
            .entry(activity.as_str().to_string())
            .or_default();
        stats.count = stats.count.saturating_add(1);
        stats.total_seconds = stats.total_seconds.saturating_add(seconds);
    }
}

/// `WC-` followed by the creation time in milliseconds, upper-case base 36
pub fn student_id_for(created_at: DateTime<Utc>) -> String {
    let millis = u64::try_from(created_at.timestamp_millis()).unwrap_or(0);
    format!("WC-{}", to_base36(millis))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Lenient shape of a stored or imported profile document
///
/// Every field is optional so older records and partial imports can be read.
/// Field aliases accept the documents written by the first version of the
/// tracker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRecord {
    pub name: Option<String>,
    #[serde(alias = "altura")]
    pub height_cm: Option<f64>,
    #[serde(alias = "peso")]
    pub weight_kg: Option<f64>,
    pub avatar: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub student_id: Option<String>,
    pub xp: Option<u64>,
    #[serde(alias = "unlockedBeltLevel")]
    pub unlocked_rank_level: Option<u32>,
    pub achievements: Option<Vec<String>>,
    pub stamina: Option<u32>,
    pub max_stamina: Option<u32>,
    pub last_stamina_update: Option<DateTime<Utc>>,
    pub history: Option<Vec<HistoryEntry>>,
    pub training_stats: Option<BTreeMap<String, ActivityStats>>,
    pub daily: Option<DailyChallenge>,
    pub streak: Option<u32>,
    pub custom_plans: Option<Vec<PlanTemplate>>,
    pub theme: Option<String>,
    pub new_content: Option<NewContent>,
    pub is_new: Option<bool>,
}

impl ProfileRecord {
    /// Validate an externally supplied document
    ///
    /// The document must be an object with a non-negative integer `xp` and a
    /// non-empty string `name`; every other field must have its expected
    /// shape when present.
    pub fn from_import(value: serde_json::Value) -> Result<Self, EngineError> {
        let object = value.as_object().ok_or_else(|| EngineError::InvalidImport {
            reason: "document is not an object".to_string(),
        })?;

        match object.get("xp") {
            Some(xp) if xp.is_u64() => {}
            Some(_) => {
                return Err(EngineError::InvalidImport {
                    reason: "field 'xp' must be a non-negative integer".to_string(),
                })
            }
            None => {
                return Err(EngineError::InvalidImport {
                    reason: "missing field 'xp'".to_string(),
                })
            }
        }

        match object.get("name").and_then(|n| n.as_str()) {
            Some(name) if !name.trim().is_empty() => {}
            _ => {
                return Err(EngineError::InvalidImport {
                    reason: "field 'name' must be a non-empty string".to_string(),
                })
            }
        }

        serde_json::from_value(value).map_err(|e| EngineError::InvalidImport {
            reason: e.to_string(),
        })
    }

    /// Read a previously stored document, dropping fields that do not decode
    ///
    /// Returns `None` only when the root is not an object. The keys that were
    /// dropped are returned alongside the record so the caller can report
    /// them; the integrity guard fills their defaults afterwards.
    pub fn from_stored(value: serde_json::Value) -> Option<(Self, Vec<String>)> {
        let serde_json::Value::Object(object) = value else {
            return None;
        };

        let mut kept = serde_json::Map::new();
        let mut record = Self::default();
        let mut dropped = Vec::new();
        for (key, field) in object {
            kept.insert(key.clone(), field);
            match serde_json::from_value(serde_json::Value::Object(kept.clone())) {
                Ok(decoded) => record = decoded,
                Err(_) => {
                    kept.remove(&key);
                    dropped.push(key);
                }
            }
        }
        Some((record, dropped))
    }
}

impl From<&Profile> for ProfileRecord {
    fn from(profile: &Profile) -> Self {
        Self {
            name: Some(profile.name.clone()),
            height_cm: profile.height_cm,
            weight_kg: profile.weight_kg,
            avatar: profile.avatar.clone(),
            created_at: Some(profile.created_at),
            student_id: Some(profile.student_id.clone()),
            xp: Some(profile.xp),
            unlocked_rank_level: Some(profile.unlocked_rank_level),
            achievements: Some(profile.achievements.clone()),
            stamina: Some(profile.stamina),
            max_stamina: Some(profile.max_stamina),
            last_stamina_update: Some(profile.last_stamina_update),
            history: Some(profile.history.clone()),
            training_stats: Some(profile.training_stats.clone()),
            daily: Some(profile.daily.clone()),
            streak: Some(profile.streak),
            custom_plans: Some(profile.custom_plans.clone()),
            theme: Some(profile.theme.clone()),
            new_content: Some(profile.new_content),
            is_new: Some(profile.is_new),
        }
    }
}
