//! Progression Ledger - XP, history, training counters and rank
//!
//! The ledger is the only place XP enters a profile. Each credit updates the
//! daily history, the per-activity counters and the cached rank together.

use chrono::NaiveDate;

use crate::error::EngineError;
use crate::event::EngineEvent;
use crate::model::activity::{ActivityId, Discipline};
use crate::model::catalog::Catalog;
use crate::model::profile::Profile;
use crate::model::rank::{Rank, RankProgress};
use crate::service::achievements::AchievementEvaluator;

pub struct ProgressionLedger<'a> {
    catalog: &'a Catalog,
}

impl<'a> ProgressionLedger<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Credit `amount` XP earned by `activity` on `today`
    ///
    /// Rejects a zero amount with [`EngineError::InvalidXpAmount`] before
    /// touching the profile. Emits `XpAwarded`, then `RankUp` when the
    /// credit crossed one or more thresholds.
    pub fn apply_xp(
        &self,
        profile: &mut Profile,
        amount: u64,
        activity: &ActivityId,
        duration_seconds: u64,
        today: NaiveDate,
    ) -> Result<Vec<EngineEvent>, EngineError> {
        if amount == 0 {
            return Err(EngineError::InvalidXpAmount);
        }

        profile.xp = profile.xp.saturating_add(amount);
        profile.record_history(today, amount);
        profile.record_activity(activity, duration_seconds);

        let mut events = vec![EngineEvent::XpAwarded {
            amount,
            activity: activity.clone(),
            total_xp: profile.xp,
        }];
        events.extend(self.sync_rank(profile));
        Ok(events)
    }

    /// [`Self::apply_xp`] followed by achievement evaluation
    pub fn award(
        &self,
        profile: &mut Profile,
        amount: u64,
        activity: &ActivityId,
        duration_seconds: u64,
        today: NaiveDate,
    ) -> Result<Vec<EngineEvent>, EngineError> {
        let mut events = self.apply_xp(profile, amount, activity, duration_seconds, today)?;
        events.extend(AchievementEvaluator::new(self.catalog).evaluate(profile));
        Ok(events)
    }

    /// Count a completion that carries no XP
    pub fn record_completion(
        &self,
        profile: &mut Profile,
        activity: &ActivityId,
        duration_seconds: u64,
    ) -> Vec<EngineEvent> {
        profile.record_activity(activity, duration_seconds);
        AchievementEvaluator::new(self.catalog).evaluate(profile)
    }

    /// Bring the cached rank in line with the XP
    ///
    /// Returns `RankUp` when the rank rose. A drop (possible only for
    /// repaired records) is applied silently.
    pub fn sync_rank(&self, profile: &mut Profile) -> Option<EngineEvent> {
        let from = profile.unlocked_rank_level;
        let to = self.catalog.ladder().rank_for_xp(profile.xp).level;
        profile.unlocked_rank_level = to;

        if to <= from {
            return None;
        }

        profile.new_content.belts = true;
        let unlocks_skill = self.catalog.activities().iter().any(|a| {
            a.discipline == Discipline::Skill && a.required_rank > from && a.required_rank <= to
        });
        if unlocks_skill {
            profile.new_content.skill = true;
        }

        Some(EngineEvent::RankUp { from, to })
    }

    pub fn current_rank(&self, profile: &Profile) -> &'a Rank {
        self.catalog.ladder().rank_for_xp(profile.xp())
    }

    pub fn progress(&self, profile: &Profile) -> RankProgress {
        self.catalog.ladder().progress(profile.xp())
    }
}
