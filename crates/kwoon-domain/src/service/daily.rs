//! Daily Challenge Rotator
//!
//! One activity is featured per calendar date. Completing it extends the
//! streak; leaving yesterday's challenge open resets it. A day with no
//! record at all (the app was not opened) leaves the streak alone.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::EngineError;
use crate::event::EngineEvent;
use crate::model::catalog::Catalog;
use crate::model::profile::{DailyChallenge, Profile};

pub struct DailyChallengeRotator<'a> {
    catalog: &'a Catalog,
}

impl<'a> DailyChallengeRotator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Assign today's challenge unless one is already stored for today
    pub fn refresh<R: Rng + ?Sized>(
        &self,
        profile: &mut Profile,
        today: NaiveDate,
        rng: &mut R,
    ) -> Vec<EngineEvent> {
        if profile.daily.date == Some(today) {
            return Vec::new();
        }

        let mut events = Vec::new();

        let missed_yesterday = profile.daily.date.is_some()
            && profile.daily.date == today.pred_opt()
            && profile.daily.activity.is_some()
            && !profile.daily.completed;
        if missed_yesterday && profile.streak > 0 {
            events.push(EngineEvent::StreakReset {
                previous: profile.streak,
            });
            profile.streak = 0;
        }

        let choice = self
            .catalog
            .eligible_activities(profile.rank_level())
            .choose(rng)
            .map(|a| a.id.clone());

        profile.daily = DailyChallenge {
            date: Some(today),
            activity: choice.clone(),
            completed: false,
        };
        events.push(EngineEvent::DailyChallengeAssigned {
            date: today,
            activity: choice,
        });
        events
    }

    /// Complete today's challenge
    ///
    /// Fails with [`EngineError::NoDailyChallenge`] when nothing is
    /// assigned for `today`. A second completion the same day is a no-op.
    pub fn mark_completed(
        &self,
        profile: &mut Profile,
        today: NaiveDate,
    ) -> Result<Option<EngineEvent>, EngineError> {
        let activity = match (&profile.daily.date, &profile.daily.activity) {
            (Some(date), Some(activity)) if *date == today => activity.clone(),
            _ => return Err(EngineError::NoDailyChallenge { date: today }),
        };

        if profile.daily.completed {
            return Ok(None);
        }

        profile.daily.completed = true;
        profile.streak = profile.streak.saturating_add(1);
        Ok(Some(EngineEvent::DailyChallengeCompleted {
            activity,
            streak: profile.streak,
        }))
    }
}
