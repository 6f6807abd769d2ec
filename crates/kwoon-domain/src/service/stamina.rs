//! Stamina Regulator - Time-based regeneration and spending
//!
//! Regeneration is computed lazily from the stored last-update timestamp.
//! Only whole intervals are credited and the timestamp advances by exactly
//! the credited minutes, so the remainder carries over to the next call.

use chrono::{DateTime, Duration, Utc};

use crate::error::EngineError;
use crate::event::EngineEvent;
use crate::model::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaminaPolicy {
    pub interval_minutes: u32,
    pub units_per_interval: u32,
}

impl Default for StaminaPolicy {
    fn default() -> Self {
        Self {
            interval_minutes: 5,
            units_per_interval: 1,
        }
    }
}

impl StaminaPolicy {
    pub fn new(interval_minutes: u32, units_per_interval: u32) -> Self {
        Self {
            interval_minutes: interval_minutes.max(1),
            units_per_interval,
        }
    }

    /// Credit regenerated stamina up to `now`
    ///
    /// Returns `None` when less than one interval has elapsed, including
    /// when `now` is before the last update; the profile is then untouched.
    pub fn regenerate(&self, profile: &mut Profile, now: DateTime<Utc>) -> Option<EngineEvent> {
        let elapsed = now.signed_duration_since(profile.last_stamina_update);
        let minutes = elapsed.num_minutes();
        let interval = i64::from(self.interval_minutes.max(1));
        if minutes < interval {
            return None;
        }

        let intervals = minutes / interval;
        profile.last_stamina_update += Duration::minutes(intervals * interval);

        let gained = u64::try_from(intervals)
            .unwrap_or(0)
            .saturating_mul(u64::from(self.units_per_interval));
        let before = profile.stamina;
        profile.stamina = u64::from(before)
            .saturating_add(gained)
            .min(u64::from(profile.max_stamina)) as u32;

        let amount = profile.stamina.saturating_sub(before);
        if amount == 0 {
            return None;
        }
        Some(EngineEvent::StaminaRegenerated {
            amount,
            stamina: profile.stamina,
        })
    }

    pub fn ensure_available(&self, profile: &Profile, amount: u32) -> Result<(), EngineError> {
        if amount > profile.stamina {
            return Err(EngineError::InsufficientResource {
                required: amount,
                available: profile.stamina,
            });
        }
        Ok(())
    }

    /// Deduct exactly `amount`, or fail without touching the profile
    pub fn spend(&self, profile: &mut Profile, amount: u32) -> Result<EngineEvent, EngineError> {
        self.ensure_available(profile, amount)?;
        profile.stamina -= amount;
        Ok(EngineEvent::StaminaSpent {
            amount,
            stamina: profile.stamina,
        })
    }
}
