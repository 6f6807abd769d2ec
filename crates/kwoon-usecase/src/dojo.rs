//! Dojo - The training facade
//!
//! The Dojo owns the canonical in-memory profile, the catalog and at most
//! one training session. Every operation:
//! 1. checks its preconditions against the current state
//! 2. runs the domain services
//! 3. persists the profile when it changed
//! 4. returns the events the services emitted
//!
//! Time is always passed in; calendar dates are derived from `now` with the
//! configured UTC offset.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use kwoon_domain::{
    AchievementEvaluator, ActivityId, Catalog, DailyChallengeRotator, EngineError, EngineEvent,
    IntegrityGuard, NewProfile, PlanTemplate, Profile, ProfileRepository, ProgressionLedger,
    RankProgress, Session, SessionRunner, SessionStatus, StaminaPolicy,
};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::{DojoError, Result};
use crate::store::ProfileStore;

/// Tunables the Dojo needs from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DojoSettings {
    pub stamina: StaminaPolicy,
    pub max_stamina: u32,
    /// Offset used to turn instants into calendar dates
    pub utc_offset: FixedOffset,
}

impl Default for DojoSettings {
    fn default() -> Self {
        Self {
            stamina: StaminaPolicy::default(),
            max_stamina: 100,
            utc_offset: Utc.fix(),
        }
    }
}

pub struct Dojo<R, G> {
    store: ProfileStore<R>,
    catalog: Catalog,
    settings: DojoSettings,
    rng: G,
    profile: Option<Profile>,
    session: Option<Session>,
}

impl<R: ProfileRepository, G: Rng> Dojo<R, G> {
    pub fn new(repository: R, catalog: Catalog, settings: DojoSettings, rng: G) -> Self {
        Self {
            store: ProfileStore::new(repository),
            catalog,
            settings,
            rng,
            profile: None,
            session: None,
        }
    }

    // ========== Accessors ==========

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &ProfileStore<R> {
        &self.store
    }

    /// Calendar date of `now` in the configured offset
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.settings.utc_offset).date_naive()
    }

    /// Catalog plans followed by the profile's own plans
    pub fn plans(&self) -> Vec<&PlanTemplate> {
        let custom = self.profile.iter().flat_map(|p| p.custom_plans().iter());
        self.catalog.plans().iter().chain(custom).collect()
    }

    pub fn progress(&self) -> Result<RankProgress> {
        let profile = self.profile.as_ref().ok_or(DojoError::NoProfile)?;
        Ok(ProgressionLedger::new(&self.catalog).progress(profile))
    }

    pub fn export(&self) -> Result<serde_json::Value> {
        let profile = self.profile.as_ref().ok_or(DojoError::NoProfile)?;
        self.store.export(profile)
    }

    // ========== Profile Lifecycle ==========

    /// Load the stored profile and bring it up to date
    pub fn open(&mut self, now: DateTime<Utc>) -> Result<Vec<EngineEvent>> {
        let guard = IntegrityGuard::new(&self.catalog, self.settings.max_stamina);
        self.profile = self.store.load(&guard, now)?;
        self.session = None;

        match &self.profile {
            Some(profile) => info!(name = profile.name(), xp = profile.xp(), "Opened profile"),
            None => return Ok(Vec::new()),
        }
        self.refresh(now)
    }

    pub fn create_profile(
        &mut self,
        input: NewProfile,
        now: DateTime<Utc>,
    ) -> Result<Vec<EngineEvent>> {
        if self.profile.is_some() {
            return Err(DojoError::ProfileExists);
        }
        if let Some(avatar) = &input.avatar {
            self.check_avatar(avatar, self.catalog.ladder().lowest().level)?;
        }

        let mut profile = Profile::create(input, self.settings.max_stamina, now)?;
        IntegrityGuard::new(&self.catalog, self.settings.max_stamina).align_rank(&mut profile);
        info!(
            name = profile.name(),
            student_id = profile.student_id(),
            "Created profile"
        );

        self.store.save(&profile)?;
        self.profile = Some(profile);
        self.refresh(now)
    }

    /// Update name, body metrics and (optionally) avatar
    pub fn update_details(&mut self, input: NewProfile) -> Result<()> {
        let level = self.require_profile()?.rank_level();
        if let Some(avatar) = &input.avatar {
            self.check_avatar(avatar, level)?;
        }

        let profile = self.profile.as_mut().ok_or(DojoError::NoProfile)?;
        profile.update_details(input)?;
        self.store.save(profile)
    }

    /// Discard the profile and any session
    pub fn reset(&mut self) -> Result<()> {
        self.store.discard()?;
        self.profile = None;
        self.session = None;
        warn!("Profile reset");
        Ok(())
    }

    /// Replace the current profile with an imported document
    ///
    /// The current profile is untouched when the document is rejected.
    pub fn import(
        &mut self,
        document: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<Vec<EngineEvent>> {
        if self.session_active() {
            return Err(DojoError::SessionInProgress);
        }

        let guard = IntegrityGuard::new(&self.catalog, self.settings.max_stamina);
        let profile = match self.store.import(document, &guard, now) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "Rejected profile import");
                return Err(e);
            }
        };

        info!(name = profile.name(), xp = profile.xp(), "Imported profile");
        self.store.save(&profile)?;
        self.profile = Some(profile);
        self.session = None;
        self.refresh(now)
    }

    // ========== Progression ==========

    /// Regenerate stamina and rotate the daily challenge
    pub fn refresh(&mut self, now: DateTime<Utc>) -> Result<Vec<EngineEvent>> {
        let today = self.today(now);
        let profile = self.profile.as_mut().ok_or(DojoError::NoProfile)?;

        let mut events = Vec::new();
        events.extend(self.settings.stamina.regenerate(profile, now));
        events.extend(DailyChallengeRotator::new(&self.catalog).refresh(
            profile,
            today,
            &mut self.rng,
        ));

        debug!(events = events.len(), %today, "Refreshed profile");
        self.store.save(profile)?;
        Ok(events)
    }

    /// Complete a standalone activity
    ///
    /// Checks, in order: the activity exists, the rank allows it and the
    /// stamina covers it. Completing today's daily challenge extends the
    /// streak.
    pub fn complete_activity(
        &mut self,
        activity_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<EngineEvent>> {
        let mut events = self.refresh(now)?;
        let today = self.today(now);

        let id = ActivityId::new(activity_id);
        let activity = self
            .catalog
            .activity(&id)
            .ok_or_else(|| DojoError::UnknownActivity {
                id: activity_id.to_string(),
            })?;
        let profile = self.profile.as_mut().ok_or(DojoError::NoProfile)?;

        if !activity.is_unlocked_at(profile.rank_level()) {
            return Err(EngineError::RankLocked {
                required: activity.required_rank,
                current: profile.rank_level(),
            }
            .into());
        }
        self.settings
            .stamina
            .ensure_available(profile, activity.stamina_cost)?;

        events.push(self.settings.stamina.spend(profile, activity.stamina_cost)?);

        let ledger = ProgressionLedger::new(&self.catalog);
        let duration = u64::from(activity.duration_seconds);
        if activity.xp_yield > 0 {
            events.extend(ledger.award(profile, activity.xp_yield, &id, duration, today)?);
        } else {
            events.extend(ledger.record_completion(profile, &id, duration));
        }

        let is_daily = profile.daily().date == Some(today)
            && profile.daily().activity.as_ref() == Some(&id);
        if is_daily {
            let rotator = DailyChallengeRotator::new(&self.catalog);
            events.extend(rotator.mark_completed(profile, today)?);
            events.extend(AchievementEvaluator::new(&self.catalog).evaluate(profile));
        }

        info!(
            activity = %id,
            xp = activity.xp_yield,
            total_xp = profile.xp(),
            "Completed activity"
        );
        self.store.save(profile)?;
        Ok(events)
    }

    // ========== Sessions ==========

    /// Start a catalog or custom plan by id
    pub fn start_plan(&mut self, plan_id: &str, now: DateTime<Utc>) -> Result<Vec<EngineEvent>> {
        if self.session_active() {
            return Err(DojoError::SessionInProgress);
        }
        let mut events = self.refresh(now)?;

        let profile = self.profile.as_mut().ok_or(DojoError::NoProfile)?;
        let plan = self
            .catalog
            .plan(plan_id)
            .or_else(|| profile.custom_plan(plan_id))
            .cloned()
            .ok_or_else(|| DojoError::UnknownPlan {
                id: plan_id.to_string(),
            })?;

        let runner = SessionRunner::new(&self.catalog, self.settings.stamina);
        let (session, started) = runner.start(plan, profile)?;
        events.extend(started);

        info!(plan = %session.plan().id, stamina = profile.stamina(), "Started session");
        self.store.save(profile)?;
        self.session = Some(session);
        Ok(events)
    }

    pub fn tick(&mut self, elapsed_seconds: u64, now: DateTime<Utc>) -> Result<Vec<EngineEvent>> {
        let today = self.today(now);
        let session = self.session.as_mut().ok_or(DojoError::NoSession)?;
        let profile = self.profile.as_mut().ok_or(DojoError::NoProfile)?;

        let runner = SessionRunner::new(&self.catalog, self.settings.stamina);
        let events = runner.tick(session, profile, elapsed_seconds, today)?;

        self.after_step(&events)?;
        Ok(events)
    }

    pub fn skip(&mut self, now: DateTime<Utc>) -> Result<Vec<EngineEvent>> {
        let today = self.today(now);
        let session = self.session.as_mut().ok_or(DojoError::NoSession)?;
        let profile = self.profile.as_mut().ok_or(DojoError::NoProfile)?;

        let runner = SessionRunner::new(&self.catalog, self.settings.stamina);
        let events = runner.skip(session, profile, today)?;

        self.after_step(&events)?;
        Ok(events)
    }

    pub fn pause(&mut self) -> Result<Vec<EngineEvent>> {
        let session = self.session.as_mut().ok_or(DojoError::NoSession)?;
        Ok(SessionRunner::new(&self.catalog, self.settings.stamina).pause(session)?)
    }

    pub fn resume(&mut self) -> Result<Vec<EngineEvent>> {
        let session = self.session.as_mut().ok_or(DojoError::NoSession)?;
        Ok(SessionRunner::new(&self.catalog, self.settings.stamina).resume(session)?)
    }

    pub fn abort(&mut self) -> Result<Vec<EngineEvent>> {
        let session = self.session.as_mut().ok_or(DojoError::NoSession)?;
        let events = SessionRunner::new(&self.catalog, self.settings.stamina).abort(session)?;
        info!(plan = %session.plan().id, "Aborted session");
        Ok(events)
    }

    // ========== Preferences ==========

    /// Add or replace a user-authored plan
    pub fn add_custom_plan(&mut self, plan: PlanTemplate) -> Result<()> {
        if self.catalog.plan(plan.id.as_str()).is_some() {
            return Err(EngineError::InvalidPlan {
                reason: format!("plan id '{}' is used by a recommended plan", plan.id),
            }
            .into());
        }
        self.catalog.validate_plan(&plan)?;

        let profile = self.profile.as_mut().ok_or(DojoError::NoProfile)?;
        debug!(plan = %plan.id, items = plan.total_items(), "Saving custom plan");
        profile.upsert_custom_plan(plan);
        self.store.save(profile)
    }

    pub fn remove_custom_plan(&mut self, plan_id: &str) -> Result<PlanTemplate> {
        let profile = self.profile.as_mut().ok_or(DojoError::NoProfile)?;
        let removed = profile
            .remove_custom_plan(plan_id)
            .ok_or_else(|| DojoError::UnknownPlan {
                id: plan_id.to_string(),
            })?;
        self.store.save(profile)?;
        Ok(removed)
    }

    pub fn set_theme(&mut self, theme: &str) -> Result<()> {
        if !self.catalog.has_theme(theme) {
            return Err(DojoError::UnknownTheme {
                theme: theme.to_string(),
            });
        }
        let profile = self.profile.as_mut().ok_or(DojoError::NoProfile)?;
        profile.set_theme(theme);
        self.store.save(profile)
    }

    pub fn set_avatar(&mut self, avatar: &str) -> Result<()> {
        let level = self.require_profile()?.rank_level();
        self.check_avatar(avatar, level)?;

        let profile = self.profile.as_mut().ok_or(DojoError::NoProfile)?;
        profile.set_avatar(avatar);
        self.store.save(profile)
    }

    pub fn acknowledge_new_content(&mut self) -> Result<()> {
        let profile = self.profile.as_mut().ok_or(DojoError::NoProfile)?;
        profile.acknowledge_new_content();
        profile.mark_onboarded();
        self.store.save(profile)
    }

    // ========== Helpers ==========

    fn require_profile(&self) -> Result<&Profile> {
        self.profile.as_ref().ok_or(DojoError::NoProfile)
    }

    fn session_active(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| matches!(s.status(), SessionStatus::Running | SessionStatus::Paused))
    }

    /// Persist once a step has touched the profile
    fn after_step(&mut self, events: &[EngineEvent]) -> Result<()> {
        let completed = events
            .iter()
            .find(|e| matches!(e, EngineEvent::PlanCompleted { .. }));
        if let (Some(event), Some(profile)) = (completed, self.profile.as_ref()) {
            info!(%event, total_xp = profile.xp(), "Session completed");
            self.store.save(profile)?;
        }
        Ok(())
    }

    fn check_avatar(&self, avatar: &str, rank_level: u32) -> Result<()> {
        let entry = self
            .catalog
            .avatar(avatar)
            .ok_or_else(|| DojoError::UnknownAvatar {
                id: avatar.to_string(),
            })?;
        if entry.required_rank > rank_level {
            return Err(EngineError::RankLocked {
                required: entry.required_rank,
                current: rank_level,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog, now};
    use chrono::{Duration, TimeZone};
    use kwoon_adapter::repository::in_memory::InMemoryProfileRepository;
    use kwoon_domain::{PhaseKind, PlanItem};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    type TestDojo = Dojo<InMemoryProfileRepository, StdRng>;

    fn dojo_on(repository: InMemoryProfileRepository) -> TestDojo {
        Dojo::new(
            repository,
            catalog(),
            DojoSettings::default(),
            StdRng::seed_from_u64(42),
        )
    }

    fn dojo_with_profile() -> TestDojo {
        let mut dojo = dojo_on(InMemoryProfileRepository::new());
        dojo.create_profile(NewProfile::named("Ana"), now()).unwrap();
        dojo
    }

    // ============== Profile Lifecycle Tests ==============

    #[test]
    fn test_create_profile_assigns_daily_challenge() {
        let mut dojo = dojo_on(InMemoryProfileRepository::new());
        let events = dojo.create_profile(NewProfile::named("Ana"), now()).unwrap();

        let profile = dojo.profile().unwrap();
        assert_eq!(profile.stamina(), 100);
        // c1 is the only activity open to a white belt
        assert_eq!(profile.daily().activity, Some(ActivityId::new("c1")));
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::DailyChallengeAssigned { .. })));
    }

    #[test]
    fn test_create_profile_twice_is_rejected() {
        let mut dojo = dojo_with_profile();
        assert!(matches!(
            dojo.create_profile(NewProfile::named("Bob"), now()),
            Err(DojoError::ProfileExists)
        ));
    }

    #[test]
    fn test_operations_without_profile() {
        let mut dojo = dojo_on(InMemoryProfileRepository::new());
        assert!(dojo.open(now()).unwrap().is_empty());
        assert!(matches!(
            dojo.complete_activity("c1", now()),
            Err(DojoError::NoProfile)
        ));
        assert!(matches!(dojo.progress(), Err(DojoError::NoProfile)));
        assert!(matches!(dojo.export(), Err(DojoError::NoProfile)));
    }

    #[test]
    fn test_profile_survives_reopen() {
        let repository = InMemoryProfileRepository::new();
        let mut dojo = dojo_on(repository.clone());
        dojo.create_profile(NewProfile::named("Ana"), now()).unwrap();
        dojo.complete_activity("c1", now()).unwrap();

        let mut reopened = dojo_on(repository);
        reopened.open(now()).unwrap();
        let profile = reopened.profile().unwrap();
        assert_eq!(profile.xp(), 100);
        assert_eq!(profile.stamina(), 90);
    }

    #[test]
    fn test_open_corrupted_store_reports_no_profile() {
        let repository = InMemoryProfileRepository::with_raw("]]garbage");
        let mut dojo = dojo_on(repository.clone());

        assert!(dojo.open(now()).unwrap().is_empty());
        assert!(dojo.profile().is_none());
        assert!(repository.raw().unwrap().is_none());
    }

    #[test]
    fn test_open_repairs_partly_unreadable_profile() {
        let repository = InMemoryProfileRepository::with_raw(
            r#"{"name":"Ana","xp":5000,"streak":12,"history":[{"date":"06/01/2025","xpGained":5}]}"#,
        );
        let mut dojo = dojo_on(repository.clone());

        dojo.open(now()).unwrap();
        let profile = dojo.profile().unwrap();
        assert_eq!(profile.name(), "Ana");
        assert_eq!(profile.xp(), 5000);
        assert!(profile.history().is_empty());
        assert!(repository.raw().unwrap().is_some());
    }

    #[test]
    fn test_reset_discards_profile() {
        let mut dojo = dojo_with_profile();
        dojo.reset().unwrap();
        assert!(dojo.profile().is_none());
        assert!(dojo.store().repository().raw().unwrap().is_none());
    }

    // ============== Activity Tests ==============

    #[test]
    fn test_complete_daily_activity() {
        let mut dojo = dojo_with_profile();
        let events = dojo.complete_activity("c1", now()).unwrap();

        let profile = dojo.profile().unwrap();
        assert_eq!(profile.xp(), 100);
        assert_eq!(profile.stamina(), 90);
        assert!(profile.daily().completed);
        assert_eq!(profile.streak(), 1);
        assert!(profile.has_achievement("first_steps"));
        assert!(profile.has_achievement("streak_1"));
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::DailyChallengeCompleted { streak: 1, .. })));
    }

    #[test]
    fn test_complete_locked_activity() {
        let mut dojo = dojo_with_profile();
        let result = dojo.complete_activity("wc_chi_sao", now());

        assert!(matches!(
            result,
            Err(DojoError::Engine(EngineError::RankLocked {
                required: 1,
                current: 0
            }))
        ));
        assert_eq!(dojo.profile().unwrap().stamina(), 100);
        assert_eq!(dojo.profile().unwrap().xp(), 0);
    }

    #[test]
    fn test_complete_unknown_activity() {
        let mut dojo = dojo_with_profile();
        assert!(matches!(
            dojo.complete_activity("ghost", now()),
            Err(DojoError::UnknownActivity { .. })
        ));
    }

    #[test]
    fn test_stamina_regenerates_between_calls() {
        let mut dojo = dojo_with_profile();
        dojo.complete_activity("c1", now()).unwrap();

        let events = dojo.refresh(now() + Duration::minutes(52)).unwrap();

        assert_eq!(dojo.profile().unwrap().stamina(), 100);
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::StaminaRegenerated { amount: 10, .. })));
    }

    #[test]
    fn test_today_uses_configured_offset() {
        let settings = DojoSettings {
            utc_offset: FixedOffset::west_opt(5 * 3600).unwrap(),
            ..DojoSettings::default()
        };
        let dojo: TestDojo = Dojo::new(
            InMemoryProfileRepository::new(),
            catalog(),
            settings,
            StdRng::seed_from_u64(1),
        );

        let late_evening = Utc.with_ymd_and_hms(2025, 3, 10, 2, 0, 0).unwrap();
        assert_eq!(
            dojo.today(late_evening),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
        );
    }

    // ============== Session Tests ==============

    #[test]
    fn test_plan_session_end_to_end() {
        let mut dojo = dojo_with_profile();
        dojo.start_plan("rec_basic", now()).unwrap();
        assert_eq!(dojo.profile().unwrap().stamina(), 50);

        assert!(matches!(
            dojo.start_plan("rec_basic", now()),
            Err(DojoError::SessionInProgress)
        ));

        dojo.pause().unwrap();
        assert!(dojo.tick(30, now()).is_err());
        dojo.resume().unwrap();

        let events = dojo.tick(90, now()).unwrap();
        assert!(events.contains(&EngineEvent::PlanCompleted {
            plan: kwoon_domain::PlanId::new("rec_basic"),
            xp_awarded: 800
        }));
        assert_eq!(dojo.profile().unwrap().xp(), 800);
        assert_eq!(
            dojo.session().map(|s| s.status()),
            Some(SessionStatus::Completed)
        );

        // persisted on completion
        let raw = dojo.store().repository().raw().unwrap().unwrap();
        assert!(raw.contains("\"xp\":800"));
    }

    #[test]
    fn test_session_operations_without_session() {
        let mut dojo = dojo_with_profile();
        assert!(matches!(dojo.tick(5, now()), Err(DojoError::NoSession)));
        assert!(matches!(dojo.pause(), Err(DojoError::NoSession)));
        assert!(matches!(dojo.abort(), Err(DojoError::NoSession)));
    }

    #[test]
    fn test_abort_then_start_again() {
        let mut dojo = dojo_with_profile();
        dojo.start_plan("rec_basic", now()).unwrap();
        dojo.abort().unwrap();

        assert_eq!(dojo.profile().unwrap().xp(), 0);
        assert_eq!(dojo.profile().unwrap().stamina(), 50);
        dojo.start_plan("rec_basic", now()).unwrap();
        assert_eq!(dojo.profile().unwrap().stamina(), 0);
    }

    #[test]
    fn test_abort_midway_keeps_progress_unchanged() {
        let mut dojo = dojo_with_profile();
        let plan = PlanTemplate::new("pair", "Pair")
            .with_phase(
                PhaseKind::Main,
                vec![PlanItem::new("c1", 30), PlanItem::new("c1", 30)],
            )
            .with_reward(300, 20);
        dojo.add_custom_plan(plan).unwrap();

        dojo.start_plan("pair", now()).unwrap();
        let events = dojo.tick(40, now()).unwrap();
        assert!(events.contains(&EngineEvent::ItemAdvanced { phase: 0, item: 1 }));

        dojo.abort().unwrap();
        let profile = dojo.profile().unwrap();
        assert_eq!(profile.xp(), 0);
        assert!(profile.history().is_empty());
        assert_eq!(profile.activity_stats(&ActivityId::plan()).count, 0);
        assert_eq!(profile.stamina(), 80);
    }

    #[test]
    fn test_unknown_plan() {
        let mut dojo = dojo_with_profile();
        assert!(matches!(
            dojo.start_plan("nope", now()),
            Err(DojoError::UnknownPlan { .. })
        ));
    }

    // ============== Custom Plan Tests ==============

    #[test]
    fn test_custom_plan_lifecycle() {
        let mut dojo = dojo_with_profile();
        let plan = PlanTemplate::new("mine", "Morning")
            .with_phase(PhaseKind::Main, vec![PlanItem::new("c1", 30)])
            .with_reward(0, 5);

        dojo.add_custom_plan(plan).unwrap();
        assert_eq!(dojo.plans().len(), 2);

        dojo.start_plan("mine", now()).unwrap();
        dojo.skip(now()).unwrap();
        assert_eq!(dojo.profile().unwrap().xp(), 0);

        dojo.remove_custom_plan("mine").unwrap();
        assert!(matches!(
            dojo.remove_custom_plan("mine"),
            Err(DojoError::UnknownPlan { .. })
        ));
    }

    #[test]
    fn test_custom_plan_validation() {
        let mut dojo = dojo_with_profile();

        let shadowing = PlanTemplate::new("rec_basic", "Mine")
            .with_phase(PhaseKind::Main, vec![PlanItem::new("c1", 30)]);
        assert!(matches!(
            dojo.add_custom_plan(shadowing),
            Err(DojoError::Engine(EngineError::InvalidPlan { .. }))
        ));

        let empty = PlanTemplate::new("empty", "Empty").with_phase(PhaseKind::Main, vec![]);
        assert!(matches!(
            dojo.add_custom_plan(empty),
            Err(DojoError::Engine(EngineError::InvalidPlan { .. }))
        ));
    }

    // ============== Preference Tests ==============

    #[test]
    fn test_theme_and_avatar() {
        let mut dojo = dojo_with_profile();

        assert!(matches!(
            dojo.set_theme("neon"),
            Err(DojoError::UnknownTheme { .. })
        ));
        dojo.set_theme("forest").unwrap();
        assert_eq!(dojo.profile().unwrap().theme(), "forest");

        assert!(matches!(
            dojo.set_avatar("avatar99"),
            Err(DojoError::UnknownAvatar { .. })
        ));
        assert!(matches!(
            dojo.set_avatar("avatar9"),
            Err(DojoError::Engine(EngineError::RankLocked { .. }))
        ));
        dojo.set_avatar("avatar1").unwrap();
        assert_eq!(dojo.profile().unwrap().avatar(), Some("avatar1"));
    }

    #[test]
    fn test_acknowledge_new_content() {
        let mut dojo = dojo_with_profile();
        dojo.import(json!({ "xp": 1990, "name": "Ana" }), now())
            .unwrap();
        dojo.complete_activity("c1", now()).unwrap();
        assert!(dojo.profile().unwrap().new_content().belts);

        dojo.acknowledge_new_content().unwrap();
        assert!(!dojo.profile().unwrap().new_content().belts);
        assert!(!dojo.profile().unwrap().is_new());
    }

    // ============== Import / Export Tests ==============

    #[test]
    fn test_rejected_import_keeps_profile() {
        let mut dojo = dojo_with_profile();
        dojo.complete_activity("c1", now()).unwrap();
        let before = dojo.profile().cloned();

        let result = dojo.import(json!({ "xp": "abc", "name": "Bob" }), now());

        assert!(matches!(
            result,
            Err(DojoError::Engine(EngineError::InvalidImport { .. }))
        ));
        assert_eq!(dojo.profile().cloned(), before);
    }

    #[test]
    fn test_import_recomputes_rank_and_exports() {
        let mut dojo = dojo_with_profile();
        dojo.import(json!({ "xp": 2500, "name": "Bob", "unlockedBeltLevel": 0 }), now())
            .unwrap();

        let profile = dojo.profile().unwrap();
        assert_eq!(profile.name(), "Bob");
        assert_eq!(profile.rank_level(), 1);
        assert_eq!(dojo.progress().unwrap().current.name, "Yellow Belt");

        let exported = dojo.export().unwrap();
        assert_eq!(exported["xp"], 2500);
        assert_eq!(exported["unlockedRankLevel"], 1);
    }
}
