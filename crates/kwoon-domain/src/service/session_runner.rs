//! Session Runner - Drives a session against a profile
//!
//! The runner is the bridge between the [`Session`] state machine and the
//! profile: it charges stamina when a plan starts and credits the plan's
//! reward exactly once when the last item finishes.

use chrono::NaiveDate;

use crate::error::EngineError;
use crate::event::EngineEvent;
use crate::model::activity::ActivityId;
use crate::model::catalog::Catalog;
use crate::model::plan::PlanTemplate;
use crate::model::profile::Profile;
use crate::model::session::{Session, SessionStatus, Step};
use crate::service::ledger::ProgressionLedger;
use crate::service::stamina::StaminaPolicy;

pub struct SessionRunner<'a> {
    catalog: &'a Catalog,
    stamina: StaminaPolicy,
}

impl<'a> SessionRunner<'a> {
    pub fn new(catalog: &'a Catalog, stamina: StaminaPolicy) -> Self {
        Self { catalog, stamina }
    }

    /// Validate, charge and start `plan`
    ///
    /// Nothing is mutated unless every check passes.
    pub fn start(
        &self,
        plan: PlanTemplate,
        profile: &mut Profile,
    ) -> Result<(Session, Vec<EngineEvent>), EngineError> {
        self.catalog.validate_plan(&plan)?;
        self.stamina.ensure_available(profile, plan.stamina_cost)?;

        let mut session = Session::new(plan);
        session.begin()?;

        let cost = session.plan().stamina_cost;
        let spent = self.stamina.spend(profile, cost)?;

        let events = vec![
            spent,
            EngineEvent::SessionStarted {
                plan: session.plan().id.clone(),
                stamina_spent: cost,
            },
        ];
        Ok((session, events))
    }

    /// Advance the running session by `elapsed_seconds`
    pub fn tick(
        &self,
        session: &mut Session,
        profile: &mut Profile,
        elapsed_seconds: u64,
        today: NaiveDate,
    ) -> Result<Vec<EngineEvent>, EngineError> {
        let steps = session.advance(elapsed_seconds)?;
        self.apply_steps(session, profile, steps, today)
    }

    /// Finish the current item immediately
    pub fn skip(
        &self,
        session: &mut Session,
        profile: &mut Profile,
        today: NaiveDate,
    ) -> Result<Vec<EngineEvent>, EngineError> {
        let step = session.skip_item()?;
        self.apply_steps(session, profile, vec![step], today)
    }

    pub fn pause(&self, session: &mut Session) -> Result<Vec<EngineEvent>, EngineError> {
        Ok(match session.pause()? {
            true => vec![EngineEvent::SessionPaused],
            false => Vec::new(),
        })
    }

    pub fn resume(&self, session: &mut Session) -> Result<Vec<EngineEvent>, EngineError> {
        Ok(match session.resume()? {
            true => vec![EngineEvent::SessionResumed],
            false => Vec::new(),
        })
    }

    /// Stop without reward; the stamina paid at start is not refunded
    pub fn abort(&self, session: &mut Session) -> Result<Vec<EngineEvent>, EngineError> {
        session.abort()?;
        Ok(vec![EngineEvent::SessionAborted {
            plan: session.plan().id.clone(),
        }])
    }

    fn apply_steps(
        &self,
        session: &Session,
        profile: &mut Profile,
        steps: Vec<Step>,
        today: NaiveDate,
    ) -> Result<Vec<EngineEvent>, EngineError> {
        let mut events = Vec::with_capacity(steps.len());
        for step in steps {
            match step {
                Step::ItemAdvanced(position) => events.push(EngineEvent::item_advanced(position)),
                Step::PhaseAdvanced(position, kind) => events.push(EngineEvent::PhaseAdvanced {
                    phase: position.phase,
                    kind,
                }),
                Step::Completed => events.extend(self.complete(session, profile, today)?),
            }
        }
        Ok(events)
    }

    fn complete(
        &self,
        session: &Session,
        profile: &mut Profile,
        today: NaiveDate,
    ) -> Result<Vec<EngineEvent>, EngineError> {
        debug_assert_eq!(session.status(), SessionStatus::Completed);

        let plan = session.plan();
        let ledger = ProgressionLedger::new(self.catalog);
        let activity = ActivityId::plan();
        let duration = plan.total_duration_seconds();

        let mut events = if plan.xp_reward > 0 {
            ledger.award(profile, plan.xp_reward, &activity, duration, today)?
        } else {
            ledger.record_completion(profile, &activity, duration)
        };
        events.push(EngineEvent::PlanCompleted {
            plan: plan.id.clone(),
            xp_awarded: plan.xp_reward,
        });
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::fixtures::catalog;
    use crate::model::plan::{PhaseKind, PlanItem};
    use crate::model::profile::NewProfile;
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()
    }

    fn profile() -> Profile {
        let now = Utc.with_ymd_and_hms(2024, 10, 1, 7, 0, 0).unwrap();
        Profile::create(NewProfile::named("Ana"), 100, now).unwrap()
    }

    fn count_completed(events: &[EngineEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, EngineEvent::PlanCompleted { .. }))
            .count()
    }

    // ============== Start Tests ==============

    #[test]
    fn test_start_charges_stamina() {
        let catalog = catalog();
        let runner = SessionRunner::new(&catalog, StaminaPolicy::default());
        let mut p = profile();
        let plan = catalog.plan("basic").unwrap().clone();

        let (session, events) = runner.start(plan, &mut p).unwrap();

        assert_eq!(session.status(), SessionStatus::Running);
        assert_eq!(p.stamina(), 50);
        assert!(events.iter().any(|e| matches!(
            e,
            EngineEvent::SessionStarted {
                stamina_spent: 50,
                ..
            }
        )));
    }

    #[test]
    fn test_start_with_insufficient_stamina() {
        let catalog = catalog();
        let runner = SessionRunner::new(&catalog, StaminaPolicy::default());
        let mut p = profile();
        p.stamina = 49;
        let snapshot = p.clone();

        let result = runner.start(catalog.plan("basic").unwrap().clone(), &mut p);

        assert!(matches!(
            result,
            Err(EngineError::InsufficientResource {
                required: 50,
                available: 49
            })
        ));
        assert_eq!(p, snapshot);
    }

    #[test]
    fn test_start_rejects_empty_and_unknown_plans() {
        let catalog = catalog();
        let runner = SessionRunner::new(&catalog, StaminaPolicy::default());
        let mut p = profile();

        let empty = PlanTemplate::new("e", "Empty")
            .with_phase(PhaseKind::WarmUp, vec![])
            .with_phase(PhaseKind::Main, vec![]);
        assert!(matches!(
            runner.start(empty, &mut p),
            Err(EngineError::InvalidPlan { .. })
        ));

        let unknown = PlanTemplate::new("u", "Unknown")
            .with_phase(PhaseKind::Main, vec![PlanItem::new("ghost", 10)]);
        assert!(matches!(
            runner.start(unknown, &mut p),
            Err(EngineError::InvalidPlan { .. })
        ));
        assert_eq!(p.stamina(), 100);
    }

    // ============== Completion Tests ==============

    #[test]
    fn test_huge_tick_completes_and_rewards_once() {
        let catalog = catalog();
        let runner = SessionRunner::new(&catalog, StaminaPolicy::default());
        let mut p = profile();
        let (mut session, _) = runner
            .start(catalog.plan("basic").unwrap().clone(), &mut p)
            .unwrap();

        let events = runner.tick(&mut session, &mut p, 1_000_000, today()).unwrap();

        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(count_completed(&events), 1);
        assert_eq!(p.xp(), 800);
        assert_eq!(p.activity_stats(&ActivityId::plan()).count, 1);
        assert_eq!(p.activity_stats(&ActivityId::plan()).total_seconds, 210);
        assert!(p.has_achievement("first_plan"));

        assert!(runner.tick(&mut session, &mut p, 10, today()).is_err());
        assert_eq!(p.xp(), 800);
    }

    #[test]
    fn test_ticks_walk_phases() {
        let catalog = catalog();
        let runner = SessionRunner::new(&catalog, StaminaPolicy::default());
        let mut p = profile();
        let (mut session, _) = runner
            .start(catalog.plan("basic").unwrap().clone(), &mut p)
            .unwrap();

        let events = runner.tick(&mut session, &mut p, 30, today()).unwrap();
        assert_eq!(
            events,
            vec![EngineEvent::PhaseAdvanced {
                phase: 1,
                kind: PhaseKind::Main
            }]
        );

        let events = runner.tick(&mut session, &mut p, 70, today()).unwrap();
        assert_eq!(events, vec![EngineEvent::ItemAdvanced { phase: 1, item: 1 }]);
        assert_eq!(session.elapsed_in_item(), 10);
    }

    #[test]
    fn test_skip_through_to_completion() {
        let catalog = catalog();
        let runner = SessionRunner::new(&catalog, StaminaPolicy::default());
        let mut p = profile();
        let (mut session, _) = runner
            .start(catalog.plan("basic").unwrap().clone(), &mut p)
            .unwrap();

        runner.skip(&mut session, &mut p, today()).unwrap();
        runner.skip(&mut session, &mut p, today()).unwrap();
        let events = runner.skip(&mut session, &mut p, today()).unwrap();

        assert_eq!(count_completed(&events), 1);
        assert_eq!(p.xp(), 800);
    }

    #[test]
    fn test_zero_reward_plan_counts_completion() {
        let catalog = catalog();
        let runner = SessionRunner::new(&catalog, StaminaPolicy::default());
        let mut p = profile();
        let plan = PlanTemplate::new("free", "Free")
            .with_phase(PhaseKind::Main, vec![PlanItem::new("c1", 5)]);
        let (mut session, _) = runner.start(plan, &mut p).unwrap();

        let events = runner.tick(&mut session, &mut p, 5, today()).unwrap();

        assert_eq!(p.xp(), 0);
        assert!(p.history().is_empty());
        assert_eq!(p.activity_stats(&ActivityId::plan()).count, 1);
        assert_eq!(count_completed(&events), 1);
    }

    // ============== Pause / Abort Tests ==============

    #[test]
    fn test_abort_keeps_stamina_spent() {
        let catalog = catalog();
        let runner = SessionRunner::new(&catalog, StaminaPolicy::default());
        let mut p = profile();
        let (mut session, _) = runner
            .start(catalog.plan("basic").unwrap().clone(), &mut p)
            .unwrap();

        runner.pause(&mut session).unwrap();
        assert!(runner.pause(&mut session).unwrap().is_empty());
        assert!(matches!(
            runner.tick(&mut session, &mut p, 5, today()),
            Err(EngineError::InvalidSessionState { .. })
        ));

        let events = runner.abort(&mut session).unwrap();
        assert_eq!(session.status(), SessionStatus::Aborted);
        assert!(matches!(events[0], EngineEvent::SessionAborted { .. }));
        assert_eq!(p.stamina(), 50);
        assert_eq!(p.xp(), 0);
    }

    #[test]
    fn test_abort_after_progress_awards_nothing() {
        let catalog = catalog();
        let runner = SessionRunner::new(&catalog, StaminaPolicy::default());
        let mut p = profile();
        let (mut session, _) = runner
            .start(catalog.plan("basic").unwrap().clone(), &mut p)
            .unwrap();

        let events = runner.tick(&mut session, &mut p, 100, today()).unwrap();
        assert!(events.contains(&EngineEvent::ItemAdvanced { phase: 1, item: 1 }));

        runner.abort(&mut session).unwrap();
        assert_eq!(session.status(), SessionStatus::Aborted);
        assert_eq!(p.xp(), 0);
        assert!(p.history().is_empty());
        assert_eq!(p.activity_stats(&ActivityId::plan()).count, 0);
        assert_eq!(p.stamina(), 50);
    }
}
