//! Session - A plan being walked in real time
//!
//! ```text
//! Idle ──begin──► Running ◄──pause/resume──► Paused
//!                    │                          │
//!                    ├──last item done──► Completed
//!                    └────────abort─────────────┴──► Aborted
//! ```
//!
//! The session owns only the walking state. Stamina, XP and events are
//! handled by [`crate::service::session_runner::SessionRunner`].

use serde::Serialize;

use super::plan::{PhaseKind, PlanItem, PlanPosition, PlanTemplate};
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    Completed,
    Aborted,
}

impl SessionStatus {
    /// Completed or Aborted
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Aborted)
    }
}

impl core::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Running => "running",
            SessionStatus::Paused => "paused",
            SessionStatus::Completed => "completed",
            SessionStatus::Aborted => "aborted",
        };
        write!(f, "{}", s)
    }
}

/// One movement of the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Next item within the same phase
    ItemAdvanced(PlanPosition),
    /// First item of a later phase
    PhaseAdvanced(PlanPosition, PhaseKind),
    /// The last item finished
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    plan: PlanTemplate,
    position: PlanPosition,
    elapsed_in_item: u64,
    status: SessionStatus,
}

impl Session {
    /// An idle session over `plan`
    pub fn new(plan: PlanTemplate) -> Self {
        Self {
            plan,
            position: PlanPosition { phase: 0, item: 0 },
            elapsed_in_item: 0,
            status: SessionStatus::Idle,
        }
    }

    // ========== Getters ==========

    pub fn plan(&self) -> &PlanTemplate {
        &self.plan
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn position(&self) -> PlanPosition {
        self.position
    }

    pub fn current_phase(&self) -> Option<PhaseKind> {
        self.plan.phases.get(self.position.phase).map(|p| p.kind)
    }

    pub fn current_item(&self) -> Option<&PlanItem> {
        if self.status.is_terminal() {
            return None;
        }
        self.plan.item(self.position)
    }

    pub fn elapsed_in_item(&self) -> u64 {
        self.elapsed_in_item
    }

    /// Seconds left on the current item
    pub fn remaining_in_item(&self) -> u64 {
        self.current_item()
            .map(|i| u64::from(i.duration_seconds).saturating_sub(self.elapsed_in_item))
            .unwrap_or(0)
    }

    // ========== State Transitions ==========

    /// Idle -> Running, positioned at the first walkable item
    pub(crate) fn begin(&mut self) -> Result<(), EngineError> {
        self.require(SessionStatus::Idle, "start")?;
        let first = self.plan.first_position().ok_or_else(|| EngineError::InvalidPlan {
            reason: "plan has no items".to_string(),
        })?;

        self.position = first;
        self.elapsed_in_item = 0;
        self.status = SessionStatus::Running;
        Ok(())
    }

    /// Add elapsed time and walk every item it finishes
    ///
    /// Surplus seconds carry into the next item. A zero-duration item
    /// finishes on the first advance whatever the amount.
    pub(crate) fn advance(&mut self, elapsed_seconds: u64) -> Result<Vec<Step>, EngineError> {
        self.require(SessionStatus::Running, "tick")?;

        self.elapsed_in_item = self.elapsed_in_item.saturating_add(elapsed_seconds);
        let mut steps = Vec::new();

        while let Some(item) = self.plan.item(self.position) {
            let duration = u64::from(item.duration_seconds);
            if self.elapsed_in_item < duration {
                break;
            }
            let surplus = self.elapsed_in_item - duration;
            let step = self.finish_item();
            steps.push(step);
            if step == Step::Completed {
                break;
            }
            self.elapsed_in_item = surplus;
        }

        Ok(steps)
    }

    /// Finish the current item immediately
    pub(crate) fn skip_item(&mut self) -> Result<Step, EngineError> {
        self.require(SessionStatus::Running, "skip")?;
        Ok(self.finish_item())
    }

    /// Returns `false` when already paused
    pub(crate) fn pause(&mut self) -> Result<bool, EngineError> {
        match self.status {
            SessionStatus::Running => {
                self.status = SessionStatus::Paused;
                Ok(true)
            }
            SessionStatus::Paused => Ok(false),
            status => Err(EngineError::InvalidSessionState {
                operation: "pause",
                status,
            }),
        }
    }

    /// Returns `false` when already running
    pub(crate) fn resume(&mut self) -> Result<bool, EngineError> {
        match self.status {
            SessionStatus::Paused => {
                self.status = SessionStatus::Running;
                Ok(true)
            }
            SessionStatus::Running => Ok(false),
            status => Err(EngineError::InvalidSessionState {
                operation: "resume",
                status,
            }),
        }
    }

    pub(crate) fn abort(&mut self) -> Result<(), EngineError> {
        match self.status {
            SessionStatus::Running | SessionStatus::Paused => {
                self.status = SessionStatus::Aborted;
                Ok(())
            }
            status => Err(EngineError::InvalidSessionState {
                operation: "abort",
                status,
            }),
        }
    }

    fn finish_item(&mut self) -> Step {
        self.elapsed_in_item = 0;
        match self.plan.next_position(self.position) {
            Some(next) if next.phase == self.position.phase => {
                self.position = next;
                Step::ItemAdvanced(next)
            }
            Some(next) => {
                self.position = next;
                let kind = self.plan.phases[next.phase].kind;
                Step::PhaseAdvanced(next, kind)
            }
            None => {
                self.status = SessionStatus::Completed;
                Step::Completed
            }
        }
    }

    fn require(&self, expected: SessionStatus, operation: &'static str) -> Result<(), EngineError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidSessionState {
                operation,
                status: self.status,
            })
        }
    }
}
