//! Worker execution state machine.
//!
//! A worker picks a department, a task, a zone and a line range, then starts
//! the task. Starting creates a session in the shared store, writes a draft
//! to device storage and signs the worker out. On the next login the draft
//! is restored and the worker lands on the execution screen, from where the
//! task can be ended.
//!
//! Every failing operation returns a [`FlowError`] and leaves the flow
//! unchanged. The most recent failure is kept as the block message.

use std::fmt;

use sarms_core::{
    rounded_minutes, CompletedSession, Language, Session, SessionId, Time, WorkerIdentity,
};
use sarms_storage::{clear_draft, load_draft, save_draft, DraftError, WorkerDraft};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::context::FlowContext;
use crate::error::FlowError;
use crate::lines::validate_lines;

/// Where the worker is in the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    /// Choosing a department
    SelectingDepartment,
    /// Choosing a task of the selected department
    SelectingTask,
    /// Choosing a zone
    SelectingZone,
    /// Entering the line range
    SelectingLines,
    /// Reviewing or running the task
    Executing,
    /// Task started; the device is back on the login screen
    SignedOut,
    /// Task ended; showing the completion summary
    Confirmed,
}

impl FlowStep {
    /// The step `back` returns to, if any.
    pub fn previous(self) -> Option<FlowStep> {
        match self {
            Self::SelectingTask => Some(Self::SelectingDepartment),
            Self::SelectingZone => Some(Self::SelectingTask),
            Self::SelectingLines => Some(Self::SelectingZone),
            Self::Executing => Some(Self::SelectingLines),
            Self::SelectingDepartment | Self::SignedOut | Self::Confirmed => None,
        }
    }
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SelectingDepartment => "choosing a department",
            Self::SelectingTask => "choosing a task",
            Self::SelectingZone => "choosing a zone",
            Self::SelectingLines => "entering lines",
            Self::Executing => "executing",
            Self::SignedOut => "signed out",
            Self::Confirmed => "confirmed",
        };
        write!(f, "{}", s)
    }
}

/// Choices made so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Department catalog id
    pub department_id: Option<String>,
    /// Task catalog id
    pub task_id: Option<String>,
    /// Zone catalog id
    pub zone_id: Option<String>,
    /// First line, as accepted
    pub line_from: Option<String>,
    /// Last line, as accepted
    pub line_to: Option<String>,
}

/// The task currently running for this worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    /// Session id in the store
    pub session_id: SessionId,
    /// Department catalog id
    pub department_id: String,
    /// Department label fixed at start
    pub department: String,
    /// Task catalog id
    pub task_id: String,
    /// Task label fixed at start
    pub task: String,
    /// Zone catalog id
    pub zone_id: String,
    /// Zone label fixed at start
    pub zone: String,
    /// First line
    pub line_from: String,
    /// Last line
    pub line_to: String,
    /// Start instant
    pub start_time: Time,
}

/// One worker's pass through the flow.
pub struct WorkerFlow<'a> {
    ctx: FlowContext<'a>,
    worker: WorkerIdentity,
    step: FlowStep,
    selection: Selection,
    active: Option<ActiveSession>,
    completed: Option<CompletedSession>,
    last_error: Option<FlowError>,
}

impl<'a> WorkerFlow<'a> {
    /// Open the flow for a freshly logged-in worker.
    ///
    /// A resolvable draft puts the flow straight into
    /// [`FlowStep::Executing`] with the stored selections. Anything else
    /// (no draft, unreadable, malformed, stale catalog ids) starts fresh.
    pub fn restore_on_load(worker: WorkerIdentity, ctx: FlowContext<'a>) -> Self {
        let mut flow = Self {
            ctx,
            worker,
            step: FlowStep::SelectingDepartment,
            selection: Selection::default(),
            active: None,
            completed: None,
            last_error: None,
        };

        match load_draft(&*flow.ctx.drafts, &flow.worker.login_id, flow.ctx.catalog) {
            Ok(resolved) => {
                let draft = resolved.draft;
                flow.selection = Selection {
                    department_id: Some(draft.department_id.clone()),
                    task_id: Some(draft.task_id.clone()),
                    zone_id: Some(draft.zone_id.clone()),
                    line_from: Some(draft.line_from.clone()),
                    line_to: Some(draft.line_to.clone()),
                };
                flow.active = Some(ActiveSession {
                    session_id: draft.session_id,
                    department: draft
                        .department_label
                        .unwrap_or_else(|| resolved.department.entry.label_en.clone()),
                    department_id: draft.department_id,
                    task: draft
                        .task_label
                        .unwrap_or_else(|| resolved.task.label_en.clone()),
                    task_id: draft.task_id,
                    zone: draft
                        .zone_label
                        .unwrap_or_else(|| resolved.zone.label_en.clone()),
                    zone_id: draft.zone_id,
                    line_from: draft.line_from,
                    line_to: draft.line_to,
                    start_time: draft.start_time,
                });
                flow.step = FlowStep::Executing;
                debug!(worker = %flow.worker.key(), "restored active task from draft");
            }
            Err(DraftError::Absent) => {
                debug!(worker = %flow.worker.key(), "no draft, starting fresh");
            }
            Err(e) => {
                warn!(worker = %flow.worker.key(), error = %e, "ignoring unusable draft");
            }
        }

        flow
    }

    /// Current step.
    pub fn step(&self) -> FlowStep {
        self.step
    }

    /// Choices made so far.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The running task, if any.
    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    /// Snapshot of the task ended last, while on the confirmation screen.
    pub fn completed(&self) -> Option<&CompletedSession> {
        self.completed.as_ref()
    }

    /// Who is logged in.
    pub fn worker(&self) -> &WorkerIdentity {
        &self.worker
    }

    /// Display language.
    pub fn language(&self) -> Language {
        self.ctx.language
    }

    /// Switch the display language.
    ///
    /// Labels of an already-started session keep the language they were
    /// created in.
    pub fn set_language(&mut self, language: Language) {
        self.ctx.language = language;
    }

    /// The failure recorded by the last operation.
    pub fn last_error(&self) -> Option<&FlowError> {
        self.last_error.as_ref()
    }

    /// The last failure rendered in the display language.
    pub fn block_message(&self) -> Option<String> {
        self.last_error.as_ref().map(|e| e.message(self.ctx.language))
    }

    /// Pick a department.
    pub fn select_department(&mut self, department_id: &str) -> Result<FlowStep, FlowError> {
        let result = self.try_select_department(department_id);
        self.record(result)
    }

    fn try_select_department(&mut self, department_id: &str) -> Result<FlowStep, FlowError> {
        self.ensure_idle()?;
        self.ensure_step("select department", FlowStep::SelectingDepartment)?;
        if self.ctx.catalog.department(department_id).is_none() {
            return Err(FlowError::UnknownDepartment(department_id.to_string()));
        }

        if self.selection.department_id.as_deref() != Some(department_id) {
            self.selection.task_id = None;
        }
        self.selection.department_id = Some(department_id.to_string());
        Ok(self.go(FlowStep::SelectingTask))
    }

    /// Pick a task of the selected department.
    pub fn select_task(&mut self, task_id: &str) -> Result<FlowStep, FlowError> {
        let result = self.try_select_task(task_id);
        self.record(result)
    }

    fn try_select_task(&mut self, task_id: &str) -> Result<FlowStep, FlowError> {
        self.ensure_idle()?;
        self.ensure_step("select task", FlowStep::SelectingTask)?;
        let department = self.selection.department_id.clone().unwrap_or_default();
        if self.ctx.catalog.task(&department, task_id).is_none() {
            return Err(FlowError::UnknownTask {
                department,
                task: task_id.to_string(),
            });
        }

        self.selection.task_id = Some(task_id.to_string());
        Ok(self.go(FlowStep::SelectingZone))
    }

    /// Pick a zone.
    pub fn select_zone(&mut self, zone_id: &str) -> Result<FlowStep, FlowError> {
        let result = self.try_select_zone(zone_id);
        self.record(result)
    }

    fn try_select_zone(&mut self, zone_id: &str) -> Result<FlowStep, FlowError> {
        self.ensure_idle()?;
        self.ensure_step("select zone", FlowStep::SelectingZone)?;
        if self.ctx.catalog.zone(zone_id).is_none() {
            return Err(FlowError::UnknownZone(zone_id.to_string()));
        }

        self.selection.zone_id = Some(zone_id.to_string());
        Ok(self.go(FlowStep::SelectingLines))
    }

    /// Enter the line range.
    pub fn submit_lines(&mut self, from: &str, to: &str) -> Result<FlowStep, FlowError> {
        let result = self.try_submit_lines(from, to);
        self.record(result)
    }

    fn try_submit_lines(&mut self, from: &str, to: &str) -> Result<FlowStep, FlowError> {
        self.ensure_idle()?;
        self.ensure_step("submit lines", FlowStep::SelectingLines)?;
        let range = validate_lines(from, to, &self.ctx.config)?;

        self.selection.line_from = Some(range.from.to_string());
        self.selection.line_to = Some(range.to.to_string());
        Ok(self.go(FlowStep::Executing))
    }

    /// Start the selected task.
    ///
    /// Adds a session to the store, writes the draft and signs the worker
    /// out. Rejected while this worker already has a task running, so
    /// repeated calls never create a second session.
    pub fn start_task(&mut self) -> Result<Session, FlowError> {
        let result = self.try_start_task();
        self.record(result)
    }

    fn try_start_task(&mut self) -> Result<Session, FlowError> {
        self.ensure_idle()?;
        self.ensure_step("start task", FlowStep::Executing)?;

        let lang = self.ctx.language;
        let catalog = self.ctx.catalog;
        let department_id = self.selection.department_id.clone().unwrap_or_default();
        let task_id = self.selection.task_id.clone().unwrap_or_default();
        let zone_id = self.selection.zone_id.clone().unwrap_or_default();
        let line_from = self.selection.line_from.clone().unwrap_or_default();
        let line_to = self.selection.line_to.clone().unwrap_or_default();

        let department = catalog
            .department(&department_id)
            .ok_or_else(|| FlowError::UnknownDepartment(department_id.clone()))?;
        let task = catalog
            .task(&department_id, &task_id)
            .ok_or_else(|| FlowError::UnknownTask {
                department: department_id.clone(),
                task: task_id.clone(),
            })?;
        let zone = catalog
            .zone(&zone_id)
            .ok_or_else(|| FlowError::UnknownZone(zone_id.clone()))?;

        let now = self.ctx.clock.now();
        let session = Session {
            id: SessionId::generate(),
            worker_id: self.worker.worker_id.clone(),
            worker_name: self.worker.worker_name.clone(),
            department: department.entry.label(lang).to_string(),
            department_id: department_id.clone(),
            task_type_id: department_id.clone(),
            task: task.label(lang).to_string(),
            zone: zone.label(lang).to_string(),
            zone_id: zone_id.clone(),
            lines_area: Session::lines_area(&line_from, &line_to),
            start_time: now,
            expected_minutes: self.ctx.config.expected_minutes,
            flagged: false,
            notes: Vec::new(),
        };
        self.ctx.sessions.add(session.clone());

        let draft = WorkerDraft {
            session_id: session.id.clone(),
            department_id: department_id.clone(),
            task_id: task_id.clone(),
            zone_id: zone_id.clone(),
            line_from: line_from.clone(),
            line_to: line_to.clone(),
            start_time: now,
            department_label: Some(session.department.clone()),
            task_label: Some(session.task.clone()),
            zone_label: Some(session.zone.clone()),
        };
        if let Err(e) = save_draft(&mut *self.ctx.drafts, &self.worker.login_id, &draft) {
            warn!(worker = %self.worker.key(), error = %e, "failed to write draft");
        }

        self.active = Some(ActiveSession {
            session_id: session.id.clone(),
            department_id,
            department: session.department.clone(),
            task_id,
            task: session.task.clone(),
            zone_id,
            zone: session.zone.clone(),
            line_from,
            line_to,
            start_time: now,
        });
        info!(
            session = %session.id,
            worker = %session.worker_id,
            department = %session.department_id,
            zone = %session.zone_id,
            "task started"
        );
        self.go(FlowStep::SignedOut);

        Ok(session)
    }

    /// End the running task.
    ///
    /// Removes the session and the draft and returns the completion
    /// snapshot for the records collaborator.
    pub fn end_task(&mut self) -> Result<CompletedSession, FlowError> {
        let result = self.try_end_task();
        self.record(result)
    }

    fn try_end_task(&mut self) -> Result<CompletedSession, FlowError> {
        if self.active.is_none() {
            return Err(FlowError::NoActiveTask);
        }
        self.ensure_step("end task", FlowStep::Executing)?;
        let Some(active) = self.active.take() else {
            return Err(FlowError::NoActiveTask);
        };

        self.ctx.sessions.remove(&active.session_id);
        if let Err(e) = clear_draft(&mut *self.ctx.drafts, &self.worker.login_id) {
            warn!(worker = %self.worker.key(), error = %e, "failed to delete draft");
        }

        let end_time = self.ctx.clock.now();
        let snapshot = CompletedSession {
            session_id: active.session_id,
            worker_id: self.worker.worker_id.clone(),
            worker_name: self.worker.worker_name.clone(),
            department_id: active.department_id,
            department: active.department,
            task_id: active.task_id,
            task: active.task,
            zone_id: active.zone_id,
            zone: active.zone,
            line_from: active.line_from,
            line_to: active.line_to,
            start_time: active.start_time,
            end_time,
            duration: rounded_minutes(active.start_time, end_time),
        };
        info!(
            session = %snapshot.session_id,
            worker = %snapshot.worker_id,
            minutes = snapshot.duration,
            "task ended"
        );

        self.completed = Some(snapshot.clone());
        self.go(FlowStep::Confirmed);
        Ok(snapshot)
    }

    /// Leave the confirmation screen and begin a new selection.
    pub fn log_another(&mut self) -> Result<FlowStep, FlowError> {
        let result = self.try_log_another();
        self.record(result)
    }

    fn try_log_another(&mut self) -> Result<FlowStep, FlowError> {
        self.ensure_step("log another", FlowStep::Confirmed)?;
        self.selection = Selection::default();
        self.completed = None;
        Ok(self.go(FlowStep::SelectingDepartment))
    }

    /// Go back one step, keeping selections.
    ///
    /// On the execution screen with a running task this is a no-op.
    pub fn back(&mut self) -> Result<FlowStep, FlowError> {
        let result = self.try_back();
        self.record(result)
    }

    fn try_back(&mut self) -> Result<FlowStep, FlowError> {
        if matches!(self.step, FlowStep::Confirmed | FlowStep::SignedOut) {
            return Err(FlowError::NotAllowed {
                action: "back",
                step: self.step,
            });
        }
        if self.step == FlowStep::Executing && self.active.is_some() {
            debug!(worker = %self.worker.key(), "back ignored while task is running");
            return Ok(self.step);
        }

        match self.step.previous() {
            Some(previous) => Ok(self.go(previous)),
            None => Ok(self.step),
        }
    }

    /// Fails when a task is already running for this worker, either in
    /// this flow or through a resolvable draft left by another.
    fn ensure_idle(&self) -> Result<(), FlowError> {
        if self.active.is_some() {
            return Err(FlowError::AlreadyActive);
        }
        if load_draft(&*self.ctx.drafts, &self.worker.login_id, self.ctx.catalog).is_ok() {
            return Err(FlowError::AlreadyActive);
        }
        Ok(())
    }

    fn ensure_step(&self, action: &'static str, expected: FlowStep) -> Result<(), FlowError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(FlowError::NotAllowed {
                action,
                step: self.step,
            })
        }
    }

    fn go(&mut self, step: FlowStep) -> FlowStep {
        debug!(worker = %self.worker.key(), from = %self.step, to = %step, "flow step");
        self.step = step;
        step
    }

    fn record<T>(&mut self, result: Result<T, FlowError>) -> Result<T, FlowError> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                debug!(worker = %self.worker.key(), step = %self.step, error = %e, "blocked");
                self.last_error = Some(e.clone());
            }
        }
        result
    }
}
