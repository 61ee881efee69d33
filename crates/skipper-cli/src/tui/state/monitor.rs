//! Aggregate state for the monitor view.
//!
//! One instance per run. Engine messages mutate it through
//! `apply_message` (see the engine handler); rendering reads it and
//! rebuilds pane lines when the dirty flags say so.

use ratatui::text::Line;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use skipper_core::Plan;

use super::focus::FocusPane;
use super::layout::{MonitorDims, PaneBounds};
use super::run::{RunPhase, TaskDisplay, TaskStatus, UsageCounters};
use super::timeline::ActivityTimeline;
use super::viewport::ScrollViewport;

pub struct MonitorState {
    pub phase: RunPhase,
    pub started_at: Instant,
    /// Frozen elapsed time once the run reaches a terminal phase.
    pub elapsed_final: Option<Duration>,

    pub plan_title: String,
    pub task_ids: Vec<String>,
    pub tasks: Vec<TaskDisplay>,
    /// `(task_num, total)` of the task currently running.
    pub current_task: Option<(usize, usize)>,

    pub usage: UsageCounters,
    pub timeline: ActivityTimeline,

    /// Raw output as logical lines; wrapping happens at render time.
    pub output_lines: Vec<String>,
    /// Text after the last newline, waiting for the rest of its line.
    pub partial_line: String,
    /// A sentinel was seen; insert one blank line before the next
    /// visible text.
    pub pending_separator: bool,
    pub tools_in_flight: usize,

    /// Wrap cache for the output pane, valid for `wrapped_output_width`.
    pub wrapped_output: Vec<Line<'static>>,
    pub wrapped_output_width: u16,
    /// Spinner glyph last composed into the output pane, if any.
    pub last_indicator: Option<&'static str>,
    /// Spinner glyph last composed into the activity pane, if any.
    pub last_activity_frame: Option<&'static str>,

    pub focus: FocusPane,
    pub dims: MonitorDims,
    pub bounds: PaneBounds,

    pub output_vp: ScrollViewport,
    pub activity_vp: ScrollViewport,
    pub tasks_vp: ScrollViewport,

    pub output_dirty: bool,
    pub activity_dirty: bool,
    pub tasks_dirty: bool,

    /// "Stopping..." while cancelling, then the final summary.
    pub status_message: String,

    cancel: Option<CancellationToken>,
    cancel_requested: bool,
    cancel_sent: bool,
}

impl MonitorState {
    pub fn new(plan: &Plan) -> Self {
        Self {
            phase: RunPhase::Running,
            started_at: Instant::now(),
            elapsed_final: None,
            plan_title: plan.title.clone(),
            task_ids: plan.tasks.iter().map(|t| t.id.clone()).collect(),
            tasks: plan
                .tasks
                .iter()
                .map(|t| TaskDisplay {
                    title: t.title.clone(),
                    status: TaskStatus::Pending,
                })
                .collect(),
            current_task: None,
            usage: UsageCounters::default(),
            timeline: ActivityTimeline::new(),
            output_lines: Vec::new(),
            partial_line: String::new(),
            pending_separator: false,
            tools_in_flight: 0,
            wrapped_output: Vec::new(),
            wrapped_output_width: 0,
            last_indicator: None,
            last_activity_frame: None,
            focus: FocusPane::Output,
            dims: MonitorDims::default(),
            bounds: PaneBounds::default(),
            output_vp: ScrollViewport::new(),
            activity_vp: ScrollViewport::new(),
            tasks_vp: ScrollViewport::new(),
            output_dirty: true,
            activity_dirty: true,
            tasks_dirty: true,
            status_message: String::new(),
            cancel: None,
            cancel_requested: false,
            cancel_sent: false,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_final
            .unwrap_or_else(|| self.started_at.elapsed())
    }

    pub fn completed_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count()
    }

    pub fn task_index(&self, task_id: &str) -> Option<usize> {
        self.task_ids.iter().position(|id| id == task_id)
    }

    pub fn focused_viewport_mut(&mut self) -> &mut ScrollViewport {
        match self.focus {
            FocusPane::Output => &mut self.output_vp,
            FocusPane::Activity => &mut self.activity_vp,
            FocusPane::Tasks => &mut self.tasks_vp,
        }
    }

    // ========================================================================
    // Cancellation
    // ========================================================================

    /// User asked to stop. Idempotent: repeated requests never signal
    /// the engine twice, and requests before the handle arrives are
    /// honored the moment it does.
    pub fn request_cancel(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        if !self.cancel_requested {
            self.cancel_requested = true;
            self.phase = RunPhase::Cancelling;
            self.status_message = "Stopping...".to_string();
        }
        self.fire_cancel_if_ready();
    }

    /// Store the engine's cancellation handle.
    pub fn attach_cancel_handle(&mut self, token: CancellationToken) {
        self.cancel = Some(token);
        self.fire_cancel_if_ready();
    }

    fn fire_cancel_if_ready(&mut self) {
        if self.cancel_requested && !self.cancel_sent {
            if let Some(token) = &self.cancel {
                token.cancel();
                self.cancel_sent = true;
            }
        }
    }

    #[cfg(test)]
    pub fn cancel_signalled(&self) -> bool {
        self.cancel_sent
    }
}
