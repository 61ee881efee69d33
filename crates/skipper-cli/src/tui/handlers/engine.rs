//! Applying engine messages to monitor state.
//!
//! All run progress flows through [`MonitorState::apply_message`], one
//! message at a time, so every transition is testable without a
//! terminal. Lifecycle messages that arrive after a terminal phase are
//! ignored rather than trusted; telemetry still lands so trailing
//! output stays visible.

use skipper_core::{BOUNDARY_MARKER, TOOL_MARKER};

use crate::tui::app::App;
use crate::tui::bridge::UiMessage;
use crate::tui::state::{format_elapsed, MonitorState, RunPhase, TaskStatus};

impl App {
    /// Drain everything the run has queued since the last frame.
    pub fn poll_engine_messages(&mut self) {
        while let Ok(msg) = self.ui_rx.try_recv() {
            self.monitor.apply_message(msg);
            self.needs_redraw = true;
        }
    }
}

impl MonitorState {
    pub fn apply_message(&mut self, msg: UiMessage) {
        match msg {
            UiMessage::EngineReady { cancel } => {
                self.attach_cancel_handle(cancel);
            }

            UiMessage::TaskStarted {
                task_num,
                total,
                task_id,
                title,
                attempt,
            } => {
                if self.phase.is_terminal() {
                    return;
                }
                self.usage.on_task_start();
                self.current_task = Some((task_num, total));
                if let Some(index) = self.task_index(&task_id) {
                    self.tasks[index].status = TaskStatus::Running;
                }
                let separator = if attempt > 1 {
                    format!("Task {}/{}: {} (attempt {})", task_num, total, title, attempt)
                } else {
                    format!("Task {}/{}: {}", task_num, total, title)
                };
                self.timeline.add_separator(separator);
                self.pending_separator = true;
                self.tasks_dirty = true;
                self.activity_dirty = true;
            }

            UiMessage::TaskCompleted { task_id } => {
                if self.phase.is_terminal() {
                    return;
                }
                if let Some(index) = self.task_index(&task_id) {
                    self.tasks[index].status = TaskStatus::Completed;
                }
                self.tasks_dirty = true;
            }

            UiMessage::TaskFailed {
                task_id,
                attempt,
                reason,
            } => {
                if self.phase.is_terminal() {
                    return;
                }
                if let Some(index) = self.task_index(&task_id) {
                    self.tasks[index].status = TaskStatus::Failed;
                }
                self.timeline
                    .add(format!("Attempt {} failed: {}", attempt, reason), 1);
                self.timeline.mark_last_done();
                self.tasks_dirty = true;
                self.activity_dirty = true;
            }

            UiMessage::ToolUsed { name, target } => {
                self.tools_in_flight += 1;
                let text = if target.is_empty() {
                    name
                } else {
                    format!("{} {}", name, target)
                };
                self.timeline.add(text, 1);
                self.activity_dirty = true;
            }

            UiMessage::ToolResult => {
                self.tools_in_flight = self.tools_in_flight.saturating_sub(1);
                self.timeline.mark_last_done();
                self.activity_dirty = true;
            }

            UiMessage::Usage {
                input_tokens,
                output_tokens,
                cost_usd,
            } => {
                self.usage.record(input_tokens, output_tokens, cost_usd);
            }

            UiMessage::OutputChunk { text } => {
                self.push_output(&text);
            }

            UiMessage::PlanCompleted {
                succeeded,
                total,
                duration,
            } => {
                if self.phase.is_terminal() {
                    return;
                }
                self.flush_partial_output();
                self.phase = RunPhase::Done {
                    success: succeeded == total,
                };
                self.elapsed_final = Some(duration);
                self.current_task = None;
                self.status_message = format!(
                    "Done. Completed {}/{} tasks in {}.",
                    succeeded,
                    total,
                    format_elapsed(duration)
                );
            }

            UiMessage::PlanFailed { task_id, reason } => {
                if self.phase.is_terminal() {
                    return;
                }
                self.flush_partial_output();
                self.phase = RunPhase::Done { success: false };
                self.elapsed_final = Some(self.started_at.elapsed());
                self.current_task = None;
                self.status_message = match task_id {
                    Some(id) => format!("Failed at task {}: {}", id, reason),
                    None => format!("Run failed: {}", reason),
                };
            }

            UiMessage::PlanCancelled => {
                if self.phase.is_terminal() {
                    return;
                }
                self.flush_partial_output();
                self.phase = RunPhase::Cancelled;
                self.elapsed_final = Some(self.started_at.elapsed());
                self.current_task = None;
                self.status_message = format!(
                    "Stopped. Completed {}/{} tasks.",
                    self.completed_count(),
                    self.tasks.len()
                );
            }
        }
    }

    // ========================================================================
    // Output stream assembly
    // ========================================================================

    /// Buffer a raw chunk, promoting completed lines into the pane.
    pub fn push_output(&mut self, chunk: &str) {
        self.partial_line.push_str(chunk);
        while let Some(pos) = self.partial_line.find('\n') {
            let rest = self.partial_line.split_off(pos + 1);
            let mut line = std::mem::replace(&mut self.partial_line, rest);
            line.truncate(line.len() - 1);
            self.accept_output_line(line);
        }
    }

    /// Promote whatever is left in the partial buffer. Called when the
    /// run ends so a final unterminated line is not lost.
    pub fn flush_partial_output(&mut self) {
        if !self.partial_line.is_empty() {
            let line = std::mem::take(&mut self.partial_line);
            self.accept_output_line(line);
        }
    }

    /// Sentinel lines never render; they arm a separator that becomes
    /// one blank line before the next visible text. A sentinel glued to
    /// an unterminated chunk still counts, and its prefix still prints.
    fn accept_output_line(&mut self, raw: String) {
        let line = raw.trim_end_matches('\r');

        let (text, marker) = if line == TOOL_MARKER || line == BOUNDARY_MARKER {
            (None, true)
        } else if let Some(prefix) = line
            .strip_suffix(TOOL_MARKER)
            .or_else(|| line.strip_suffix(BOUNDARY_MARKER))
        {
            (Some(prefix.to_string()), true)
        } else {
            (Some(line.to_string()), false)
        };

        if let Some(text) = text {
            if self.pending_separator {
                let last_has_text = self
                    .output_lines
                    .last()
                    .map(|l| !l.is_empty())
                    .unwrap_or(false);
                if !text.is_empty() && last_has_text {
                    self.output_lines.push(String::new());
                }
                self.pending_separator = false;
            }
            self.output_lines.push(text);
            self.output_dirty = true;
        }

        if marker {
            self.pending_separator = true;
        }
    }
}
