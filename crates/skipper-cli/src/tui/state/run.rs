//! Run lifecycle state.

use std::time::Duration;

/// Where the supervised run is in its life.
///
/// `Running` and `Cancelling` are live; `Done` and `Cancelled` are
/// terminal and ignore further lifecycle input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Running,
    Cancelling,
    Done { success: bool },
    Cancelled,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Done { .. } | RunPhase::Cancelled)
    }

    /// Spinner animation and elapsed-time ticking run only while active.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

/// Per-task display status in the progress pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone)]
pub struct TaskDisplay {
    pub title: String,
    pub status: TaskStatus,
}

/// Token and cost counters. Per-task counts reset on each task start;
/// totals are monotonic across the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageCounters {
    pub task_tokens: u64,
    pub total_tokens: u64,
    pub estimated_cost_usd: f64,
}

impl UsageCounters {
    pub fn on_task_start(&mut self) {
        self.task_tokens = 0;
    }

    pub fn record(&mut self, input_tokens: u64, output_tokens: u64, cost_usd: f64) {
        let tokens = input_tokens + output_tokens;
        self.task_tokens += tokens;
        self.total_tokens += tokens;
        self.estimated_cost_usd += cost_usd;
    }
}

/// `mm:ss`, growing to `hh:mm:ss` past an hour.
pub fn format_elapsed(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else {
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(5)), "00:05");
        assert_eq!(format_elapsed(Duration::from_secs(65)), "01:05");
        assert_eq!(format_elapsed(Duration::from_secs(3599)), "59:59");
        assert_eq!(format_elapsed(Duration::from_secs(3700)), "01:01:40");
    }

    #[test]
    fn test_usage_counters_reset_per_task_but_not_totals() {
        let mut usage = UsageCounters::default();
        usage.record(1000, 200, 0.01);
        usage.on_task_start();
        usage.record(500, 100, 0.005);

        assert_eq!(usage.task_tokens, 600);
        assert_eq!(usage.total_tokens, 1800);
        assert!((usage.estimated_cost_usd - 0.015).abs() < 1e-9);
    }

    #[test]
    fn test_phase_classification() {
        assert!(RunPhase::Running.is_active());
        assert!(RunPhase::Cancelling.is_active());
        assert!(RunPhase::Done { success: true }.is_terminal());
        assert!(RunPhase::Done { success: false }.is_terminal());
        assert!(RunPhase::Cancelled.is_terminal());
    }
}
