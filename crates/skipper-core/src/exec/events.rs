//! Progress callbacks from a running plan.

use async_trait::async_trait;
use std::time::Duration;

/// Receives lifecycle and telemetry notifications while a plan runs.
///
/// Implementations decide delivery semantics. Lifecycle notifications
/// (task and plan boundaries) are authoritative: a consumer that drops
/// them will disagree with the engine about what happened. Tool and
/// usage notifications are supplementary and may be shed under load.
#[async_trait]
pub trait ExecutorEvents: Send + Sync {
    /// A task attempt is starting. `attempt` counts from 1.
    async fn task_started(
        &self,
        task_num: usize,
        total: usize,
        task_id: &str,
        title: &str,
        attempt: u32,
    );

    /// The current task finished successfully.
    async fn task_completed(&self, task_id: &str);

    /// An attempt at the current task failed. The engine may retry.
    async fn task_failed(&self, task_id: &str, attempt: u32, reason: &str);

    /// The agent invoked a tool.
    async fn tool_used(&self, name: &str, target: &str);

    /// The most recent tool invocation finished.
    async fn tool_result(&self);

    /// Token counts reported by the agent, with an estimated cost in USD.
    async fn usage(&self, input_tokens: u64, output_tokens: u64, cost_usd: f64);

    /// Every task finished successfully.
    async fn plan_completed(&self, succeeded: usize, total: usize, duration: Duration);

    /// A task exhausted its attempts; the plan stopped there.
    async fn plan_failed(&self, task_id: &str, reason: &str);
}
