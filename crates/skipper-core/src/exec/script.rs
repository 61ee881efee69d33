//! Scripted runs for demo mode and tests.
//!
//! A [`ScriptedEngine`] replays a fixed sequence of steps through the
//! same callback and output surfaces as the real engine, so the
//! dashboard cannot tell the difference.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::exec::engine::Engine;
use crate::exec::error::ExecError;
use crate::exec::events::ExecutorEvents;
use crate::exec::output::OutputWriter;
use crate::plan::Plan;

/// One replayable step. Steps map one-to-one onto engine behavior:
/// callback invocations, output chunks, sentinel lines, and pacing.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    TaskStarted {
        task_num: usize,
        total: usize,
        task_id: String,
        title: String,
        attempt: u32,
    },
    TaskCompleted {
        task_id: String,
    },
    TaskFailed {
        task_id: String,
        attempt: u32,
        reason: String,
    },
    ToolUsed {
        name: String,
        target: String,
    },
    ToolResult,
    Usage {
        input_tokens: u64,
        output_tokens: u64,
        cost_usd: f64,
    },
    Output {
        text: String,
    },
    Boundary,
    ToolMarker,
    Pause {
        millis: u64,
    },
    /// `duration: None` reports the measured elapsed time instead of a
    /// recorded one.
    PlanCompleted {
        succeeded: usize,
        total: usize,
        duration: Option<Duration>,
    },
    PlanFailed {
        task_id: String,
        reason: String,
    },
}

/// Engine that replays a canned step sequence.
pub struct ScriptedEngine {
    steps: Vec<ScriptStep>,
}

impl ScriptedEngine {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    /// Build a paced walkthrough of the given plan where every task
    /// succeeds on the first attempt.
    pub fn demo(plan: &Plan) -> Self {
        let tools: [(&str, &str); 3] = [
            ("Read", "src/lib.rs"),
            ("Edit", "src/engine.rs"),
            ("Bash", "cargo test"),
        ];
        let total = plan.total_tasks();
        let mut steps = Vec::new();

        for (index, task) in plan.tasks.iter().enumerate() {
            let (tool, target) = tools[index % tools.len()];
            steps.push(ScriptStep::Boundary);
            steps.push(ScriptStep::TaskStarted {
                task_num: index + 1,
                total,
                task_id: task.id.clone(),
                title: task.title.clone(),
                attempt: 1,
            });
            steps.push(ScriptStep::Output {
                text: format!("Looking into \"{}\".\n", task.title),
            });
            steps.push(ScriptStep::Pause { millis: 400 });
            steps.push(ScriptStep::ToolMarker);
            steps.push(ScriptStep::ToolUsed {
                name: tool.to_string(),
                target: target.to_string(),
            });
            steps.push(ScriptStep::Pause { millis: 600 });
            steps.push(ScriptStep::ToolResult);
            steps.push(ScriptStep::ToolMarker);
            steps.push(ScriptStep::Usage {
                input_tokens: 2_400 + index as u64 * 800,
                output_tokens: 350 + index as u64 * 120,
                cost_usd: 0.012 + index as f64 * 0.004,
            });
            steps.push(ScriptStep::Output {
                text: format!("Done with {}. Everything checks out.\n", task.id),
            });
            steps.push(ScriptStep::Pause { millis: 300 });
            steps.push(ScriptStep::TaskCompleted {
                task_id: task.id.clone(),
            });
        }

        steps.push(ScriptStep::PlanCompleted {
            succeeded: total,
            total,
            duration: None,
        });

        Self::new(steps)
    }
}

#[async_trait]
impl Engine for ScriptedEngine {
    async fn run(
        &self,
        events: Arc<dyn ExecutorEvents>,
        output: OutputWriter,
        cancel: CancellationToken,
    ) -> Result<(), ExecError> {
        let started = Instant::now();

        for step in &self.steps {
            if cancel.is_cancelled() {
                return Ok(());
            }
            match step {
                ScriptStep::TaskStarted {
                    task_num,
                    total,
                    task_id,
                    title,
                    attempt,
                } => {
                    events
                        .task_started(*task_num, *total, task_id, title, *attempt)
                        .await;
                }
                ScriptStep::TaskCompleted { task_id } => events.task_completed(task_id).await,
                ScriptStep::TaskFailed {
                    task_id,
                    attempt,
                    reason,
                } => events.task_failed(task_id, *attempt, reason).await,
                ScriptStep::ToolUsed { name, target } => events.tool_used(name, target).await,
                ScriptStep::ToolResult => events.tool_result().await,
                ScriptStep::Usage {
                    input_tokens,
                    output_tokens,
                    cost_usd,
                } => {
                    events
                        .usage(*input_tokens, *output_tokens, *cost_usd)
                        .await;
                }
                ScriptStep::Output { text } => output.send(text.clone()),
                ScriptStep::Boundary => output.send_boundary(),
                ScriptStep::ToolMarker => output.send_tool_marker(),
                ScriptStep::Pause { millis } => {
                    tokio::select! {
                        _ = tokio::time::sleep(Duration::from_millis(*millis)) => {}
                        _ = cancel.cancelled() => return Ok(()),
                    }
                }
                ScriptStep::PlanCompleted {
                    succeeded,
                    total,
                    duration,
                } => {
                    let duration = duration.unwrap_or_else(|| started.elapsed());
                    events.plan_completed(*succeeded, *total, duration).await;
                }
                ScriptStep::PlanFailed { task_id, reason } => {
                    events.plan_failed(task_id, reason).await;
                }
            }
        }

        Ok(())
    }
}
