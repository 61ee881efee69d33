//! Plan execution against an agent CLI.
//!
//! [`CliEngine`] runs each plan task as one or more attempts of the
//! configured agent command. The task prompt goes to the agent's stdin;
//! stdout is expected to carry stream-JSON events (one object per line)
//! and anything that does not parse passes through as plain output.
//!
//! Stdout events:
//!
//! ```text
//! {"type": "text", "text": "..."}
//! {"type": "tool_use", "name": "Read", "target": "src/main.rs"}
//! {"type": "tool_result"}
//! {"type": "usage", "input_tokens": 1200, "output_tokens": 80}
//! ```

use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::config::ExecConfig;
use crate::exec::error::ExecError;
use crate::exec::events::ExecutorEvents;
use crate::exec::output::OutputWriter;
use crate::plan::{Plan, PlanTask};

/// Runs a plan, reporting progress through callbacks and streaming text
/// through the output channel.
///
/// `run` returns `Err` only for infrastructure failures (unconfigured or
/// unspawnable command). Task failures end the plan through
/// [`ExecutorEvents::plan_failed`] and still return `Ok`. Cancellation is
/// not an error either: the engine kills the current attempt, stops
/// emitting events, and returns `Ok`.
#[async_trait]
pub trait Engine: Send + Sync {
    async fn run(
        &self,
        events: Arc<dyn ExecutorEvents>,
        output: OutputWriter,
        cancel: CancellationToken,
    ) -> Result<(), ExecError>;
}

/// Result of a single attempt at one task.
enum AttemptOutcome {
    Completed,
    Failed(String),
    Cancelled,
}

/// One stdout line of the agent's stream-JSON protocol.
#[derive(Debug, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    Text {
        text: String,
    },
    ToolUse {
        name: String,
        #[serde(default)]
        target: String,
    },
    ToolResult,
    Usage {
        #[serde(default)]
        input_tokens: u64,
        #[serde(default)]
        output_tokens: u64,
    },
}

/// Engine that spawns the configured agent CLI for every task attempt.
pub struct CliEngine {
    config: ExecConfig,
    plan: Plan,
}

impl CliEngine {
    pub fn new(config: ExecConfig, plan: Plan) -> Self {
        Self { config, plan }
    }

    async fn run_attempt(
        &self,
        task: &PlanTask,
        events: &Arc<dyn ExecutorEvents>,
        output: &OutputWriter,
        cancel: &CancellationToken,
    ) -> Result<AttemptOutcome, ExecError> {
        let mut cmd = Command::new(&self.config.command);
        cmd.args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| ExecError::Spawn {
            command: self.config.command.clone(),
            source,
        })?;

        // Feed the prompt and close stdin so the agent knows input is
        // complete. Write errors are ignored: the agent may legitimately
        // exit without reading, and the exit status decides the outcome.
        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(task.prompt.as_bytes()).await;
            let _ = stdin.write_all(b"\n").await;
            let _ = stdin.shutdown().await;
        }

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let stdout_task = {
            let events = Arc::clone(events);
            let output = output.clone();
            let config = self.config.clone();
            tokio::spawn(async move {
                if let Some(stdout) = stdout {
                    let mut reader = BufReader::new(stdout).lines();
                    while let Ok(Some(line)) = reader.next_line().await {
                        process_stream_line(&line, &events, &output, &config).await;
                    }
                }
            })
        };

        let stderr_task = {
            let output = output.clone();
            tokio::spawn(async move {
                let mut last_line: Option<String> = None;
                if let Some(stderr) = stderr {
                    let mut reader = BufReader::new(stderr).lines();
                    while let Ok(Some(line)) = reader.next_line().await {
                        if !line.trim().is_empty() {
                            last_line = Some(line.clone());
                        }
                        output.send(format!("{}\n", line));
                    }
                }
                last_line
            })
        };

        let status = tokio::select! {
            status = child.wait() => status?,
            _ = cancel.cancelled() => {
                let _ = child.kill().await;
                stdout_task.abort();
                stderr_task.abort();
                return Ok(AttemptOutcome::Cancelled);
            }
        };

        // Let the readers drain whatever the process left buffered.
        let _ = stdout_task.await;
        let last_err = stderr_task.await.unwrap_or(None);

        if status.success() {
            Ok(AttemptOutcome::Completed)
        } else {
            let reason = last_err.unwrap_or_else(|| format!("agent exited with {}", status));
            Ok(AttemptOutcome::Failed(reason))
        }
    }
}

#[async_trait]
impl Engine for CliEngine {
    async fn run(
        &self,
        events: Arc<dyn ExecutorEvents>,
        output: OutputWriter,
        cancel: CancellationToken,
    ) -> Result<(), ExecError> {
        if self.config.command.trim().is_empty() {
            return Err(ExecError::MissingCommand);
        }

        let started = Instant::now();
        let total = self.plan.total_tasks();
        let max_attempts = self.config.max_attempts.max(1);

        for (index, task) in self.plan.tasks.iter().enumerate() {
            let mut attempt = 1;
            loop {
                if cancel.is_cancelled() {
                    return Ok(());
                }

                output.send_boundary();
                events
                    .task_started(index + 1, total, &task.id, &task.title, attempt)
                    .await;
                tracing::info!(
                    task = %task.id,
                    attempt,
                    "starting task {}/{}",
                    index + 1,
                    total
                );

                match self.run_attempt(task, &events, &output, &cancel).await? {
                    AttemptOutcome::Completed => {
                        events.task_completed(&task.id).await;
                        break;
                    }
                    AttemptOutcome::Cancelled => {
                        tracing::info!(task = %task.id, "run cancelled");
                        return Ok(());
                    }
                    AttemptOutcome::Failed(reason) => {
                        tracing::warn!(task = %task.id, attempt, "attempt failed: {}", reason);
                        events.task_failed(&task.id, attempt, &reason).await;
                        if attempt >= max_attempts {
                            events.plan_failed(&task.id, &reason).await;
                            return Ok(());
                        }
                        attempt += 1;
                    }
                }
            }
        }

        events.plan_completed(total, total, started.elapsed()).await;
        Ok(())
    }
}

/// Classify one stdout line and dispatch it.
///
/// Lines that do not parse as stream-JSON pass through as plain output
/// with their newline restored.
async fn process_stream_line(
    line: &str,
    events: &Arc<dyn ExecutorEvents>,
    output: &OutputWriter,
    config: &ExecConfig,
) {
    if line.starts_with('{') {
        if let Ok(event) = serde_json::from_str::<StreamEvent>(line) {
            match event {
                StreamEvent::Text { text } => output.send(text),
                StreamEvent::ToolUse { name, target } => {
                    output.send_tool_marker();
                    events.tool_used(&name, &target).await;
                }
                StreamEvent::ToolResult => {
                    events.tool_result().await;
                    output.send_tool_marker();
                }
                StreamEvent::Usage {
                    input_tokens,
                    output_tokens,
                } => {
                    let cost = config.cost_for(input_tokens, output_tokens);
                    events.usage(input_tokens, output_tokens, cost).await;
                }
            }
            return;
        }
    }
    output.send(format!("{}\n", line));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::output::{output_channel, TOOL_MARKER};
    use crate::exec::testing::RecordingEvents;
    use crate::plan::PlanTask;

    fn sh_plan(tasks: usize) -> Plan {
        Plan {
            title: "test".to_string(),
            tasks: (1..=tasks)
                .map(|i| PlanTask {
                    id: format!("t{}", i),
                    title: format!("Task {}", i),
                    prompt: "noop".to_string(),
                })
                .collect(),
        }
    }

    fn sh_config(script: &str) -> ExecConfig {
        ExecConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            max_attempts: 2,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_command_is_an_error() {
        let engine = CliEngine::new(ExecConfig::default(), sh_plan(1));
        let events = RecordingEvents::new();
        let (writer, _reader) = output_channel();

        let result = engine
            .run(events.clone(), writer, CancellationToken::new())
            .await;

        assert!(matches!(result, Err(ExecError::MissingCommand)));
        assert!(events.entries().is_empty());
    }

    #[tokio::test]
    async fn test_run_completes_every_task() {
        let engine = CliEngine::new(sh_config("cat >/dev/null"), sh_plan(2));
        let events = RecordingEvents::new();
        let (writer, _reader) = output_channel();

        engine
            .run(events.clone(), writer, CancellationToken::new())
            .await
            .unwrap();

        let log = events.entries();
        assert_eq!(
            log,
            vec![
                "task_started 1/2 t1 attempt 1",
                "task_completed t1",
                "task_started 2/2 t2 attempt 1",
                "task_completed t2",
                "plan_completed 2/2",
            ]
        );
    }

    #[tokio::test]
    async fn test_run_retries_then_fails_plan() {
        let engine = CliEngine::new(sh_config("cat >/dev/null; exit 3"), sh_plan(2));
        let events = RecordingEvents::new();
        let (writer, _reader) = output_channel();

        engine
            .run(events.clone(), writer, CancellationToken::new())
            .await
            .unwrap();

        let log = events.entries();
        assert_eq!(
            log,
            vec![
                "task_started 1/2 t1 attempt 1",
                "task_failed t1 attempt 1",
                "task_started 1/2 t1 attempt 2",
                "task_failed t1 attempt 2",
                "plan_failed t1",
            ]
        );
    }

    #[tokio::test]
    async fn test_pre_cancelled_run_emits_nothing() {
        let engine = CliEngine::new(sh_config("cat >/dev/null"), sh_plan(1));
        let events = RecordingEvents::new();
        let (writer, _reader) = output_channel();
        let cancel = CancellationToken::new();
        cancel.cancel();

        engine.run(events.clone(), writer, cancel).await.unwrap();

        assert!(events.entries().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_mid_attempt_stops_the_run() {
        let engine = CliEngine::new(sh_config("sleep 5"), sh_plan(1));
        let events = RecordingEvents::new();
        let (writer, _reader) = output_channel();
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            canceller.cancel();
        });

        engine.run(events.clone(), writer, cancel).await.unwrap();

        let log = events.entries();
        assert_eq!(log, vec!["task_started 1/1 t1 attempt 1"]);
    }

    #[tokio::test]
    async fn test_stream_line_text_passes_through() {
        let events = RecordingEvents::new();
        let (writer, mut reader) = output_channel();
        let config = ExecConfig::default();

        let typed: Arc<dyn ExecutorEvents> = events.clone();
        process_stream_line(
            r#"{"type": "text", "text": "hello\n"}"#,
            &typed,
            &writer,
            &config,
        )
        .await;
        drop(writer);

        assert_eq!(reader.next_chunk().await.as_deref(), Some("hello\n"));
        assert!(events.entries().is_empty());
    }

    #[tokio::test]
    async fn test_stream_line_tool_events_fire_callbacks_and_markers() {
        let events = RecordingEvents::new();
        let (writer, mut reader) = output_channel();
        let config = ExecConfig::default();

        let typed: Arc<dyn ExecutorEvents> = events.clone();
        process_stream_line(
            r#"{"type": "tool_use", "name": "Read", "target": "src/main.rs"}"#,
            &typed,
            &writer,
            &config,
        )
        .await;
        process_stream_line(r#"{"type": "tool_result"}"#, &typed, &writer, &config).await;
        drop(writer);

        assert_eq!(
            events.entries(),
            vec!["tool_used Read src/main.rs", "tool_result"]
        );
        let first = reader.next_chunk().await.unwrap();
        let second = reader.next_chunk().await.unwrap();
        assert_eq!(first.trim_end(), TOOL_MARKER);
        assert_eq!(second.trim_end(), TOOL_MARKER);
    }

    #[tokio::test]
    async fn test_stream_line_usage_applies_rates() {
        let events = RecordingEvents::new();
        let (writer, _reader) = output_channel();
        let config = ExecConfig {
            input_cost_per_mtok: 1.0,
            output_cost_per_mtok: 10.0,
            ..Default::default()
        };

        let typed: Arc<dyn ExecutorEvents> = events.clone();
        process_stream_line(
            r#"{"type": "usage", "input_tokens": 1000000, "output_tokens": 100000}"#,
            &typed,
            &writer,
            &config,
        )
        .await;

        assert_eq!(events.entries(), vec!["usage 1000000 100000 $2.00"]);
    }

    #[tokio::test]
    async fn test_stream_line_unknown_json_passes_through() {
        let events = RecordingEvents::new();
        let (writer, mut reader) = output_channel();
        let config = ExecConfig::default();

        let typed: Arc<dyn ExecutorEvents> = events.clone();
        process_stream_line(r#"{"type": "mystery"}"#, &typed, &writer, &config).await;
        process_stream_line("plain text", &typed, &writer, &config).await;
        drop(writer);

        assert_eq!(
            reader.next_chunk().await.as_deref(),
            Some("{\"type\": \"mystery\"}\n")
        );
        assert_eq!(reader.next_chunk().await.as_deref(), Some("plain text\n"));
        assert!(events.entries().is_empty());
    }
}
