//! Engine to UI plumbing.
//!
//! The engine runs on its own task and talks to the dashboard through
//! one bounded message channel. Delivery semantics are per message:
//! lifecycle signals block the sender until queued (the UI drains every
//! frame, so this settles quickly), while stream telemetry is shed when
//! the queue is full. A stalled UI therefore slows telemetry down to
//! nothing but can never lose a lifecycle edge or wedge the engine
//! behind a dropped one.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use skipper_core::{output_channel, Engine, ExecutorEvents, OutputReader};

/// Bound on queued UI messages.
const UI_CHANNEL_CAPACITY: usize = 256;

/// Everything the dashboard can learn about a run.
#[derive(Debug)]
pub enum UiMessage {
    /// Run accepted; carries the cancellation handle. Must-deliver.
    EngineReady { cancel: CancellationToken },

    /// A task attempt began. Must-deliver.
    TaskStarted {
        task_num: usize,
        total: usize,
        task_id: String,
        title: String,
        attempt: u32,
    },

    /// A task finished successfully. Must-deliver.
    TaskCompleted { task_id: String },

    /// A task attempt failed; the engine may retry. Must-deliver.
    TaskFailed {
        task_id: String,
        attempt: u32,
        reason: String,
    },

    /// Every task succeeded. Must-deliver.
    PlanCompleted {
        succeeded: usize,
        total: usize,
        duration: Duration,
    },

    /// The run stopped at a failing task or could not start. Must-deliver.
    PlanFailed {
        task_id: Option<String>,
        reason: String,
    },

    /// The engine acknowledged cancellation and stopped. Must-deliver.
    PlanCancelled,

    /// The agent invoked a tool. Best-effort.
    ToolUsed { name: String, target: String },

    /// The latest tool invocation finished. Best-effort.
    ToolResult,

    /// Token counts and estimated cost. Best-effort.
    Usage {
        input_tokens: u64,
        output_tokens: u64,
        cost_usd: f64,
    },

    /// Raw agent output. Best-effort.
    OutputChunk { text: String },
}

/// Sender half with the two delivery disciplines.
#[derive(Clone)]
pub struct UiTx {
    tx: mpsc::Sender<UiMessage>,
}

impl UiTx {
    /// Queue a lifecycle message, waiting for space if the channel is
    /// full. Loss of one of these would leave the dashboard lying about
    /// the run, so the sender absorbs the wait instead.
    pub async fn must_deliver(&self, msg: UiMessage) {
        if self.tx.send(msg).await.is_err() {
            tracing::debug!("ui channel closed; run outlived the dashboard");
        }
    }

    /// Queue a telemetry message if there is room, drop it otherwise.
    pub fn best_effort(&self, msg: UiMessage) {
        match self.tx.try_send(msg) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::trace!("ui channel full; dropping telemetry");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}

/// Create the dashboard's message channel.
pub fn ui_channel() -> (UiTx, mpsc::Receiver<UiMessage>) {
    let (tx, rx) = mpsc::channel(UI_CHANNEL_CAPACITY);
    (UiTx { tx }, rx)
}

/// Adapts engine callbacks onto the message channel, one message per
/// callback.
pub struct EngineBridge {
    tx: UiTx,
}

impl EngineBridge {
    pub fn new(tx: UiTx) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl ExecutorEvents for EngineBridge {
    async fn task_started(
        &self,
        task_num: usize,
        total: usize,
        task_id: &str,
        title: &str,
        attempt: u32,
    ) {
        self.tx
            .must_deliver(UiMessage::TaskStarted {
                task_num,
                total,
                task_id: task_id.to_string(),
                title: title.to_string(),
                attempt,
            })
            .await;
    }

    async fn task_completed(&self, task_id: &str) {
        self.tx
            .must_deliver(UiMessage::TaskCompleted {
                task_id: task_id.to_string(),
            })
            .await;
    }

    async fn task_failed(&self, task_id: &str, attempt: u32, reason: &str) {
        self.tx
            .must_deliver(UiMessage::TaskFailed {
                task_id: task_id.to_string(),
                attempt,
                reason: reason.to_string(),
            })
            .await;
    }

    async fn tool_used(&self, name: &str, target: &str) {
        self.tx.best_effort(UiMessage::ToolUsed {
            name: name.to_string(),
            target: target.to_string(),
        });
    }

    async fn tool_result(&self) {
        self.tx.best_effort(UiMessage::ToolResult);
    }

    async fn usage(&self, input_tokens: u64, output_tokens: u64, cost_usd: f64) {
        self.tx.best_effort(UiMessage::Usage {
            input_tokens,
            output_tokens,
            cost_usd,
        });
    }

    async fn plan_completed(&self, succeeded: usize, total: usize, duration: Duration) {
        self.tx
            .must_deliver(UiMessage::PlanCompleted {
                succeeded,
                total,
                duration,
            })
            .await;
    }

    async fn plan_failed(&self, task_id: &str, reason: &str) {
        self.tx
            .must_deliver(UiMessage::PlanFailed {
                task_id: Some(task_id.to_string()),
                reason: reason.to_string(),
            })
            .await;
    }
}

/// Relay output chunks onto the message channel until the engine drops
/// its writer.
fn spawn_output_pump(mut reader: OutputReader, tx: UiTx) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(text) = reader.next_chunk().await {
            tx.best_effort(UiMessage::OutputChunk { text });
        }
        tracing::debug!("output stream closed");
    })
}

/// Run the engine on a background task, wiring callbacks and output to
/// the UI channel. The cancellation handle reaches the dashboard as the
/// first message; the closing lifecycle message is derived from how the
/// run ends.
pub fn spawn_run(engine: Arc<dyn Engine>, tx: UiTx) -> JoinHandle<()> {
    tokio::spawn(async move {
        let cancel = CancellationToken::new();
        let (writer, reader) = output_channel();
        let pump = spawn_output_pump(reader, tx.clone());
        let events: Arc<dyn ExecutorEvents> = Arc::new(EngineBridge::new(tx.clone()));

        tx.must_deliver(UiMessage::EngineReady {
            cancel: cancel.clone(),
        })
        .await;

        match engine.run(events, writer, cancel.clone()).await {
            Err(e) => {
                tracing::error!("run failed: {}", e);
                tx.must_deliver(UiMessage::PlanFailed {
                    task_id: None,
                    reason: e.to_string(),
                })
                .await;
            }
            Ok(()) if cancel.is_cancelled() => {
                tx.must_deliver(UiMessage::PlanCancelled).await;
            }
            Ok(()) => {}
        }

        let _ = pump.await;
    })
}
