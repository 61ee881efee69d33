//! Plan execution.
//!
//! An [`Engine`] runs a plan and reports progress through
//! [`ExecutorEvents`] callbacks plus a line-oriented output channel.
//! [`CliEngine`] spawns the configured agent CLI per task attempt;
//! [`ScriptedEngine`] replays a canned run for demo mode and tests.

pub mod engine;
pub mod error;
pub mod events;
pub mod output;
pub mod script;

pub use engine::{CliEngine, Engine};
pub use error::ExecError;
pub use events::ExecutorEvents;
pub use output::{output_channel, OutputReader, OutputWriter, BOUNDARY_MARKER, TOOL_MARKER};
pub use script::{ScriptStep, ScriptedEngine};

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::events::ExecutorEvents;

    /// Records every callback as one formatted line, for asserting
    /// event sequences in tests.
    pub(crate) struct RecordingEvents {
        log: Mutex<Vec<String>>,
    }

    impl RecordingEvents {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self {
                log: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn entries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }

        fn push(&self, entry: String) {
            self.log.lock().unwrap().push(entry);
        }
    }

    #[async_trait]
    impl ExecutorEvents for RecordingEvents {
        async fn task_started(
            &self,
            task_num: usize,
            total: usize,
            task_id: &str,
            _title: &str,
            attempt: u32,
        ) {
            self.push(format!(
                "task_started {}/{} {} attempt {}",
                task_num, total, task_id, attempt
            ));
        }

        async fn task_completed(&self, task_id: &str) {
            self.push(format!("task_completed {}", task_id));
        }

        async fn task_failed(&self, task_id: &str, attempt: u32, _reason: &str) {
            self.push(format!("task_failed {} attempt {}", task_id, attempt));
        }

        async fn tool_used(&self, name: &str, target: &str) {
            self.push(format!("tool_used {} {}", name, target));
        }

        async fn tool_result(&self) {
            self.push("tool_result".to_string());
        }

        async fn usage(&self, input_tokens: u64, output_tokens: u64, cost_usd: f64) {
            self.push(format!(
                "usage {} {} ${:.2}",
                input_tokens, output_tokens, cost_usd
            ));
        }

        async fn plan_completed(&self, succeeded: usize, total: usize, _duration: Duration) {
            self.push(format!("plan_completed {}/{}", succeeded, total));
        }

        async fn plan_failed(&self, task_id: &str, _reason: &str) {
            self.push(format!("plan_failed {}", task_id));
        }
    }
}
