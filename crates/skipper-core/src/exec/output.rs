//! Streaming output channel between engine and consumer.
//!
//! The engine writes raw text chunks as they arrive from the agent;
//! the consumer reads them at its own pace. The channel is bounded and
//! the writer sheds chunks when the consumer falls behind, so a slow or
//! stalled UI can never stall the agent.
//!
//! Two sentinel lines flow through the same stream: [`TOOL_MARKER`]
//! separates text around a tool invocation, [`BOUNDARY_MARKER`] separates
//! tasks and attempts. Consumers drop the sentinels and render their own
//! separation.

use tokio::sync::mpsc;

/// Sentinel line emitted around tool invocations.
pub const TOOL_MARKER: &str = "[[skipper:tool]]";

/// Sentinel line emitted at task and attempt boundaries.
pub const BOUNDARY_MARKER: &str = "[[skipper:boundary]]";

const OUTPUT_CHANNEL_CAPACITY: usize = 256;

/// Create a connected writer/reader pair.
pub fn output_channel() -> (OutputWriter, OutputReader) {
    let (tx, rx) = mpsc::channel(OUTPUT_CHANNEL_CAPACITY);
    (OutputWriter { tx }, OutputReader { rx })
}

/// Engine-side handle. Cloneable so concurrent stream readers can share it.
#[derive(Clone)]
pub struct OutputWriter {
    tx: mpsc::Sender<String>,
}

impl OutputWriter {
    /// Queue a chunk. Drops it silently when the channel is full or the
    /// reader is gone.
    pub fn send(&self, chunk: impl Into<String>) {
        match self.tx.try_send(chunk.into()) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::trace!("output channel full; dropping chunk");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }

    /// Queue a whole line, newline included.
    pub fn send_line(&self, line: &str) {
        self.send(format!("{}\n", line));
    }

    /// Queue the tool sentinel line.
    pub fn send_tool_marker(&self) {
        self.send_line(TOOL_MARKER);
    }

    /// Queue the task/attempt boundary sentinel line.
    pub fn send_boundary(&self) {
        self.send_line(BOUNDARY_MARKER);
    }
}

/// Consumer-side handle.
pub struct OutputReader {
    rx: mpsc::Receiver<String>,
}

impl OutputReader {
    /// Next chunk, or `None` once every writer is gone and the queue is
    /// drained.
    pub async fn next_chunk(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_chunks_arrive_in_order() {
        let (writer, mut reader) = output_channel();
        writer.send("one");
        writer.send("two");
        drop(writer);

        assert_eq!(reader.next_chunk().await.as_deref(), Some("one"));
        assert_eq!(reader.next_chunk().await.as_deref(), Some("two"));
        assert_eq!(reader.next_chunk().await, None);
    }

    #[tokio::test]
    async fn test_markers_are_complete_lines() {
        let (writer, mut reader) = output_channel();
        writer.send_boundary();
        writer.send_tool_marker();
        drop(writer);

        assert_eq!(
            reader.next_chunk().await.as_deref(),
            Some("[[skipper:boundary]]\n")
        );
        assert_eq!(
            reader.next_chunk().await.as_deref(),
            Some("[[skipper:tool]]\n")
        );
    }

    #[tokio::test]
    async fn test_full_channel_sheds_instead_of_blocking() {
        let (writer, mut reader) = output_channel();
        for i in 0..OUTPUT_CHANNEL_CAPACITY + 10 {
            writer.send(format!("chunk {}", i));
        }
        drop(writer);

        let mut received = 0;
        while reader.next_chunk().await.is_some() {
            received += 1;
        }
        assert_eq!(received, OUTPUT_CHANNEL_CAPACITY);
    }
}
