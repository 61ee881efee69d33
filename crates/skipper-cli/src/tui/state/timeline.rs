//! Activity timeline state.
//!
//! A capped FIFO of timestamped entries: tool invocations, attempt
//! notes, and task separators. The newest entry can be flipped to done
//! when its tool result arrives; everything older is immutable.

use chrono::{DateTime, Local};
use std::collections::VecDeque;

/// Upper bound on retained entries. The oldest entries are evicted
/// first once the cap is reached.
pub const MAX_ENTRIES: usize = 2000;

#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub text: String,
    pub timestamp: DateTime<Local>,
    pub indent: u8,
    pub done: bool,
    pub separator: bool,
}

#[derive(Debug, Default)]
pub struct ActivityTimeline {
    entries: VecDeque<ActivityEntry>,
}

impl ActivityTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an in-progress entry.
    pub fn add(&mut self, text: impl Into<String>, indent: u8) {
        self.push(ActivityEntry {
            text: text.into(),
            timestamp: Local::now(),
            indent,
            done: false,
            separator: false,
        });
    }

    /// Append a task/attempt separator. Separators are never marked
    /// done.
    pub fn add_separator(&mut self, text: impl Into<String>) {
        self.push(ActivityEntry {
            text: text.into(),
            timestamp: Local::now(),
            indent: 0,
            done: false,
            separator: true,
        });
    }

    fn push(&mut self, entry: ActivityEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > MAX_ENTRIES {
            self.entries.pop_front();
        }
    }

    /// Flip the most recent entry to done. Earlier entries stay as they
    /// are, even when results arrive late and out of order.
    pub fn mark_last_done(&mut self) {
        if let Some(last) = self.entries.back_mut() {
            if !last.separator {
                last.done = true;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    /// True when the newest entry is still waiting on its result.
    pub fn last_in_progress(&self) -> bool {
        self.entries
            .back()
            .map(|e| !e.done && !e.separator)
            .unwrap_or(false)
    }
}
