//! Pane focus and pointer routing.
//!
//! Exactly one pane holds scroll focus. The keyboard cycles it; the
//! mouse wheel reassigns it to whichever pane is under the pointer
//! before scrolling, and leaves it alone when the pointer is over
//! chrome (borders, status bar, gaps).

use ratatui::layout::Position;

use super::layout::PaneBounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPane {
    #[default]
    Output,
    Activity,
    Tasks,
}

impl FocusPane {
    /// Cycle order for the focus key.
    pub fn next(self) -> Self {
        match self {
            FocusPane::Output => FocusPane::Activity,
            FocusPane::Activity => FocusPane::Tasks,
            FocusPane::Tasks => FocusPane::Output,
        }
    }
}

/// Resolve a pointer position to a pane, keeping the current focus when
/// the position misses every pane.
pub fn hit_test(x: u16, y: u16, bounds: &PaneBounds, current: FocusPane) -> FocusPane {
    let position = Position::new(x, y);
    if bounds.activity.contains(position) {
        FocusPane::Activity
    } else if bounds.tasks.contains(position) {
        FocusPane::Tasks
    } else if bounds.output.contains(position) {
        FocusPane::Output
    } else {
        current
    }
}
