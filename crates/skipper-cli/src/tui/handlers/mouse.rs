//! Mouse handling.
//!
//! Only the wheel does anything: it moves focus to the pane under the
//! pointer, then scrolls it. Wheel events over chrome scroll whichever
//! pane already has focus.

use crossterm::event::{MouseEvent, MouseEventKind};

use crate::tui::app::{App, View};
use crate::tui::state::hit_test;

impl App {
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.view != View::Monitor {
            return;
        }

        let up = match mouse.kind {
            MouseEventKind::ScrollUp => true,
            MouseEventKind::ScrollDown => false,
            _ => return,
        };

        self.monitor.focus = hit_test(
            mouse.column,
            mouse.row,
            &self.monitor.bounds,
            self.monitor.focus,
        );
        if up {
            self.monitor.focused_viewport_mut().scroll_up(1);
        } else {
            self.monitor.focused_viewport_mut().scroll_down(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::{compute_layout, compute_pane_bounds, FocusPane};
    use crossterm::event::KeyModifiers;
    use skipper_core::{ExecConfig, Plan};

    fn wheel(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn monitor_app() -> App {
        let mut app = App::new(Plan::sample(), ExecConfig::default(), true);
        app.view = View::Monitor;
        app.monitor.dims = compute_layout(100, 30);
        app.monitor.bounds = compute_pane_bounds(&app.monitor.dims);
        app
    }

    #[test]
    fn test_wheel_reassigns_focus_to_the_pane_under_the_pointer() {
        let mut app = monitor_app();
        let inside_activity = app.monitor.bounds.activity;

        app.handle_mouse(wheel(
            MouseEventKind::ScrollUp,
            inside_activity.x + 1,
            inside_activity.y + 1,
        ));
        assert_eq!(app.monitor.focus, FocusPane::Activity);
    }

    #[test]
    fn test_wheel_over_chrome_scrolls_the_current_pane() {
        let mut app = monitor_app();
        app.monitor.focus = FocusPane::Tasks;

        // the status bar row misses every pane
        app.handle_mouse(wheel(MouseEventKind::ScrollDown, 50, 29));
        assert_eq!(app.monitor.focus, FocusPane::Tasks);
    }

    #[test]
    fn test_clicks_are_ignored() {
        let mut app = monitor_app();
        let before = app.monitor.focus;
        app.handle_mouse(wheel(
            MouseEventKind::Down(crossterm::event::MouseButton::Left),
            2,
            2,
        ));
        assert_eq!(app.monitor.focus, before);
    }
}
