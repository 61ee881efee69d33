//! Keyboard handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::tui::app::{App, View};

impl App {
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
            return;
        }
        match self.view {
            View::Home => self.handle_home_key(key),
            View::Monitor => self.handle_monitor_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter | KeyCode::Char('r') => self.start_run(),
            _ => {}
        }
    }

    /// While the run is live only cancel, focus, and scrolling work.
    /// Terminal phases add return-to-home and quit.
    fn handle_monitor_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            if self.monitor.phase.is_terminal() {
                self.should_quit = true;
            } else {
                self.monitor.request_cancel();
            }
            return;
        }

        if self.monitor.phase.is_terminal() {
            match key.code {
                KeyCode::Enter | KeyCode::Char('h') | KeyCode::Esc => {
                    self.view = View::Home;
                    return;
                }
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                _ => {}
            }
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Tab => self.monitor.focus = self.monitor.focus.next(),
            KeyCode::Up | KeyCode::Char('k') => self.monitor.focused_viewport_mut().scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.monitor.focused_viewport_mut().scroll_down(1)
            }
            KeyCode::PageUp => self.monitor.focused_viewport_mut().page_up(),
            KeyCode::PageDown => self.monitor.focused_viewport_mut().page_down(),
            KeyCode::Char('u') if ctrl => self.monitor.focused_viewport_mut().page_up(),
            KeyCode::Char('d') if ctrl => self.monitor.focused_viewport_mut().page_down(),
            KeyCode::Home | KeyCode::Char('g') => {
                self.monitor.focused_viewport_mut().scroll_to_top()
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.monitor.focused_viewport_mut().scroll_to_bottom()
            }
            _ => {}
        }
    }
}
