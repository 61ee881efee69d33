//! Application core and main loop.

use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use skipper_core::{CliEngine, Engine, ExecConfig, Plan, ScriptedEngine};

use crate::tui::bridge::{spawn_run, ui_channel, UiMessage, UiTx};
use crate::tui::state::MonitorState;
use crate::tui::theme::Theme;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Monitor,
}

pub struct App {
    pub view: View,
    pub theme: Theme,
    pub plan: Plan,
    pub config: ExecConfig,
    pub demo: bool,
    pub monitor: MonitorState,
    pub should_quit: bool,
    pub needs_redraw: bool,
    pub ui_tx: UiTx,
    pub ui_rx: mpsc::Receiver<UiMessage>,
    run_task: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(plan: Plan, config: ExecConfig, demo: bool) -> Self {
        let (ui_tx, ui_rx) = ui_channel();
        let monitor = MonitorState::new(&plan);
        Self {
            view: View::Home,
            theme: Theme::default(),
            plan,
            config,
            demo,
            monitor,
            should_quit: false,
            needs_redraw: true,
            ui_tx,
            ui_rx,
            run_task: None,
        }
    }

    /// Launch the engine on a fresh channel and switch to the monitor.
    /// A fresh channel means a restarted run can never replay stale
    /// messages from the previous one.
    pub fn start_run(&mut self) {
        let (ui_tx, ui_rx) = ui_channel();
        self.ui_tx = ui_tx;
        self.ui_rx = ui_rx;
        self.monitor = MonitorState::new(&self.plan);

        let engine: Arc<dyn Engine> = if self.demo {
            Arc::new(ScriptedEngine::demo(&self.plan))
        } else {
            Arc::new(CliEngine::new(self.config.clone(), self.plan.clone()))
        };
        self.run_task = Some(spawn_run(engine, self.ui_tx.clone()));
        self.view = View::Monitor;
        self.needs_redraw = true;
        tracing::info!(title = %self.plan.title, demo = self.demo, "run started");
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let mut events = EventStream::new();

        loop {
            self.poll_engine_messages();

            // spinner and elapsed time tick while a run is live
            if self.view == View::Monitor && self.monitor.phase.is_active() {
                self.needs_redraw = true;
            }

            if self.needs_redraw {
                terminal.draw(|f| self.ui(f))?;
                self.needs_redraw = false;
            }

            tokio::select! {
                biased;

                maybe_event = events.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }
                _ = tokio::time::sleep(FRAME_INTERVAL) => {}
            }

            if self.should_quit {
                if let Some(task) = self.run_task.take() {
                    task.abort();
                }
                break;
            }
        }
        Ok(())
    }

    fn ui(&mut self, f: &mut Frame) {
        match self.view {
            View::Home => self.render_home(f),
            View::Monitor => self.render_monitor(f),
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                self.handle_key(key);
                self.needs_redraw = true;
            }
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                self.needs_redraw = true;
            }
            Event::Resize(_, _) => {
                self.monitor.output_dirty = true;
                self.monitor.activity_dirty = true;
                self.monitor.tasks_dirty = true;
                self.needs_redraw = true;
            }
            _ => {}
        }
    }
}
