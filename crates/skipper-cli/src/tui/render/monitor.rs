//! Monitor view rendering.
//!
//! Geometry comes from the layout engine each frame; pane content is
//! cached and rebuilt only when its dirty flag or width says so. The
//! rightmost content column of every pane is reserved for a scrollbar.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::app::App;
use crate::tui::components::{
    render_scrollbar, render_status_bar, spinner_frame, truncate_to_width,
};
use crate::tui::state::{
    compute_layout, compute_pane_bounds, format_elapsed, FocusPane, MonitorState, RunPhase,
    TaskStatus,
};
use crate::tui::theme::Theme;

impl App {
    pub fn render_monitor(&mut self, f: &mut Frame) {
        let area = f.area();
        let dims = compute_layout(area.width, area.height);
        let bounds = compute_pane_bounds(&dims);
        self.monitor.dims = dims;
        self.monitor.bounds = bounds;

        // one column per pane goes to the scrollbar
        let output_w = dims.output_content_w.saturating_sub(1).max(1);
        let activity_w = dims.activity_content_w.saturating_sub(1).max(1);
        let tasks_w = dims.tasks_content_w.saturating_sub(1).max(1);

        if self.monitor.activity_vp.width() != activity_w {
            self.monitor.activity_dirty = true;
        }
        if self.monitor.tasks_vp.width() != tasks_w {
            self.monitor.tasks_dirty = true;
        }
        self.monitor.output_vp.set_size(output_w, dims.output_content_h);
        self.monitor
            .activity_vp
            .set_size(activity_w, dims.activity_content_h);
        self.monitor.tasks_vp.set_size(tasks_w, dims.tasks_content_h);

        self.monitor.refresh_output_pane(&self.theme);
        self.monitor.refresh_activity_pane(&self.theme);
        self.monitor.refresh_tasks_pane(&self.theme);

        self.draw_pane(f, bounds.output, " Output ", FocusPane::Output);
        self.draw_pane(f, bounds.activity, " Activity ", FocusPane::Activity);
        self.draw_pane(f, bounds.tasks, " Tasks ", FocusPane::Tasks);
        self.draw_monitor_status_bar(f, area);
    }

    fn draw_pane(&self, f: &mut Frame, area: Rect, title: &str, pane: FocusPane) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let focused = self.monitor.focus == pane;
        let border_style = if focused {
            Style::default().fg(self.theme.focused_border_color)
        } else {
            Style::default().fg(self.theme.border_color)
        };
        let title_style = if focused {
            Style::default()
                .fg(self.theme.accent_color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.dim_color)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Span::styled(title.to_string(), title_style))
            .style(Style::default().bg(self.theme.bg_color));
        let inner = block.inner(area);
        f.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let vp = match pane {
            FocusPane::Output => &self.monitor.output_vp,
            FocusPane::Activity => &self.monitor.activity_vp,
            FocusPane::Tasks => &self.monitor.tasks_vp,
        };

        let text_area = Rect::new(inner.x, inner.y, inner.width.saturating_sub(1), inner.height);
        let paragraph = Paragraph::new(Text::from(vp.visible_lines().to_vec()));
        f.render_widget(paragraph, text_area);

        let bar_area = Rect::new(inner.right().saturating_sub(1), inner.y, 1, inner.height);
        render_scrollbar(
            f.buffer_mut(),
            bar_area,
            &self.theme,
            vp.offset(),
            vp.line_count(),
            inner.height as usize,
        );
    }

    fn draw_monitor_status_bar(&self, f: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let bar = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        let m = &self.monitor;
        let theme = &self.theme;

        let mut left: Vec<Span<'static>> = Vec::new();
        match m.phase {
            RunPhase::Running | RunPhase::Cancelling => {
                left.push(Span::styled(
                    format!("{} ", spinner_frame()),
                    Style::default().fg(theme.processing_color),
                ));
                left.push(Span::styled(
                    m.plan_title.clone(),
                    Style::default()
                        .fg(theme.title_color)
                        .add_modifier(Modifier::BOLD),
                ));
                if let Some((num, total)) = m.current_task {
                    left.push(Span::styled(
                        format!(" · Task {}/{}", num, total),
                        Style::default().fg(theme.text_color),
                    ));
                }
                left.push(Span::styled(
                    format!(" · {}", format_elapsed(m.elapsed())),
                    Style::default().fg(theme.dim_color),
                ));
                left.push(Span::styled(
                    format!(
                        " · {} tok · ${:.2}",
                        format_tokens(m.usage.total_tokens),
                        m.usage.estimated_cost_usd
                    ),
                    Style::default().fg(theme.dim_color),
                ));
                if m.phase == RunPhase::Cancelling {
                    left.push(Span::styled(
                        " · Stopping...",
                        Style::default().fg(theme.warning_color),
                    ));
                }
            }
            RunPhase::Done { success } => {
                let color = if success {
                    theme.success_color
                } else {
                    theme.error_color
                };
                left.push(Span::styled(
                    m.status_message.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ));
            }
            RunPhase::Cancelled => {
                left.push(Span::styled(
                    m.status_message.clone(),
                    Style::default()
                        .fg(theme.warning_color)
                        .add_modifier(Modifier::BOLD),
                ));
            }
        }

        let hints: &[(&str, &str)] = if m.phase.is_terminal() {
            &[("enter", "home"), ("q", "quit"), ("tab", "pane")]
        } else {
            &[("ctrl+c", "stop"), ("tab", "pane"), ("↑/↓", "scroll")]
        };

        render_status_bar(f.buffer_mut(), bar, theme, left, hints);
    }
}

impl MonitorState {
    /// Rebuild the output pane lines. The wrap cache survives frames;
    /// the working indicator is composed on top of it so spinner ticks
    /// never re-wrap the whole buffer.
    pub fn refresh_output_pane(&mut self, theme: &Theme) {
        let width = self.output_vp.width().max(1);
        let mut rebuilt = false;

        if self.output_dirty || self.wrapped_output_width != width {
            let wrap_width = width as usize;
            let mut lines = Vec::with_capacity(self.output_lines.len());
            for raw in &self.output_lines {
                if raw.is_empty() {
                    lines.push(Line::default());
                    continue;
                }
                for piece in textwrap::wrap(raw, wrap_width) {
                    lines.push(Line::styled(
                        piece.into_owned(),
                        Style::default().fg(theme.text_color),
                    ));
                }
            }
            self.wrapped_output = lines;
            self.wrapped_output_width = width;
            self.output_dirty = false;
            rebuilt = true;
        }

        let indicator = if self.tools_in_flight > 0 && self.phase.is_active() {
            Some(spinner_frame())
        } else {
            None
        };

        if rebuilt || indicator != self.last_indicator {
            let mut lines = self.wrapped_output.clone();
            if let Some(frame) = indicator {
                while lines.last().map(|l| l.width() == 0).unwrap_or(false) {
                    lines.pop();
                }
                if !lines.is_empty() {
                    lines.push(Line::default());
                }
                lines.push(Line::styled(
                    format!("{} Working...", frame),
                    Style::default().fg(theme.processing_color),
                ));
            }
            self.last_indicator = indicator;
            self.output_vp.set_lines(lines);
        }
    }

    /// Rebuild the activity pane lines when entries changed or the
    /// newest entry's spinner ticked.
    pub fn refresh_activity_pane(&mut self, theme: &Theme) {
        let width = self.activity_vp.width().max(1) as usize;
        let spinner = if self.phase.is_active() && self.timeline.last_in_progress() {
            Some(spinner_frame())
        } else {
            None
        };
        if !self.activity_dirty && spinner == self.last_activity_frame {
            return;
        }

        let count = self.timeline.len();
        let mut lines = Vec::with_capacity(count);
        for (i, entry) in self.timeline.iter().enumerate() {
            if entry.separator {
                lines.push(Line::styled(
                    truncate_to_width(&entry.text, width),
                    Style::default()
                        .fg(theme.separator_color)
                        .add_modifier(Modifier::BOLD),
                ));
                continue;
            }
            let is_newest = i + 1 == count;
            let glyph = match (entry.done, is_newest, spinner) {
                (true, _, _) => "✓",
                (false, true, Some(frame)) => frame,
                _ => "•",
            };
            let text = format!(
                "{} {}{} {}",
                entry.timestamp.format("%H:%M:%S"),
                "  ".repeat(entry.indent as usize),
                glyph,
                entry.text
            );
            let style = if entry.done {
                Style::default().fg(theme.dim_color)
            } else {
                Style::default().fg(theme.text_color)
            };
            lines.push(Line::styled(truncate_to_width(&text, width), style));
        }

        self.last_activity_frame = spinner;
        self.activity_dirty = false;
        self.activity_vp.set_lines(lines);
    }

    /// Rebuild the progress pane lines and keep the running task in
    /// view.
    pub fn refresh_tasks_pane(&mut self, theme: &Theme) {
        if !self.tasks_dirty {
            return;
        }
        let width = self.tasks_vp.width().max(1) as usize;
        let mut lines = Vec::with_capacity(self.tasks.len());
        for task in &self.tasks {
            let (glyph, style) = match task.status {
                TaskStatus::Pending => ("○", Style::default().fg(theme.dim_color)),
                TaskStatus::Running => ("→", Style::default().fg(theme.processing_color)),
                TaskStatus::Completed => ("✓", Style::default().fg(theme.success_color)),
                TaskStatus::Failed => ("✗", Style::default().fg(theme.error_color)),
            };
            lines.push(Line::styled(
                truncate_to_width(&format!("{} {}", glyph, task.title), width),
                style,
            ));
        }
        self.tasks_dirty = false;
        self.tasks_vp.set_lines(lines);
        if let Some((num, _)) = self.current_task {
            self.tasks_vp.ensure_visible(num.saturating_sub(1), false);
        }
    }
}

fn format_tokens(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
