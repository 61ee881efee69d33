//! Home view rendering.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::app::App;
use crate::tui::components::render_status_bar;

impl App {
    pub fn render_home(&mut self, f: &mut Frame) {
        let area = f.area();
        let theme = &self.theme;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border_color))
            .title(Span::styled(
                " Skipper ",
                Style::default()
                    .fg(theme.title_color)
                    .add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(theme.bg_color));
        let body = Rect::new(
            area.x,
            area.y,
            area.width,
            area.height.saturating_sub(1),
        );
        let inner = block.inner(body);
        f.render_widget(block, body);

        if inner.width > 0 && inner.height > 0 {
            let engine = if self.demo {
                "demo (scripted run)".to_string()
            } else if self.config.command.is_empty() {
                "not configured".to_string()
            } else {
                format!("{} {}", self.config.command, self.config.args.join(" "))
                    .trim_end()
                    .to_string()
            };

            let mut lines = vec![
                Line::default(),
                Line::styled(
                    format!("  {}", self.plan.title),
                    Style::default()
                        .fg(theme.text_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Line::styled(
                    format!("  {} tasks", self.plan.total_tasks()),
                    Style::default().fg(theme.dim_color),
                ),
                Line::styled(
                    format!("  engine: {}", engine),
                    Style::default().fg(theme.dim_color),
                ),
                Line::default(),
            ];
            for (index, task) in self.plan.tasks.iter().enumerate() {
                lines.push(Line::styled(
                    format!("  {}. {}", index + 1, task.title),
                    Style::default().fg(theme.text_color),
                ));
            }
            lines.push(Line::default());
            lines.push(Line::styled(
                "  Press enter to start the run.",
                Style::default().fg(theme.accent_color),
            ));

            f.render_widget(Paragraph::new(lines), inner);
        }

        if area.height > 0 {
            let bar = Rect::new(area.x, area.bottom() - 1, area.width, 1);
            render_status_bar(
                f.buffer_mut(),
                bar,
                theme,
                vec![Span::styled(
                    "Ready",
                    Style::default().fg(theme.dim_color),
                )],
                &[("enter", "run"), ("q", "quit")],
            );
        }
    }
}
