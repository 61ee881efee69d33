//! Bottom status bar.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::tui::theme::Theme;

/// Render one status row: left-aligned segments, right-aligned key
/// hints. Hints drop from the right edge inward when the row is too
/// narrow for all of them.
pub fn render_status_bar(
    buf: &mut Buffer,
    area: Rect,
    theme: &Theme,
    left: Vec<Span<'static>>,
    hints: &[(&str, &str)],
) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    for x in area.left()..area.right() {
        if let Some(cell) = buf.cell_mut((x, area.y)) {
            cell.set_symbol(" ");
            cell.set_bg(theme.status_bar_bg_color);
        }
    }

    let left_line = Line::from(left);
    let left_width = left_line.width() as u16;
    buf.set_line(area.x + 1, area.y, &left_line, area.width.saturating_sub(2));

    // hints fill from the right edge inward, newest casualty first
    let mut hint_spans: Vec<Span<'static>> = Vec::new();
    let mut hint_width: u16 = 0;
    let available = area
        .width
        .saturating_sub(left_width)
        .saturating_sub(4);
    for (key, action) in hints {
        let segment = format!("{} {}  ", key, action);
        let segment_width = segment.width() as u16;
        if hint_width + segment_width > available {
            break;
        }
        hint_width += segment_width;
        hint_spans.push(Span::styled(
            (*key).to_string(),
            Style::default().fg(theme.accent_color),
        ));
        hint_spans.push(Span::styled(
            format!(" {}  ", action),
            Style::default().fg(theme.dim_color),
        ));
    }

    if hint_width > 0 {
        let x = area.right().saturating_sub(hint_width + 1);
        buf.set_line(x, area.y, &Line::from(hint_spans), hint_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn test_left_and_hints_both_render() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        render_status_bar(
            &mut buf,
            area,
            &Theme::default(),
            vec![Span::raw("Task 1/2")],
            &[("q", "quit"), ("tab", "focus")],
        );

        let text = row_text(&buf, 60);
        assert!(text.contains("Task 1/2"));
        assert!(text.contains("q quit"));
        assert!(text.contains("tab focus"));
    }

    #[test]
    fn test_hints_drop_when_the_row_is_narrow() {
        let area = Rect::new(0, 0, 22, 1);
        let mut buf = Buffer::empty(area);
        render_status_bar(
            &mut buf,
            area,
            &Theme::default(),
            vec![Span::raw("Task 1/2")],
            &[("q", "quit"), ("tab", "focus")],
        );

        let text = row_text(&buf, 22);
        assert!(text.contains("q quit"));
        assert!(!text.contains("tab focus"));
    }

    #[test]
    fn test_zero_area_is_safe() {
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(Rect::new(0, 0, 1, 1));
        render_status_bar(&mut buf, area, &Theme::default(), vec![], &[("q", "quit")]);
    }
}
