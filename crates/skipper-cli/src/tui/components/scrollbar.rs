//! Column scrollbar drawn directly into the buffer.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::tui::theme::Theme;

/// Render a vertical scrollbar in the single-cell-wide `area` column.
/// Draws nothing when the content already fits.
pub fn render_scrollbar(
    buf: &mut Buffer,
    area: Rect,
    theme: &Theme,
    offset: usize,
    total: usize,
    visible: usize,
) {
    if area.width == 0 || area.height == 0 || total <= visible {
        return;
    }

    let track = area.height as usize;
    let thumb_size = (visible * track / total).max(2).min(track);
    let max_offset = total - visible;
    let thumb_top = offset.min(max_offset) * (track - thumb_size) / max_offset;

    for (i, y) in (area.top()..area.bottom()).enumerate() {
        let in_thumb = i >= thumb_top && i < thumb_top + thumb_size;
        let (symbol, color) = if in_thumb {
            ("█", theme.scrollbar_color)
        } else {
            ("░", theme.scrollbar_bg_color)
        };
        if let Some(cell) = buf.cell_mut((area.x, y)) {
            cell.set_symbol(symbol);
            cell.set_fg(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(height: u16) -> (Buffer, Rect) {
        let area = Rect::new(0, 0, 1, height);
        (Buffer::empty(area), area)
    }

    fn symbols(buf: &Buffer, height: u16) -> Vec<String> {
        (0..height)
            .map(|y| buf.cell((0, y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn test_content_that_fits_draws_nothing() {
        let (mut buf, area) = column(10);
        render_scrollbar(&mut buf, area, &Theme::default(), 0, 8, 10);
        assert!(symbols(&buf, 10).iter().all(|s| s == " "));
    }

    #[test]
    fn test_thumb_tracks_the_offset() {
        let theme = Theme::default();

        let (mut buf, area) = column(10);
        render_scrollbar(&mut buf, area, &theme, 0, 100, 10);
        let top = symbols(&buf, 10);
        assert_eq!(top[0], "█");
        assert_eq!(top[9], "░");

        let (mut buf, area) = column(10);
        render_scrollbar(&mut buf, area, &theme, 90, 100, 10);
        let bottom = symbols(&buf, 10);
        assert_eq!(bottom[0], "░");
        assert_eq!(bottom[9], "█");
    }

    #[test]
    fn test_thumb_has_a_minimum_size() {
        let (mut buf, area) = column(10);
        render_scrollbar(&mut buf, area, &Theme::default(), 0, 10_000, 10);
        let cells = symbols(&buf, 10);
        assert_eq!(cells.iter().filter(|s| *s == "█").count(), 2);
    }

    #[test]
    fn test_degenerate_areas_do_not_panic() {
        let (mut buf, _) = column(1);
        render_scrollbar(
            &mut buf,
            Rect::new(0, 0, 0, 0),
            &Theme::default(),
            5,
            100,
            10,
        );
        render_scrollbar(
            &mut buf,
            Rect::new(0, 0, 1, 1),
            &Theme::default(),
            usize::MAX,
            100,
            10,
        );
    }
}
