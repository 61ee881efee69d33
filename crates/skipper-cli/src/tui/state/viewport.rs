//! Scrollable pane state with tail-following.
//!
//! Each pane owns one viewport over its prepared lines. A viewport
//! follows the tail until the user scrolls away from the bottom;
//! scrolling back to the exact bottom re-engages following. New lines
//! and resizes keep the offset clamped so it never points past the end
//! of content.

use ratatui::text::Line;

#[derive(Debug, Default)]
pub struct ScrollViewport {
    lines: Vec<Line<'static>>,
    offset: usize,
    width: u16,
    height: u16,
    auto_follow: bool,
}

impl ScrollViewport {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            offset: 0,
            width: 0,
            height: 0,
            auto_follow: true,
        }
    }

    // ========================================================================
    // Content and geometry
    // ========================================================================

    /// Replace the prepared lines. Follows the tail when following,
    /// otherwise keeps the offset clamped to the new content.
    pub fn set_lines(&mut self, lines: Vec<Line<'static>>) {
        self.lines = lines;
        if self.auto_follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    /// Record the content area size. The offset is re-clamped so a
    /// shrink never leaves it pointing past the end.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        if self.auto_follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_following(&self) -> bool {
        self.auto_follow
    }

    fn visible_height(&self) -> usize {
        self.height as usize
    }

    /// Largest valid offset for the current content and height.
    pub fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.visible_height())
    }

    /// The slice of lines currently on screen.
    pub fn visible_lines(&self) -> &[Line<'static>] {
        let start = self.offset.min(self.lines.len());
        let end = (start + self.visible_height()).min(self.lines.len());
        &self.lines[start..end]
    }

    // ========================================================================
    // Scrolling
    // ========================================================================

    /// Scroll toward older content. Leaving the bottom stops following.
    pub fn scroll_up(&mut self, amount: usize) {
        self.offset = self.offset.saturating_sub(amount);
        if self.offset < self.max_offset() {
            self.auto_follow = false;
        }
    }

    /// Scroll toward newer content. Reaching the exact bottom resumes
    /// following.
    pub fn scroll_down(&mut self, amount: usize) {
        self.offset = (self.offset + amount).min(self.max_offset());
        if self.offset >= self.max_offset() {
            self.auto_follow = true;
        }
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.visible_height().max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.visible_height().max(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
        self.auto_follow = self.offset >= self.max_offset();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
        self.auto_follow = true;
    }

    /// Bring `index` into view: minimal movement by default, centered
    /// when `center` is set. Does not change following.
    pub fn ensure_visible(&mut self, index: usize, center: bool) {
        let height = self.visible_height();
        if height == 0 || self.lines.is_empty() {
            return;
        }
        let index = index.min(self.lines.len() - 1);

        if center {
            self.offset = index.saturating_sub(height / 2).min(self.max_offset());
            return;
        }
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + height {
            self.offset = (index + 1 - height).min(self.max_offset());
        }
    }
}
