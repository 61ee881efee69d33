//! Color palette for the dashboard.

use ratatui::style::Color;

/// Colors used across every view. One dark palette; terminals that
/// cannot show RGB downgrade on their own.
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg_color: Color,
    pub text_color: Color,
    pub dim_color: Color,
    pub border_color: Color,
    pub focused_border_color: Color,
    pub accent_color: Color,
    pub title_color: Color,
    pub success_color: Color,
    pub error_color: Color,
    pub warning_color: Color,
    pub processing_color: Color,
    pub separator_color: Color,
    pub scrollbar_color: Color,
    pub scrollbar_bg_color: Color,
    pub status_bar_bg_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg_color: Color::Rgb(16, 18, 24),
            text_color: Color::Rgb(205, 214, 224),
            dim_color: Color::Rgb(110, 118, 129),
            border_color: Color::Rgb(48, 54, 61),
            focused_border_color: Color::Rgb(88, 166, 255),
            accent_color: Color::Rgb(88, 166, 255),
            title_color: Color::Rgb(210, 168, 255),
            success_color: Color::Rgb(63, 185, 80),
            error_color: Color::Rgb(248, 81, 73),
            warning_color: Color::Rgb(210, 153, 34),
            processing_color: Color::Rgb(210, 153, 34),
            separator_color: Color::Rgb(139, 148, 158),
            scrollbar_color: Color::Rgb(88, 96, 105),
            scrollbar_bg_color: Color::Rgb(33, 38, 45),
            status_bar_bg_color: Color::Rgb(22, 27, 34),
        }
    }
}
