//! Monitor view geometry.
//!
//! Pure functions from terminal size to pane dimensions. Wide terminals
//! get a two-column layout (progress and activity stacked on the left,
//! output on the right); anything under [`TWO_COLUMN_MIN_WIDTH`] stacks
//! all three panes vertically. Percentages are applied first, then
//! floors, then the counterpart pane takes the exact remainder, so the
//! split always sums to the budget it divides.

use ratatui::layout::Rect;

/// Rows reserved for the status bar.
const STATUS_BAR_HEIGHT: u16 = 1;

/// Width share of the left column in wide mode.
const LEFT_COLUMN_PERCENT: u16 = 34;

/// Outer width floors that decide when two columns fit.
const LEFT_COLUMN_MIN: u16 = 26;
const OUTPUT_COLUMN_MIN: u16 = 32;

/// Narrower than this and the panes stack vertically.
pub const TWO_COLUMN_MIN_WIDTH: u16 = LEFT_COLUMN_MIN + OUTPUT_COLUMN_MIN;

/// Height share of the progress pane within the left column.
const TASKS_PERCENT: u16 = 40;

/// Height share of the output pane in narrow mode.
const OUTPUT_PERCENT_NARROW: u16 = 45;

/// Content-row floors for the stacked panes.
const TASKS_CONTENT_MIN: u16 = 3;
const ACTIVITY_CONTENT_MIN: u16 = 3;
const OUTPUT_CONTENT_MIN: u16 = 3;

/// Pane dimensions for one terminal size.
///
/// Content fields are the rows and columns inside each pane's border;
/// they drive text wrapping and viewport heights. `left_content_budget`
/// is the vertical budget the progress and activity panes divide, and
/// `tasks_content_h + activity_content_h` equals it exactly at every
/// terminal size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorDims {
    pub narrow: bool,
    pub width: u16,
    pub height: u16,
    pub output_content_w: u16,
    pub output_content_h: u16,
    pub tasks_content_w: u16,
    pub tasks_content_h: u16,
    pub activity_content_w: u16,
    pub activity_content_h: u16,
    pub left_content_budget: u16,
}

/// Absolute pane rectangles, used for pointer hit-testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaneBounds {
    pub output: Rect,
    pub tasks: Rect,
    pub activity: Rect,
}

/// Integer percentage that cannot overflow u16 midway.
fn percent_of(value: u16, percent: u16) -> u16 {
    (value as u32 * percent as u32 / 100) as u16
}

/// Split `budget` between the progress and activity panes: percentage
/// first, then the progress floor, then cap so activity keeps its own
/// floor when the budget allows. Activity takes the exact remainder.
fn split_left_column(budget: u16) -> (u16, u16) {
    let tasks = percent_of(budget, TASKS_PERCENT)
        .max(TASKS_CONTENT_MIN)
        .min(budget.saturating_sub(ACTIVITY_CONTENT_MIN));
    (tasks, budget - tasks)
}

/// Compute pane dimensions for a terminal size. Total and pathological
/// sizes clamp to safe minimums instead of failing.
pub fn compute_layout(width: u16, height: u16) -> MonitorDims {
    let budget_h = height.saturating_sub(STATUS_BAR_HEIGHT);

    if width >= TWO_COLUMN_MIN_WIDTH {
        let left_outer_w = percent_of(width, LEFT_COLUMN_PERCENT)
            .max(LEFT_COLUMN_MIN)
            .min(width.saturating_sub(OUTPUT_COLUMN_MIN));
        let output_outer_w = width - left_outer_w;

        let left_content_budget = budget_h.saturating_sub(4);
        let (tasks_content_h, activity_content_h) = split_left_column(left_content_budget);

        MonitorDims {
            narrow: false,
            width,
            height,
            output_content_w: output_outer_w.saturating_sub(2).max(1),
            output_content_h: budget_h.saturating_sub(2).max(1),
            tasks_content_w: left_outer_w.saturating_sub(2).max(1),
            tasks_content_h,
            activity_content_w: left_outer_w.saturating_sub(2).max(1),
            activity_content_h,
            left_content_budget,
        }
    } else {
        let content_total = budget_h.saturating_sub(6);
        let output_content_h =
            percent_of(content_total, OUTPUT_PERCENT_NARROW).max(OUTPUT_CONTENT_MIN);
        let left_content_budget = content_total.saturating_sub(output_content_h);
        let (tasks_content_h, activity_content_h) = split_left_column(left_content_budget);
        let content_w = width.saturating_sub(2).max(1);

        MonitorDims {
            narrow: true,
            width,
            height,
            output_content_w: content_w,
            output_content_h,
            tasks_content_w: content_w,
            tasks_content_h,
            activity_content_w: content_w,
            activity_content_h,
            left_content_budget,
        }
    }
}

/// Convert dimensions into absolute pane rectangles for hit-testing.
/// Outer sizes are content plus borders, capped so the stack never
/// spills past the status bar.
pub fn compute_pane_bounds(dims: &MonitorDims) -> PaneBounds {
    let budget_h = dims.height.saturating_sub(STATUS_BAR_HEIGHT);

    if dims.narrow {
        let output_h = (dims.output_content_h + 2).min(budget_h);
        let tasks_h = (dims.tasks_content_h + 2).min(budget_h.saturating_sub(output_h));
        let activity_h = budget_h.saturating_sub(output_h + tasks_h);

        PaneBounds {
            output: Rect::new(0, 0, dims.width, output_h),
            tasks: Rect::new(0, output_h, dims.width, tasks_h),
            activity: Rect::new(0, output_h + tasks_h, dims.width, activity_h),
        }
    } else {
        let left_w = dims.tasks_content_w + 2;
        let output_w = dims.width.saturating_sub(left_w);
        let tasks_h = (dims.tasks_content_h + 2).min(budget_h);
        let activity_h = budget_h.saturating_sub(tasks_h);

        PaneBounds {
            output: Rect::new(left_w, 0, output_w, budget_h),
            tasks: Rect::new(0, 0, left_w, tasks_h),
            activity: Rect::new(0, tasks_h, left_w, activity_h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sums_exactly_at_every_size() {
        for width in [1, 10, 39, 40, 57, 58, 59, 80, 120, 250] {
            for height in [1, 2, 3, 5, 8, 12, 20, 24, 50, 200] {
                let dims = compute_layout(width, height);
                assert_eq!(
                    dims.tasks_content_h + dims.activity_content_h,
                    dims.left_content_budget,
                    "split broke at {}x{}",
                    width,
                    height
                );
                assert!(dims.output_content_h >= 1, "no output rows at {}x{}", width, height);
                assert!(dims.output_content_w >= 1);
            }
        }
    }

    #[test]
    fn test_mode_threshold() {
        assert!(compute_layout(TWO_COLUMN_MIN_WIDTH - 1, 24).narrow);
        assert!(!compute_layout(TWO_COLUMN_MIN_WIDTH, 24).narrow);
    }

    #[test]
    fn test_narrow_40x20_gives_three_usable_panes() {
        let dims = compute_layout(40, 20);
        assert!(dims.narrow);
        assert!(dims.output_content_h > 0);
        assert!(dims.tasks_content_h > 0);
        assert!(dims.activity_content_h > 0);
        assert_eq!(
            dims.tasks_content_h + dims.activity_content_h,
            dims.left_content_budget
        );

        let bounds = compute_pane_bounds(&dims);
        assert_eq!(bounds.output.y, 0);
        assert_eq!(bounds.tasks.y, bounds.output.y + bounds.output.height);
        assert_eq!(bounds.activity.y, bounds.tasks.y + bounds.tasks.height);
        assert!(bounds.activity.y + bounds.activity.height <= 19);
    }

    #[test]
    fn test_wide_floors_hold_under_pressure() {
        let dims = compute_layout(58, 13);
        assert!(!dims.narrow);
        // budget 12, left content budget 8: floor keeps tasks at 3
        assert_eq!(dims.tasks_content_h, 3);
        assert_eq!(dims.activity_content_h, 5);
    }

    #[test]
    fn test_bounds_stay_inside_the_screen() {
        for width in [1, 40, 58, 80, 200] {
            for height in [1, 3, 10, 24, 60] {
                let dims = compute_layout(width, height);
                let bounds = compute_pane_bounds(&dims);
                for rect in [bounds.output, bounds.tasks, bounds.activity] {
                    assert!(rect.x + rect.width <= width, "{}x{}", width, height);
                    assert!(
                        rect.y + rect.height <= height.saturating_sub(STATUS_BAR_HEIGHT),
                        "{}x{}",
                        width,
                        height
                    );
                }
            }
        }
    }

    #[test]
    fn test_wide_columns_meet_their_minimums() {
        let dims = compute_layout(120, 40);
        let bounds = compute_pane_bounds(&dims);
        assert!(bounds.tasks.width >= LEFT_COLUMN_MIN);
        assert!(bounds.output.width >= OUTPUT_COLUMN_MIN);
        assert_eq!(bounds.tasks.width + bounds.output.width, 120);
    }
}
