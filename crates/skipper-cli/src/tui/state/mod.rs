//! State types for the dashboard.

pub mod focus;
pub mod layout;
pub mod monitor;
pub mod run;
pub mod timeline;
pub mod viewport;

pub use focus::{hit_test, FocusPane};
pub use layout::{compute_layout, compute_pane_bounds, MonitorDims, PaneBounds};
pub use monitor::MonitorState;
pub use run::{format_elapsed, RunPhase, TaskDisplay, TaskStatus, UsageCounters};
pub use timeline::{ActivityEntry, ActivityTimeline};
pub use viewport::ScrollViewport;
