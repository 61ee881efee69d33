//! View rendering, as `impl App` extensions.

pub mod home;
pub mod monitor;
