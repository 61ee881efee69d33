//! Input and message handlers, as `impl App` extensions.

pub mod engine;
pub mod keyboard;
pub mod mouse;
