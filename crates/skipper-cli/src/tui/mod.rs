//! Terminal dashboard: application state, engine bridge, and rendering.

pub mod app;
pub mod bridge;
pub mod components;
pub mod handlers;
pub mod render;
pub mod state;
pub mod theme;

pub use app::App;
