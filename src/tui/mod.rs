// src/tui/mod.rs — Terminal portfolio dashboard.

pub mod app;
pub mod data;
pub mod theme;
pub mod widgets;

pub use app::run_dashboard;
