// src/lib.rs — Library root for ORION

pub mod api;
pub mod cli;
pub mod data;
pub mod gantt;
pub mod infra;
pub mod metrics;
pub mod model;
pub mod onboarding;
pub mod settings;
pub mod tui;
pub mod wbs;
