//! # nudge-server
//!
//! Process wiring for the adaptive nudge scheduler: config + stores +
//! orchestrator bootstrap, the HTTP webhook listener, and the CLI surface.

pub mod api;
pub mod app;
pub mod cli;

pub use app::App;
