//! Customer demography dashboard.
//!
//! The `data` and `state` modules hold the filter-and-aggregate pipeline and
//! know nothing about rendering; `app` and `ui` host it in an egui window.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
