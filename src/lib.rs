//! View-state core and terminal front end for a regional case dashboard.
//!
//! Two datasets (a per-region snapshot and a per-region daily timeseries) plus
//! two pieces of user state (statistic mode, highlighted district) are turned
//! into one consistent [`app::DashboardView`] per frame.

pub mod app;
pub mod chart;
pub mod config;
pub mod data;
pub mod derive;
pub mod regions;
pub mod session;
pub mod state;
pub mod telemetry;
pub mod ui;
