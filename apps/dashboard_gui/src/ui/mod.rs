//! UI layer for the dashboard: app shell, table, and member modal.

pub mod app;

pub use app::DashboardApp;
