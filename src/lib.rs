// src/lib.rs

pub mod api;
pub mod app;
pub mod auth;
pub mod chat_view;
pub mod config;
pub mod dashboard_view;
pub mod errors;
pub mod formatters;
pub mod key_handlers;
pub mod log_view;
pub mod login_view;
pub mod logging;
pub mod message;
pub mod metrics;
pub mod models;
pub mod session;
pub mod status_indicator;
pub mod ui;

pub use app::{App, AppScreen};
pub use ui::ui;
