pub mod app;
pub mod calendar;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod panel;
pub mod slots;
pub mod state;
pub mod storage;
pub mod store;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use client::{HttpProgressClient, ProgressApi};
pub use config::Config;
pub use panel::{update, Effect, Msg, PanelState};
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
pub use store::PanelStore;
