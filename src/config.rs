use crate::slots::TimeSlots;
use crate::storage::resolve_data_path;
use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub slots: TimeSlots,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: parse_port(env::var("PORT").ok().as_deref()),
            data_path: resolve_data_path(),
            slots: TimeSlots::from_config(env::var("APP_TIME_SLOTS").ok().as_deref()),
        }
    }
}

/// Base URL the client uses for every progress call, loads and toggles alike.
pub fn api_base_from_env() -> String {
    env::var("PROGRESS_API_BASE")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

fn parse_port(raw: Option<&str>) -> u16 {
    raw.and_then(|value| value.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}
