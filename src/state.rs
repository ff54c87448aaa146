use crate::models::AppData;
use crate::slots::TimeSlots;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub slots: Arc<TimeSlots>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData, slots: TimeSlots) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            slots: Arc::new(slots),
        }
    }
}
