use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the backend persists: one progress array per `YYYY-MM-DD` key.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppData {
    pub days: BTreeMap<String, Vec<bool>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToggleResponse {
    pub success: bool,
    pub updated: Vec<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotsResponse {
    pub slots: Vec<String>,
}

/// `/?date=YYYY-MM-DD&month=YYYY-MM`; both optional.
#[derive(Debug, Deserialize, Default)]
pub struct IndexQuery {
    pub date: Option<String>,
    pub month: Option<String>,
}
