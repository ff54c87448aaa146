use crate::calendar::{date_key, parse_date_key, parse_month_key, CalendarSelector};
use crate::errors::AppError;
use crate::models::{IndexQuery, SlotsResponse, ToggleResponse};
use crate::panel::PanelState;
use crate::slots::{cheer_for, display_label};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::tracker::{progress_for, toggle_slot};
use crate::ui::{render_index, PageView};
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Json,
};
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use tracing::info;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, AppError> {
    let now = Local::now().naive_local();
    let date = match query.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => now.date(),
    };

    let mut calendar = CalendarSelector::new(date);
    if let Some(month) = query.month.as_deref().and_then(parse_month_key) {
        calendar.show_month(month);
    }

    let progress = {
        let data = state.data.lock().await;
        progress_for(&data, date, state.slots.len())
    };
    let panel = PanelState::loaded(date, &progress, state.slots.labels().to_vec());

    Ok(Html(render_index(&PageView {
        calendar: &calendar,
        panel: &panel,
        now,
    })))
}

pub async fn get_slots(State(state): State<AppState>) -> Json<SlotsResponse> {
    Json(SlotsResponse {
        slots: state.slots.labels().to_vec(),
    })
}

pub async fn get_all_progress(State(state): State<AppState>) -> Json<BTreeMap<String, Vec<bool>>> {
    let data = state.data.lock().await;
    Json(data.days.clone())
}

pub async fn get_progress(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<bool>>, AppError> {
    let date = parse_date(&date)?;
    let data = state.data.lock().await;
    Ok(Json(progress_for(&data, date, state.slots.len())))
}

pub async fn toggle_progress(
    State(state): State<AppState>,
    Path((date, index)): Path<(String, usize)>,
) -> Result<Json<ToggleResponse>, AppError> {
    let date = parse_date(&date)?;
    Ok(Json(apply_toggle(&state, date, index).await?))
}

pub async fn toggle_form(
    State(state): State<AppState>,
    Path((date, index)): Path<(String, usize)>,
) -> Result<Redirect, AppError> {
    let date = parse_date(&date)?;
    apply_toggle(&state, date, index).await?;
    Ok(Redirect::to(&format!("/?date={}", date_key(date))))
}

async fn apply_toggle(
    state: &AppState,
    date: NaiveDate,
    index: usize,
) -> Result<ToggleResponse, AppError> {
    let mut data = state.data.lock().await;
    // Only a persisted toggle becomes visible to readers.
    let mut next = data.clone();
    let outcome = toggle_slot(&mut next, date, index, state.slots.len())?;
    persist_data(&state.data_path, &next).await?;
    *data = next;

    let label = display_label(state.slots.labels(), index);
    let message = if outcome.completed {
        info!(date = %date_key(date), "User completed squats for {label}.");
        let done = outcome.updated.iter().filter(|flag| **flag).count();
        Some(cheer_for(done).to_string())
    } else {
        info!(date = %date_key(date), "User undid squats for {label}.");
        None
    };

    Ok(ToggleResponse {
        success: true,
        updated: outcome.updated,
        message,
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    parse_date_key(raw)
        .ok_or_else(|| AppError::bad_request(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}
