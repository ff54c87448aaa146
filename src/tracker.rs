use crate::calendar::date_key;
use crate::errors::AppError;
use crate::models::AppData;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub updated: Vec<bool>,
    pub completed: bool,
}

/// Stored progress for `date`, padded with `false` up to `slot_count`.
/// Unknown dates read as all pending and are not written back.
pub fn progress_for(data: &AppData, date: NaiveDate, slot_count: usize) -> Vec<bool> {
    let mut progress = data.days.get(&date_key(date)).cloned().unwrap_or_default();
    if progress.len() < slot_count {
        progress.resize(slot_count, false);
    }
    progress
}

pub fn toggle_slot(
    data: &mut AppData,
    date: NaiveDate,
    index: usize,
    slot_count: usize,
) -> Result<ToggleOutcome, AppError> {
    let key = date_key(date);
    let stored = data.days.get(&key).map(Vec::len).unwrap_or(0);
    if index >= slot_count.max(stored) {
        return Err(AppError::bad_request(format!(
            "slot index {index} is out of range for {key}"
        )));
    }

    let progress = data.days.entry(key).or_default();
    if progress.len() < slot_count {
        progress.resize(slot_count, false);
    }
    progress[index] = !progress[index];

    Ok(ToggleOutcome {
        completed: progress[index],
        updated: progress.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march_5() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn unknown_dates_read_as_pending() {
        let data = AppData::default();
        assert_eq!(progress_for(&data, march_5(), 3), vec![false; 3]);
        assert!(data.days.is_empty());
    }

    #[test]
    fn short_rows_are_padded() {
        let mut data = AppData::default();
        data.days.insert("2024-03-05".into(), vec![true]);
        assert_eq!(progress_for(&data, march_5(), 3), vec![true, false, false]);
    }

    #[test]
    fn toggle_flips_one_slot_and_back() {
        let mut data = AppData::default();
        let first = toggle_slot(&mut data, march_5(), 1, 3).unwrap();
        assert_eq!(first.updated, vec![false, true, false]);
        assert!(first.completed);

        let second = toggle_slot(&mut data, march_5(), 1, 3).unwrap();
        assert_eq!(second.updated, vec![false; 3]);
        assert!(!second.completed);
        assert_eq!(data.days["2024-03-05"], vec![false; 3]);
    }

    #[test]
    fn toggle_rejects_out_of_range() {
        let mut data = AppData::default();
        let err = toggle_slot(&mut data, march_5(), 3, 3).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert!(data.days.is_empty());
    }
}
