use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

pub const DEFAULT_SLOTS: [&str; 13] = [
    "8:00 AM", "8:45 AM", "9:30 AM", "10:15 AM", "11:00 AM", "11:45 AM", "12:30 PM", "1:15 PM",
    "2:00 PM", "2:45 PM", "3:30 PM", "4:15 PM", "5:00 PM",
];

/// How long the last slot of the day counts as current.
pub const LAST_SLOT_SPAN_MINUTES: i64 = 45;

pub const ALL_DONE_STATUS: &str = "Way to go! You completed your squats for today!";
pub const KEEP_GOING_STATUS: &str = "Keep going!";

const CHEERS: [&str; 5] = [
    "Keep up the fantastic effort!",
    "Way to go! You're doing great!",
    "Your body thanks you for staying active!",
    "Amazing! You're hitting your goals!",
    "Fantastic progress, keep crushing it!",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlots {
    labels: Vec<String>,
}

impl Default for TimeSlots {
    fn default() -> Self {
        Self::new(DEFAULT_SLOTS.iter().map(|label| label.to_string()).collect())
    }
}

impl TimeSlots {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Comma separated labels; blank entries are skipped and an empty list
    /// falls back to the defaults.
    pub fn from_config(raw: Option<&str>) -> Self {
        let labels: Vec<String> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect();
        if labels.is_empty() {
            Self::default()
        } else {
            Self::new(labels)
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Display name for slot `index`, tolerating a label list shorter than the progress.
pub fn display_label(labels: &[String], index: usize) -> String {
    labels
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("Slot {}", index + 1))
}

pub fn parse_slot_time(label: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(label.trim(), "%I:%M %p").ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Completed,
    Missed,
    Current,
    Upcoming,
}

impl SlotStatus {
    pub fn mark(self) -> &'static str {
        match self {
            SlotStatus::Completed => "✔",
            SlotStatus::Missed => "✗",
            SlotStatus::Current => "⏳",
            SlotStatus::Upcoming => "",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            SlotStatus::Completed => "completed",
            SlotStatus::Missed => "missed",
            SlotStatus::Current => "current",
            SlotStatus::Upcoming => "pending",
        }
    }
}

/// Status of every slot of `date` as seen at local time `now`.
pub fn slot_statuses(
    labels: &[String],
    progress: &[bool],
    date: NaiveDate,
    now: NaiveDateTime,
) -> Vec<SlotStatus> {
    let times: Vec<Option<NaiveTime>> = (0..progress.len())
        .map(|index| labels.get(index).and_then(|label| parse_slot_time(label)))
        .collect();

    progress
        .iter()
        .enumerate()
        .map(|(index, &completed)| {
            if completed {
                return SlotStatus::Completed;
            }
            let today = now.date();
            if date < today {
                return SlotStatus::Missed;
            }
            if date > today {
                return SlotStatus::Upcoming;
            }
            let Some(start) = times[index] else {
                return SlotStatus::Upcoming;
            };
            let end = times
                .get(index + 1)
                .copied()
                .flatten()
                .filter(|next| *next > start)
                .map(|next| date.and_time(next))
                .unwrap_or_else(|| {
                    date.and_time(start) + Duration::minutes(LAST_SLOT_SPAN_MINUTES)
                });
            let start = date.and_time(start);
            if start <= now && now < end {
                SlotStatus::Current
            } else if start <= now {
                SlotStatus::Missed
            } else {
                SlotStatus::Upcoming
            }
        })
        .collect()
}

pub fn progress_text(completed: usize, total: usize) -> String {
    format!("Progress: {completed}/{total}")
}

pub fn status_text(completed: usize, total: usize) -> &'static str {
    if total > 0 && completed == total {
        ALL_DONE_STATUS
    } else {
        KEEP_GOING_STATUS
    }
}

pub fn percent_complete(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

/// Rotates through the motivational messages by how many slots are done.
pub fn cheer_for(completed: usize) -> &'static str {
    CHEERS[completed % CHEERS.len()]
}
