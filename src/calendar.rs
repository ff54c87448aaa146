use chrono::{Datelike, Duration, NaiveDate};

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// `YYYY-MM` to the first day of that month.
pub fn parse_month_key(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d").ok()
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Date picker state: the selected day plus the month currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarSelector {
    selected: NaiveDate,
    visible_month: NaiveDate,
}

impl CalendarSelector {
    pub fn new(selected: NaiveDate) -> Self {
        Self {
            selected,
            visible_month: first_of_month(selected),
        }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn selected_key(&self) -> String {
        date_key(self.selected)
    }

    /// Picks `date` and hands it back to the host, even when it is already selected.
    pub fn select(&mut self, date: NaiveDate) -> NaiveDate {
        self.selected = date;
        self.visible_month = first_of_month(date);
        date
    }

    pub fn visible_month(&self) -> NaiveDate {
        self.visible_month
    }

    pub fn month_title(&self) -> String {
        self.visible_month.format("%B %Y").to_string()
    }

    /// Pages the grid to the month containing `date` without changing the selection.
    pub fn show_month(&mut self, date: NaiveDate) {
        self.visible_month = first_of_month(date);
    }

    pub fn show_previous_month(&mut self) {
        self.visible_month = previous_month(self.visible_month);
    }

    pub fn show_next_month(&mut self) {
        self.visible_month = next_month(self.visible_month);
    }

    /// Weeks of the visible month, Monday first, padded with `None`.
    pub fn month_grid(&self) -> Vec<[Option<NaiveDate>; 7]> {
        let first = self.visible_month;
        let lead = first.weekday().num_days_from_monday() as usize;
        let days = days_in_month(first);

        let mut weeks = Vec::with_capacity(6);
        let mut week = [None; 7];
        let mut column = lead;
        for offset in 0..days {
            week[column] = Some(first + Duration::days(offset as i64));
            column += 1;
            if column == 7 {
                weeks.push(week);
                week = [None; 7];
                column = 0;
            }
        }
        if column > 0 {
            weeks.push(week);
        }
        weeks
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn previous_month(first: NaiveDate) -> NaiveDate {
    let first = first_of_month(first);
    first
        .pred_opt()
        .map(first_of_month)
        .unwrap_or(first)
}

pub fn next_month(first: NaiveDate) -> NaiveDate {
    let first = first_of_month(first);
    first
        .checked_add_signed(Duration::days(days_in_month(first) as i64))
        .unwrap_or(first)
}

fn days_in_month(first: NaiveDate) -> u32 {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|next| (next - first).num_days() as u32)
        .unwrap_or(31)
}
