use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Calendar conventions shared by the bucketer and the positioner.
///
/// Both sides must agree on the first day of the week, otherwise weekly
/// buckets and bar offsets drift apart by up to six days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "TimelineConfig::default_week_start")]
    week_start: Weekday,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            week_start: Self::default_week_start(),
        }
    }
}

impl TimelineConfig {
    fn default_week_start() -> Weekday {
        Weekday::Mon
    }

    pub fn new(week_start: Weekday) -> Self {
        Self { week_start }
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn set_week_start(&mut self, week_start: Weekday) {
        self.week_start = week_start;
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, crate::PersistenceError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), crate::PersistenceError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// First day of the week containing `date`.
    pub fn start_of_week(&self, date: NaiveDate) -> NaiveDate {
        let current = date.weekday().num_days_from_monday();
        let first = self.week_start.num_days_from_monday();
        let offset = (7 + current - first) % 7;
        date.checked_sub_days(Days::new(u64::from(offset)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the week containing `date`.
    pub fn end_of_week(&self, date: NaiveDate) -> NaiveDate {
        add_days(self.start_of_week(date), 6)
    }
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Shift by whole months, clamping the day to the target month's length
/// (Jan 31 + 1 month lands on the last day of February).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

pub fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}
