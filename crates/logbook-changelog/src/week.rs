//! Year-and-week labels for change-sets

use chrono::{DateTime, Datelike, TimeZone};

/// A calendar week: week 1 is the Sunday-started week containing January 1st
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearWeek {
    /// Calendar year
    pub year: i32,
    /// Week of the year, starting at 1
    pub week: u32,
}

impl YearWeek {
    /// Week containing `date`, in that date's own time zone
    pub fn from_date<Tz: TimeZone>(date: &DateTime<Tz>) -> Self {
        let day = date.date_naive();
        let ordinal0 = day.ordinal0();
        let weekday = day.weekday().num_days_from_sunday();
        let new_year_weekday = (weekday + 7 - ordinal0 % 7) % 7;

        Self {
            year: day.year(),
            week: (ordinal0 + new_year_weekday) / 7 + 1,
        }
    }

    /// Unpadded `YYYY-W` form used in branch names
    pub fn branch_component(&self) -> String {
        format!("{}-{}", self.year, self.week)
    }
}

impl std::fmt::Display for YearWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.year, self.week)
    }
}
