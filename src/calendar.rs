use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// One Monday-aligned week, clipped to the window it was generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of calendar days covered, inclusive.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// True when the inclusive interval `[start, end]` overlaps this week.
    /// Inverted intervals never overlap anything.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        intervals_overlap(self.start, self.end, start, end)
    }
}

/// Monday on or before `date`.
pub fn start_of_week_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Sunday on or after `date`.
pub fn end_of_week_sunday(date: NaiveDate) -> NaiveDate {
    start_of_week_monday(date) + Duration::days(6)
}

pub fn clamp_date(date: NaiveDate, min: NaiveDate, max: NaiveDate) -> NaiveDate {
    if date < min {
        min
    } else if date > max {
        max
    } else {
        date
    }
}

pub fn intervals_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= a_end && b_start <= b_end && a_start <= b_end && a_end >= b_start
}

/// Ordered Monday-aligned weeks covering `[start, end]`.
///
/// The first and last weeks are clamped to the window, so a window starting
/// on a Thursday yields a first week of Thursday..Sunday. An inverted window
/// yields no weeks.
pub fn weeks_between(start: NaiveDate, end: NaiveDate) -> Vec<WeekWindow> {
    if start > end {
        return Vec::new();
    }

    let last_week_end = end_of_week_sunday(end);
    let mut weeks = Vec::new();
    let mut cursor = start_of_week_monday(start);

    while cursor <= last_week_end {
        let week_end = cursor + Duration::days(6);
        weeks.push(WeekWindow {
            start: clamp_date(cursor, start, end),
            end: clamp_date(week_end, start, end),
        });
        cursor = cursor + Duration::days(7);
    }
    weeks
}

/// Human label for a week header, e.g. `29 Jan – 01 Feb`.
pub fn format_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} – {}", start.format("%d %b"), end.format("%d %b"))
}
