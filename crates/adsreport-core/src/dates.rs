//! Reporting windows.
//!
//! A run compares two back-to-back 7-day windows. The previous window ends
//! the day before the current one starts.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use thiserror::Error;

const WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRangeError {
    #[error("{window} window {start}..{end} spans {days} days; expected 7")]
    WrongLength {
        window: &'static str,
        start: NaiveDate,
        end: NaiveDate,
        days: i64,
    },

    #[error("previous window must end the day before {current_start}, but ends {previous_end}")]
    NotContiguous {
        current_start: NaiveDate,
        previous_end: NaiveDate,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub current_start: NaiveDate,
    pub current_end: NaiveDate,
    pub previous_start: NaiveDate,
    pub previous_end: NaiveDate,
}

impl DateRange {
    /// Builds a range from four explicit boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`DateRangeError`] unless both windows cover exactly 7 days
    /// and the previous window ends the day before the current one starts.
    pub fn new(
        current_start: NaiveDate,
        current_end: NaiveDate,
        previous_start: NaiveDate,
        previous_end: NaiveDate,
    ) -> Result<Self, DateRangeError> {
        check_window("current", current_start, current_end)?;
        check_window("previous", previous_start, previous_end)?;
        if previous_end + Duration::days(1) != current_start {
            return Err(DateRangeError::NotContiguous {
                current_start,
                previous_end,
            });
        }
        Ok(Self {
            current_start,
            current_end,
            previous_start,
            previous_end,
        })
    }

    /// The pair of windows whose current window ends on `end`.
    #[must_use]
    pub fn ending_on(end: NaiveDate) -> Self {
        let current_start = end - Duration::days(WINDOW_DAYS - 1);
        let previous_end = current_start - Duration::days(1);
        Self {
            current_start,
            current_end: end,
            previous_start: previous_end - Duration::days(WINDOW_DAYS - 1),
            previous_end,
        }
    }

    /// The windows the weekly ads export uses: the current week ends yesterday.
    #[must_use]
    pub fn ending_yesterday(today: NaiveDate) -> Self {
        Self::ending_on(today - Duration::days(1))
    }

    /// `"January 4, 2026 – January 10, 2026"`, for plain-text contexts.
    #[must_use]
    pub fn current_label(&self) -> String {
        format!(
            "{} \u{2013} {}",
            long_date(self.current_start),
            long_date(self.current_end)
        )
    }

    /// Same as [`Self::current_label`] with an HTML en-dash entity.
    #[must_use]
    pub fn current_label_html(&self) -> String {
        format!(
            "{} &ndash; {}",
            long_date(self.current_start),
            long_date(self.current_end)
        )
    }

    #[must_use]
    pub fn previous_label(&self) -> String {
        format!(
            "{} \u{2013} {}",
            long_date(self.previous_start),
            long_date(self.previous_end)
        )
    }

    /// Folder suffix for published reports: `jan4-10`, or `dec29-jan4` when
    /// the current window crosses a month boundary.
    #[must_use]
    pub fn folder_suffix(&self) -> String {
        let start_month = month_abbrev(self.current_start);
        let end_month = month_abbrev(self.current_end);
        if self.current_start.month() == self.current_end.month() {
            format!(
                "{start_month}{}-{}",
                self.current_start.day(),
                self.current_end.day()
            )
        } else {
            format!(
                "{start_month}{}-{end_month}{}",
                self.current_start.day(),
                self.current_end.day()
            )
        }
    }

    /// ISO-8601 `(week-year, week)` of the day the current window ends.
    #[must_use]
    pub fn iso_week(&self) -> (i32, u32) {
        let week = self.current_end.iso_week();
        (week.year(), week.week())
    }
}

/// `"January 4, 2026"`.
#[must_use]
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn month_abbrev(date: NaiveDate) -> String {
    date.format("%b").to_string().to_lowercase()
}

fn check_window(
    window: &'static str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), DateRangeError> {
    let days = (end - start).num_days() + 1;
    if days == WINDOW_DAYS {
        Ok(())
    } else {
        Err(DateRangeError::WrongLength {
            window,
            start,
            end,
            days,
        })
    }
}
