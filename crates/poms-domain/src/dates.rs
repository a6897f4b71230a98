//! Resolution of symbolic date tokens
//!
//! Models are told to echo what the user said, so a holdings request "as of
//! today" comes back with `start_date: "today"` and a year-to-date
//! performance request with `start_date: "YTD"`. These are rewritten into
//! concrete ISO-8601 dates relative to a reference day:
//!
//! | input                      | start_date        | end_date          |
//! |----------------------------|-------------------|-------------------|
//! | start missing              | today             | unchanged         |
//! | start `"today"`            | today             | unchanged         |
//! | end `"today"`              | unchanged         | today             |
//! | start `"YTD"`              | `<year>-01-01`    | yesterday         |
//!
//! `"YTD"` only has meaning as a start date; an `end_date` of `"YTD"` is left
//! as is. Token comparison is exact.

use chrono::{Datelike, Local, NaiveDate};

/// Token meaning the current calendar day
pub const TODAY: &str = "today";

/// Token meaning "from January 1st up to yesterday"
pub const YEAR_TO_DATE: &str = "YTD";

/// The current local calendar day
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Render a date the way records store it (`YYYY-MM-DD`)
pub fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Resolve a `(start_date, end_date)` pair against `today`.
///
/// The result never contains a missing start date or one of the symbolic
/// tokens as a start date. Applying it twice gives the same result as
/// applying it once.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use poms_domain::dates::normalize_window;
///
/// let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
/// let (start, end) = normalize_window(Some("YTD".into()), None, today);
/// assert_eq!(start.as_deref(), Some("2024-01-01"));
/// assert_eq!(end.as_deref(), Some("2024-05-05"));
/// ```
pub fn normalize_window(
    start_date: Option<String>,
    end_date: Option<String>,
    today: NaiveDate,
) -> (Option<String>, Option<String>) {
    let year_to_date = start_date.as_deref() == Some(YEAR_TO_DATE);

    let start = match start_date.as_deref() {
        None | Some(TODAY) => Some(iso(today)),
        Some(YEAR_TO_DATE) => Some(iso(first_of_year(today))),
        Some(_) => start_date,
    };

    // YTD overwrites whatever end date came with it
    let end = if year_to_date {
        Some(iso(yesterday(today)))
    } else if end_date.as_deref() == Some(TODAY) {
        Some(iso(today))
    } else {
        end_date
    };

    (start, end)
}

fn first_of_year(today: NaiveDate) -> NaiveDate {
    today.with_ordinal(1).unwrap_or(today)
}

fn yesterday(today: NaiveDate) -> NaiveDate {
    today.pred_opt().unwrap_or(today)
}

/// Records that carry a date window resolved by [`normalize_window`]
pub trait NormalizeDates {
    /// Resolve symbolic date tokens in place
    fn normalize_dates(&mut self, today: NaiveDate);

    /// Consume and return the resolved value
    fn normalized(mut self, today: NaiveDate) -> Self
    where
        Self: Sized,
    {
        self.normalize_dates(today);
        self
    }
}

impl<T: NormalizeDates> NormalizeDates for Vec<T> {
    fn normalize_dates(&mut self, today: NaiveDate) {
        for item in self.iter_mut() {
            item.normalize_dates(today);
        }
    }
}
