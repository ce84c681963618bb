//! Calendar arithmetic for year-over-year windows.

use chrono::{Datelike, Months, NaiveDate};

use crate::config::Locale;

const MONTHS_DE: [&str; 12] = [
    "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Same month and day one year earlier; Feb 29 maps to Feb 28.
pub fn one_year_back(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(12)).unwrap_or(date)
}

/// Twelve months ending today, both ends inclusive.
pub fn default_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from = one_year_back(today).succ_opt().unwrap_or(today);
    (from, today)
}

/// Three months ending today, both ends inclusive.
pub fn quarter_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from = today
        .checked_sub_months(Months::new(3))
        .and_then(|d| d.succ_opt())
        .unwrap_or(today);
    (from, today)
}

pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

/// Month abbreviations January through December.
pub fn month_labels(locale: Locale) -> &'static [&'static str; 12] {
    match locale {
        Locale::De => &MONTHS_DE,
        Locale::En => &MONTHS_EN,
    }
}

pub fn month_index(date: NaiveDate) -> usize {
    date.month0() as usize
}
