// Date utility functions
// ISO date helpers shared by the query state, the API client and the renderer

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` form value. Surrounding whitespace is ignored.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).ok()
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// `date + days`, or `None` when the result falls outside chrono's calendar.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// Short column header, e.g. `seg 21/04`.
pub fn format_column_header(date: NaiveDate) -> String {
    let weekday = match date.weekday() {
        Weekday::Mon => "seg",
        Weekday::Tue => "ter",
        Weekday::Wed => "qua",
        Weekday::Thu => "qui",
        Weekday::Fri => "sex",
        Weekday::Sat => "sáb",
        Weekday::Sun => "dom",
    };
    format!("{} {}", weekday, date.format("%d/%m"))
}
