// UI models module
// Query state behind the agenda view: professional, date range and view mode

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::date::{add_days, format_iso_date, parse_iso_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    #[default]
    Week,
}

impl ViewMode {
    /// Number of days shown, inclusive of the start date.
    pub fn span_days(self) -> i64 {
        match self {
            ViewMode::Day => 1,
            ViewMode::Week => 7,
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "dia" => Ok(ViewMode::Day),
            "week" | "semana" => Ok(ViewMode::Week),
            other => Err(format!("Unknown view mode '{}', expected 'day' or 'week'", other)),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Day => f.write_str("day"),
            ViewMode::Week => f.write_str("week"),
        }
    }
}

/// The (professional, start, end, view mode) tuple the agenda is fetched for.
///
/// Dates are held as the raw form values so that an unparseable start date can be
/// observed and repaired by the transitions below. Every transition returns `true`
/// when the tuple changed, meaning the matrix must be fetched again in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaQuery {
    professional_id: Option<i64>,
    start_date: String,
    end_date: String,
    view_mode: ViewMode,
}

impl AgendaQuery {
    /// Start on `today`, with the range sized for `view_mode`.
    pub fn new(today: NaiveDate, view_mode: ViewMode) -> Self {
        Self {
            professional_id: None,
            start_date: format_iso_date(today),
            end_date: format_iso_date(add_days(today, view_mode.span_days() - 1).unwrap_or(today)),
            view_mode,
        }
    }

    pub fn professional_id(&self) -> Option<i64> {
        self.professional_id
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn end_date(&self) -> &str {
        &self.end_date
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Parsed inclusive range, if both ends are valid dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((parse_iso_date(&self.start_date)?, parse_iso_date(&self.end_date)?))
    }

    pub fn set_professional(&mut self, professional_id: Option<i64>) -> bool {
        if self.professional_id == professional_id {
            return false;
        }
        self.professional_id = professional_id;
        true
    }

    /// Day collapses the range to the start date. Week expands it to start + 6,
    /// or resets it to the week starting `today` when the start date is invalid
    /// or too close to the end of the calendar to hold a week.
    pub fn set_view_mode(&mut self, view_mode: ViewMode, today: NaiveDate) -> bool {
        let before = self.clone();
        self.view_mode = view_mode;

        match view_mode {
            ViewMode::Day => {
                self.end_date = self.start_date.clone();
            }
            ViewMode::Week => match parse_iso_date(&self.start_date).and_then(|start| add_days(start, 6)) {
                Some(end) => {
                    self.end_date = format_iso_date(end);
                }
                None => {
                    log::debug!(
                        "Start date '{}' cannot begin a week, resetting week to {}",
                        self.start_date,
                        today
                    );
                    self.start_date = format_iso_date(today);
                    self.end_date = format_iso_date(add_days(today, 6).unwrap_or(today));
                }
            },
        }

        *self != before
    }

    /// In day view the end always follows the start. In week view the end is only
    /// pushed forward when the new start would invert the range.
    pub fn set_start_date(&mut self, value: impl Into<String>) -> bool {
        let before = self.clone();
        self.start_date = value.into();

        match self.view_mode {
            ViewMode::Day => {
                self.end_date = self.start_date.clone();
            }
            ViewMode::Week => {
                if let Some(start) = parse_iso_date(&self.start_date) {
                    let inverted = parse_iso_date(&self.end_date)
                        .map(|end| start > end)
                        .unwrap_or(true);
                    if inverted {
                        self.end_date = self.start_date.clone();
                    }
                }
            }
        }

        *self != before
    }

    /// Accepted only when the new end is on or after the start date; otherwise the
    /// edit is dropped and the end date keeps its previous value.
    pub fn set_end_date(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        let accepted = match (parse_iso_date(&self.start_date), parse_iso_date(&value)) {
            (Some(start), Some(end)) => end >= start,
            _ => false,
        };

        if !accepted {
            log::debug!(
                "Rejected end date '{}' (start is '{}')",
                value,
                self.start_date
            );
            return false;
        }

        if self.end_date == value {
            return false;
        }
        self.end_date = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn week_query() -> AgendaQuery {
        AgendaQuery::new(date(2025, 4, 21), ViewMode::Week)
    }

    #[test]
    fn test_new_week_query() {
        let query = week_query();
        assert_eq!(query.start_date(), "2025-04-21");
        assert_eq!(query.end_date(), "2025-04-27");
        assert_eq!(query.professional_id(), None);
    }

    #[test]
    fn test_new_day_query() {
        let query = AgendaQuery::new(date(2025, 4, 21), ViewMode::Day);
        assert_eq!(query.end_date(), "2025-04-21");
    }

    #[test]
    fn test_switch_to_day_collapses_range() {
        let mut query = week_query();
        assert!(query.set_view_mode(ViewMode::Day, date(2030, 1, 1)));
        assert_eq!(query.start_date(), "2025-04-21");
        assert_eq!(query.end_date(), "2025-04-21");
    }

    #[test]
    fn test_switch_to_week_expands_range() {
        let mut query = AgendaQuery::new(date(2025, 4, 21), ViewMode::Day);
        assert!(query.set_view_mode(ViewMode::Week, date(2030, 1, 1)));
        assert_eq!(query.end_date(), "2025-04-27");
    }

    #[test]
    fn test_switch_to_week_with_invalid_start_resets_to_today() {
        let mut query = AgendaQuery::new(date(2025, 4, 21), ViewMode::Day);
        query.set_start_date("not-a-date");
        assert_eq!(query.end_date(), "not-a-date");

        query.set_view_mode(ViewMode::Week, date(2025, 6, 2));
        assert_eq!(query.start_date(), "2025-06-02");
        assert_eq!(query.end_date(), "2025-06-08");
    }

    #[test]
    fn test_switch_to_week_near_calendar_end_resets_to_today() {
        let mut query = AgendaQuery::new(date(2025, 4, 21), ViewMode::Day);
        query.set_start_date("+262142-12-30");
        assert!(query.date_range().is_some());

        assert!(query.set_view_mode(ViewMode::Week, date(2025, 6, 2)));
        assert_eq!(query.start_date(), "2025-06-02");
        assert_eq!(query.end_date(), "2025-06-08");
    }

    #[test]
    fn test_start_change_in_week_pushes_end_forward() {
        let mut query = week_query();
        assert!(query.set_start_date("2025-04-30"));
        assert_eq!(query.end_date(), "2025-04-30");
    }

    #[test]
    fn test_start_change_in_week_keeps_valid_end() {
        let mut query = week_query();
        assert!(query.set_start_date("2025-04-23"));
        assert_eq!(query.start_date(), "2025-04-23");
        assert_eq!(query.end_date(), "2025-04-27");
    }

    #[test]
    fn test_start_change_in_day_forces_end() {
        let mut query = AgendaQuery::new(date(2025, 4, 21), ViewMode::Day);
        query.set_start_date("2025-04-18");
        assert_eq!(query.end_date(), "2025-04-18");
    }

    #[test_case("2025-04-20", "2025-04-27", false ; "before start is rejected")]
    #[test_case("2025-04-21", "2025-04-21", true ; "equal to start is accepted")]
    #[test_case("2025-05-02", "2025-05-02", true ; "after start is accepted")]
    #[test_case("garbage", "2025-04-27", false ; "invalid is rejected")]
    fn test_set_end_date(value: &str, expected_end: &str, changed: bool) {
        let mut query = week_query();
        assert_eq!(query.set_end_date(value), changed);
        assert_eq!(query.end_date(), expected_end);
    }

    #[test]
    fn test_unchanged_transitions_report_false() {
        let mut query = week_query();
        assert!(!query.set_view_mode(ViewMode::Week, date(2025, 4, 21)));
        assert!(!query.set_end_date("2025-04-27"));
        assert!(query.set_professional(Some(3)));
        assert!(!query.set_professional(Some(3)));
    }

    #[test]
    fn test_date_range() {
        let query = week_query();
        assert_eq!(
            query.date_range(),
            Some((date(2025, 4, 21), date(2025, 4, 27)))
        );
    }

    #[test_case("day", ViewMode::Day ; "english day")]
    #[test_case("Semana", ViewMode::Week ; "portuguese week")]
    fn test_view_mode_from_str(raw: &str, expected: ViewMode) {
        assert_eq!(raw.parse::<ViewMode>().unwrap(), expected);
    }

    #[test]
    fn test_view_mode_from_str_rejects_unknown() {
        assert!("month".parse::<ViewMode>().is_err());
    }
}
