//! Open/closed status from a business's weekly schedule.
//!
//! Times arrive as four-digit 24-hour strings (`"2130"`). A period whose
//! times cannot be parsed is skipped; it never aborts resolution of the
//! remaining periods.

use chrono::{Datelike, NaiveDateTime, NaiveTime};
use log::warn;
use serde::Serialize;
use thiserror::Error;

use crate::models::DetailedHours;

pub const CLOSED_NOW: &str = "Closed Now";
pub const OPEN: &str = "Open";
pub const HOURS_UNAVAILABLE: &str = "Hours unavailable";
pub const HOURS_NOT_AVAILABLE: &str = "Hours not available";
pub const CLOSED_TODAY: &str = "Closed today";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HoursError {
    #[error("malformed time {0:?}, expected HHMM")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResult {
    pub is_open: bool,
    /// 12-hour closing time, e.g. `"9:30 PM"`.
    pub closing_time: Option<String>,
    /// A malformed period was skipped and nothing else matched.
    pub hours_unavailable: bool,
}

impl StatusResult {
    pub fn closed() -> Self {
        Self {
            is_open: false,
            closing_time: None,
            hours_unavailable: false,
        }
    }

    fn open_until(end: NaiveTime) -> Self {
        Self {
            is_open: true,
            closing_time: Some(format_12_hour(end)),
            hours_unavailable: false,
        }
    }

    pub fn label(&self) -> String {
        match (self.is_open, &self.closing_time) {
            (false, _) => CLOSED_NOW.to_string(),
            (true, Some(time)) => format!("Open Until: {time}"),
            (true, None) if self.hours_unavailable => format!("{OPEN} ({HOURS_UNAVAILABLE})"),
            (true, None) => OPEN.to_string(),
        }
    }
}

pub fn parse_hhmm(raw: &str) -> Result<NaiveTime, HoursError> {
    if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HoursError::Malformed(raw.to_string()));
    }
    NaiveTime::parse_from_str(raw, "%H%M").map_err(|_| HoursError::Malformed(raw.to_string()))
}

pub fn format_12_hour(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Decides whether a business is open at `now` and, if so, when it closes.
///
/// The API's `is_open_now` flag is authoritative for open vs. closed; the
/// periods only supply the closing time. An overnight window that began
/// yesterday takes priority over today's windows, and within each pass the
/// first matching period in listed order wins.
pub fn resolve_status(schedule: Option<&DetailedHours>, now: NaiveDateTime) -> StatusResult {
    let Some(schedule) = schedule.filter(|s| s.is_open_now) else {
        return StatusResult::closed();
    };

    let today = now.weekday().num_days_from_monday();
    let yesterday = (today + 6) % 7;
    let time = now.time();
    let mut skipped_malformed = false;

    for period in schedule
        .periods
        .iter()
        .filter(|p| p.day_of_week == yesterday && p.is_overnight)
    {
        match parse_hhmm(&period.end) {
            Ok(end) if time < end => return StatusResult::open_until(end),
            Ok(_) => {}
            Err(e) => {
                warn!("Skipping overnight period from day {}: {}", period.day_of_week, e);
                skipped_malformed = true;
            }
        }
    }

    for period in schedule.periods.iter().filter(|p| p.day_of_week == today) {
        let (start, end) = match (parse_hhmm(&period.start), parse_hhmm(&period.end)) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Skipping period on day {}: {}", period.day_of_week, e);
                skipped_malformed = true;
                continue;
            }
        };

        if !period.is_overnight && start <= time && time < end {
            return StatusResult::open_until(end);
        }
        // Ends tomorrow; only the displayed time matters.
        if period.is_overnight && start <= time {
            return StatusResult::open_until(end);
        }
    }

    StatusResult {
        is_open: true,
        closing_time: None,
        hours_unavailable: skipped_malformed,
    }
}

/// Today's closing time for display, independent of the current hour.
///
/// `weekday` uses the same 0 = Monday convention as [`resolve_status`].
pub fn todays_hours(schedule: Option<&DetailedHours>, weekday: u32) -> String {
    let Some(schedule) = schedule.filter(|s| !s.periods.is_empty()) else {
        return HOURS_NOT_AVAILABLE.to_string();
    };

    match schedule.periods.iter().find(|p| p.day_of_week == weekday) {
        Some(period) => match (parse_hhmm(&period.start), parse_hhmm(&period.end)) {
            (Ok(_), Ok(end)) => format_12_hour(end),
            _ => HOURS_UNAVAILABLE.to_string(),
        },
        None => CLOSED_TODAY.to_string(),
    }
}
