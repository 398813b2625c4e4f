//! Public holiday configuration.
//!
//! The holiday list is read once at start-up and handed to the planner by
//! value. Anything missing or malformed falls back to the built-in list.

use std::path::Path;

use tracing::warn;

use crate::conf::derive_default_holidays;
use crate::spec::{SpecHoliday, TimesheetError};

/// Parse and validate a JSON array of `{day, month}` pairs.
pub fn parse_holidays(text: &str) -> Result<Vec<SpecHoliday>, TimesheetError> {
    let l_holidays: Vec<SpecHoliday> = serde_json::from_str(text)
        .map_err(|err| TimesheetError::InvalidHolidays(err.to_string()))?;

    for holiday in &l_holidays {
        if !(1..=12).contains(&holiday.month) || !(1..=31).contains(&holiday.day) {
            return Err(TimesheetError::InvalidHolidays(format!(
                "out of range: day={}, month={}",
                holiday.day, holiday.month
            )));
        }
    }
    Ok(l_holidays)
}

/// Load holidays from stored text, falling back to defaults.
pub fn load_holidays(text: Option<&str>) -> Vec<SpecHoliday> {
    let Some(text) = text else {
        return derive_default_holidays();
    };
    match parse_holidays(text) {
        Ok(l_holidays) => l_holidays,
        Err(err) => {
            warn!("Falling back to default holidays: {err}");
            derive_default_holidays()
        }
    }
}

/// Load holidays from a JSON file, falling back to defaults when the file is
/// missing, unreadable or malformed.
pub fn load_holidays_from_path(path: impl AsRef<Path>) -> Vec<SpecHoliday> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(text) => load_holidays(Some(&text)),
        Err(err) => {
            if path.exists() {
                warn!("Failed to read holidays from {}: {err}", path.display());
            }
            derive_default_holidays()
        }
    }
}

pub fn is_holiday(holidays: &[SpecHoliday], month: u32, day: u32) -> bool {
    holidays
        .iter()
        .any(|holiday| holiday.month == month && holiday.day == day)
}
