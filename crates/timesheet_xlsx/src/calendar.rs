//! Month record planning from a calendar year.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::conf::TUP_MONTH_NAMES_CS;
use crate::holidays::is_holiday;
use crate::spec::{SpecCalendarOptions, SpecDayInfo, SpecHoliday, SpecMonthInfo, TimesheetError};

/// Number of days in `month` of `year`; `None` for an invalid month/year.
pub fn count_days_in_month(year: i32, month: u32) -> Option<u32> {
    let date_first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let date_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(date_next.signed_duration_since(date_first).num_days()).ok()
}

/// Czech month name for a 1-based month.
pub fn derive_month_name(month: u32) -> Option<&'static str> {
    let n_idx = usize::try_from(month.checked_sub(1)?).ok()?;
    TUP_MONTH_NAMES_CS.get(n_idx).copied()
}

/// Build one month record per requested month.
pub fn derive_months_info(
    year: i32,
    holidays: &[SpecHoliday],
    options: &SpecCalendarOptions,
) -> Result<Vec<SpecMonthInfo>, TimesheetError> {
    options
        .months
        .iter()
        .map(|month| derive_month_info(year, *month, holidays, &options.weekdays_active))
        .collect()
}

fn derive_month_info(
    year: i32,
    month: u32,
    holidays: &[SpecHoliday],
    weekdays_active: &[Weekday],
) -> Result<SpecMonthInfo, TimesheetError> {
    let invalid = || TimesheetError::InvalidDate {
        year,
        month,
        day: 1,
    };
    let month_name = derive_month_name(month).ok_or_else(invalid)?;
    let n_days = count_days_in_month(year, month).ok_or_else(invalid)?;

    let mut l_day_infos = Vec::with_capacity(n_days as usize);
    for day in 1..=n_days {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(TimesheetError::InvalidDate { year, month, day })?;
        let weekday = date.weekday();
        l_day_infos.push(SpecDayInfo {
            year,
            month,
            day,
            is_active: weekdays_active.contains(&weekday),
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
            is_holiday: is_holiday(holidays, month, day),
        });
    }

    Ok(SpecMonthInfo {
        month_name: month_name.to_string(),
        day_infos: l_day_infos,
    })
}
