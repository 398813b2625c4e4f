//! Shared timesheet models, options, reports and errors.

use std::path::PathBuf;

use chrono::Weekday;
use rust_xlsxwriter::XlsxError;
use serde::{Deserialize, Serialize};

use crate::conf::{C_COLOR_PRIMARY, C_COLOR_SECONDARY, C_NUM_FORMAT_DATE};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Border line style for one cell edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumBorderStyle {
    /// Explicitly no border.
    None,
    #[default]
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
}

/// Cell format specification.
///
/// Every field is optional so that independent styling passes can be layered
/// onto the same cell with [`SpecCellFormat::merge`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,

    /// Horizontal alignment (`"left"`, `"center"`, `"right"`).
    pub align: Option<String>,

    /// Top border.
    pub top: Option<EnumBorderStyle>,
    /// Bottom border.
    pub bottom: Option<EnumBorderStyle>,
    /// Left border.
    pub left: Option<EnumBorderStyle>,
    /// Right border.
    pub right: Option<EnumBorderStyle>,
    /// Border color for all set edges.
    pub border_color: Option<String>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Solid background fill color.
    pub bg_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            top: other.top.or(self.top),
            bottom: other.bottom.or(self.bottom),
            left: other.left.or(self.left),
            right: other.right.or(self.right),
            border_color: other
                .border_color
                .clone()
                .or_else(|| self.border_color.clone()),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
        }
    }

    /// Format with the same border style on all four edges.
    pub fn with_border_all(style: EnumBorderStyle) -> SpecCellFormat {
        SpecCellFormat {
            top: Some(style),
            bottom: Some(style),
            left: Some(style),
            right: Some(style),
            ..Default::default()
        }
    }
}

/// Typed cell value in a planned sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EnumCellValue {
    /// Blank (format only).
    #[default]
    None,
    /// Text value.
    String(String),
    /// Calendar date written as an Excel date serial.
    Date { year: i32, month: u32, day: u32 },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetGeometry

/// Rectangular cell region, all bounds inclusive and zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecCellRange {
    pub row_top: usize,
    pub col_left: usize,
    pub col_right: usize,
    pub row_bottom: usize,
}

/// Merged range; the top-left cell is the anchor holding the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpecSheetMerge {
    pub row_start: usize,
    pub col_start: usize,
    pub row_end: usize,
    pub col_end: usize,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RequestModels

/// One calendar day of a month record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecDayInfo {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Worker is scheduled to work this day.
    pub is_active: bool,
    pub is_weekend: bool,
    /// Date falls on a public holiday.
    pub is_holiday: bool,
}

/// One month to render as a worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecMonthInfo {
    /// Worksheet title.
    pub month_name: String,
    /// Days in ascending order; position `i` is rendered on data row `i`.
    pub day_infos: Vec<SpecDayInfo>,
}

/// Full export request as received from the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecExportRequest {
    pub name: String,
    pub organization: String,
    /// Shift start, display text only.
    pub from: String,
    /// Shift end, display text only.
    pub to: String,
    pub year: i32,
    pub months_info: Vec<SpecMonthInfo>,
}

impl SpecExportRequest {
    /// Parse the inbound JSON message.
    pub fn from_json(text: &str) -> Result<Self, TimesheetError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Public holiday recurring every year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpecHoliday {
    pub day: u32,
    pub month: u32,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Colors and fonts applied to every rendered sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTimesheetTheme {
    /// Header box and weekend/holiday row fill.
    pub color_primary: String,
    /// Day grid header fill.
    pub color_secondary: String,
    /// Font family; library default when `None`.
    pub font_name: Option<String>,
    /// Number format of the date column.
    pub num_format_date: String,
}

impl Default for SpecTimesheetTheme {
    fn default() -> Self {
        Self {
            color_primary: C_COLOR_PRIMARY.to_string(),
            color_secondary: C_COLOR_SECONDARY.to_string(),
            font_name: None,
            num_format_date: C_NUM_FORMAT_DATE.to_string(),
        }
    }
}

/// Options for deriving month records from a calendar year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCalendarOptions {
    /// Months (1-based) to plan, in output order.
    pub months: Vec<u32>,
    /// Weekdays the worker is scheduled on.
    pub weekdays_active: Vec<Weekday>,
}

impl Default for SpecCalendarOptions {
    fn default() -> Self {
        Self {
            months: (1..=12).collect(),
            weekdays_active: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportAndArtifact

/// Per-workbook report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecTimesheetReport {
    /// Actual sheet names in workbook order.
    pub sheets: Vec<String>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecTimesheetReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

/// Serialized workbook ready to be offered as a download.
#[derive(Debug, Clone)]
pub struct SpecTimesheetArtifact {
    /// `<sanitized-name>_<year>.xlsx`.
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub report: SpecTimesheetReport,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Errors raised while planning or rendering a timesheet.
#[derive(Debug, thiserror::Error)]
pub enum TimesheetError {
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("invalid date: {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("{0}")]
    IndexOverflow(String),
    #[error("invalid export request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
    #[error("invalid holiday configuration: {0}")]
    InvalidHolidays(String),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot write after close().")]
    Closed,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_per_key_only() {
        let fmt_box = SpecCellFormat {
            top: Some(EnumBorderStyle::Thin),
            left: Some(EnumBorderStyle::Thin),
            bottom: Some(EnumBorderStyle::Thin),
            bg_color: Some("#BDD7EE".to_string()),
            ..Default::default()
        };
        let fmt_merged = fmt_box.merge(&SpecCellFormat {
            bottom: Some(EnumBorderStyle::Thick),
            ..Default::default()
        });

        assert_eq!(fmt_merged.top, Some(EnumBorderStyle::Thin));
        assert_eq!(fmt_merged.left, Some(EnumBorderStyle::Thin));
        assert_eq!(fmt_merged.bottom, Some(EnumBorderStyle::Thick));
        assert_eq!(fmt_merged.right, None);
        assert_eq!(fmt_merged.bg_color.as_deref(), Some("#BDD7EE"));
    }

    #[test]
    fn test_border_style_default_is_thin() {
        assert_eq!(EnumBorderStyle::default(), EnumBorderStyle::Thin);
        assert_eq!(
            SpecCellFormat::with_border_all(EnumBorderStyle::default()).left,
            Some(EnumBorderStyle::Thin)
        );
    }

    #[test]
    fn test_export_request_from_json() {
        let request = SpecExportRequest::from_json(
            r#"{
                "name": "Jana Nováková",
                "organization": "ZŠ Komenského",
                "from": "7:30",
                "to": "15:30",
                "year": 2024,
                "monthsInfo": [{
                    "monthName": "Leden",
                    "dayInfos": [{
                        "year": 2024, "month": 1, "day": 1,
                        "isActive": true, "isWeekend": false, "isHoliday": true
                    }]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(request.from, "7:30");
        assert_eq!(request.months_info[0].month_name, "Leden");
        assert!(request.months_info[0].day_infos[0].is_holiday);
    }

    #[test]
    fn test_export_request_from_json_rejects_missing_fields() {
        let err = SpecExportRequest::from_json(r#"{"name": "Jana"}"#).unwrap_err();
        assert!(matches!(err, TimesheetError::InvalidRequest(_)));
    }
}
