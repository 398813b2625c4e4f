//! Timesheet constants, fixed labels, layout coordinates and default presets.

use crate::spec::{SpecCellFormat, SpecHoliday, SpecTimesheetTheme};

////////////////////////////////////////////////////////////////////////////////
// #region ExcelLimits

/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Sheet name used when sanitizing leaves nothing.
pub const C_SHEET_NAME_FALLBACK: &str = "Sheet";
/// Sheet name reserved by Excel (case-insensitive).
pub const C_SHEET_NAME_RESERVED: &str = "History";
/// MIME type of the produced workbook.
pub const C_MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// File extension of the produced workbook.
pub const C_EXT_XLSX: &str = "xlsx";

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Labels

/// Sheet title.
pub const C_LABEL_TITLE: &str = "Evidence docházky";
/// Prefix of the worker name cell.
pub const C_PREFIX_NAME: &str = "Jméno: ";
/// Work hours cell is `"{prefix}{from}{infix}{to}"`.
pub const C_PREFIX_WORK_HOURS: &str = "Prac. doba od ";
pub const C_INFIX_WORK_HOURS: &str = " do ";
/// Day grid header labels for columns B..F.
pub const TUP_LABELS_GRID_HEADER: [&str; 5] =
    ["Den", "Příchod", "Odchod", "Mimo pracoviště", "Důvod"];
/// Reason text for a public holiday on a working day.
pub const C_LABEL_PUBLIC_HOLIDAY: &str = "Státní svátek";
pub const C_LABEL_SIGNATURE_WORKER: &str = "Podpis pracovníka:";
pub const C_LABEL_SIGNATURE_REVIEWER: &str = "Kontroloval:";

/// Czech month names in nominative, January first.
pub const TUP_MONTH_NAMES_CS: [&str; 12] = [
    "Leden", "Únor", "Březen", "Duben", "Květen", "Červen", "Červenec", "Srpen", "Září", "Říjen",
    "Listopad", "Prosinec",
];

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Layout

// Zero-based coordinates; column B is index 1, row 3 is index 2.
pub const N_IDX_COL_MARGIN: usize = 0;
pub const N_IDX_COL_DATE: usize = 1;
pub const N_IDX_COL_ARRIVAL: usize = 2;
pub const N_IDX_COL_DEPARTURE: usize = 3;
pub const N_IDX_COL_AWAY: usize = 4;
pub const N_IDX_COL_REASON: usize = 5;

pub const N_IDX_ROW_TITLE: usize = 2;
pub const N_IDX_ROW_ORGANIZATION: usize = 3;
pub const N_IDX_ROW_RESERVED: usize = 4;
pub const N_IDX_ROW_WORK_HOURS: usize = 5;
pub const N_IDX_ROW_GRID_HEADER: usize = 6;
pub const N_IDX_ROW_DAYS_START: usize = 7;
/// Footer box height in rows; signatures sit on its middle row.
pub const N_NROWS_FOOTER: usize = 3;

pub const N_WIDTH_COL_MARGIN: f64 = 5.0;
pub const N_WIDTH_COL_NARROW: f64 = 12.0;
pub const N_WIDTH_COL_WIDE: f64 = 24.0;
pub const N_HEIGHT_ROW_TITLE: f64 = 18.0;
pub const N_HEIGHT_ROW_DAY: f64 = 16.0;
pub const N_FONT_SIZE_TITLE: i64 = 14;

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Presets

/// Header box fill, weekend/holiday row fill.
pub const C_COLOR_PRIMARY: &str = "#DDEBF7";
/// Day grid header fill.
pub const C_COLOR_SECONDARY: &str = "#BDD7EE";
pub const C_NUM_FORMAT_DATE: &str = "d.m.yyyy";

/// Built-in public holidays as `(day, month)`.
pub const TUP_DEFAULT_HOLIDAYS: [(u32, u32); 11] = [
    (1, 1),
    (1, 5),
    (8, 5),
    (5, 7),
    (6, 7),
    (28, 9),
    (28, 10),
    (17, 11),
    (24, 12),
    (25, 12),
    (26, 12),
];

/// Build default public holiday list.
pub fn derive_default_holidays() -> Vec<SpecHoliday> {
    TUP_DEFAULT_HOLIDAYS
        .iter()
        .map(|(day, month)| SpecHoliday {
            day: *day,
            month: *month,
        })
        .collect()
}

/// Base format every planned cell starts from.
pub fn derive_base_cell_format(theme: &SpecTimesheetTheme) -> SpecCellFormat {
    SpecCellFormat {
        font_name: theme.font_name.clone(),
        ..Default::default()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
