//! `timesheet_xlsx` v1:
//! Rust-side attendance timesheet kernel.
//!
//! - `conf`     : constants, labels and default presets
//! - `spec`     : request models, formats, options and errors
//! - `util`     : pure helper functions (file/sheet names)
//! - `holidays` : public holiday configuration loading
//! - `calendar` : month record planning
//! - `layout`   : library-independent worksheet plans
//! - `writer`   : workbook rendering kernel
pub mod calendar;
pub mod conf;
pub mod holidays;
pub mod layout;
pub mod spec;
pub mod util;
pub mod writer;

pub use calendar::{count_days_in_month, derive_month_name, derive_months_info};
pub use conf::{C_MIME_XLSX, derive_default_holidays};
pub use holidays::{is_holiday, load_holidays, load_holidays_from_path, parse_holidays};
pub use layout::{SpecSheetCell, SpecSheetLayout, apply_box_border_and_fill, plan_month_sheet};
pub use spec::{
    EnumBorderStyle, EnumCellValue, SpecCalendarOptions, SpecCellFormat, SpecCellRange,
    SpecDayInfo, SpecExportRequest, SpecHoliday, SpecMonthInfo, SpecSheetMerge,
    SpecTimesheetArtifact, SpecTimesheetReport, SpecTimesheetTheme, TimesheetError,
};
pub use util::{derive_file_name, sanitize_file_name, sanitize_sheet_name};
pub use writer::{TimesheetWriter, render_layout, render_timesheet, write_timesheet_to_dir};
