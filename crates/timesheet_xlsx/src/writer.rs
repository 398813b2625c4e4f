//! XLSX writer kernel that renders planned month sheets into a workbook.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::{ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::{info, warn};

use crate::calendar::count_days_in_month;
use crate::layout::{SpecSheetLayout, plan_month_sheet};
use crate::spec::{
    EnumBorderStyle, EnumCellValue, SpecCellFormat, SpecExportRequest, SpecMonthInfo,
    SpecTimesheetArtifact, SpecTimesheetReport, SpecTimesheetTheme, TimesheetError,
};
use crate::util::{
    cast_col_num, cast_row_num, create_sheet_identifier, derive_file_name, sanitize_sheet_name,
};

/// Stateful workbook writer, one worksheet per month.
pub struct TimesheetWriter {
    workbook: Workbook,
    theme: SpecTimesheetTheme,
    set_sheet_names_existing: BTreeSet<String>,
    report: SpecTimesheetReport,
    if_closed: bool,
}

impl Default for TimesheetWriter {
    fn default() -> Self {
        Self::new(SpecTimesheetTheme::default())
    }
}

impl TimesheetWriter {
    /// Create writer with the given theme.
    ///
    /// The workbook is buffered in memory until [`Self::close_to_buffer`] or
    /// [`Self::close`] is called.
    pub fn new(theme: SpecTimesheetTheme) -> Self {
        Self {
            workbook: Workbook::new(),
            theme,
            set_sheet_names_existing: BTreeSet::new(),
            report: SpecTimesheetReport::default(),
            if_closed: false,
        }
    }

    /// Return snapshot of the workbook report.
    pub fn report(&self) -> SpecTimesheetReport {
        self.report.clone()
    }

    /// Append one worksheet for `month_info`.
    pub fn write_month_sheet(
        &mut self,
        month_info: &SpecMonthInfo,
        request: &SpecExportRequest,
    ) -> Result<(), TimesheetError> {
        if self.if_closed {
            return Err(TimesheetError::Closed);
        }

        self.check_day_count(month_info);
        let mut layout = plan_month_sheet(month_info, request, &self.theme);
        layout.sheet_name = self.derive_unique_sheet_name(&month_info.month_name);

        let worksheet = self.workbook.add_worksheet();
        render_layout(worksheet, &layout)?;
        self.report.sheets.push(layout.sheet_name);
        Ok(())
    }

    /// Serialize workbook to bytes. Further writes are rejected.
    pub fn close_to_buffer(&mut self) -> Result<Vec<u8>, TimesheetError> {
        if self.if_closed {
            return Err(TimesheetError::Closed);
        }
        let v_bytes = self.workbook.save_to_buffer()?;
        self.if_closed = true;
        Ok(v_bytes)
    }

    /// Flush workbook to `path_file_out`. Fails with [`TimesheetError::Closed`]
    /// once the workbook has already been serialized.
    pub fn close(&mut self, path_file_out: &Path) -> Result<(), TimesheetError> {
        let v_bytes = self.close_to_buffer()?;
        std::fs::write(path_file_out, v_bytes).map_err(|source| TimesheetError::Io {
            path: path_file_out.to_path_buf(),
            source,
        })
    }

    fn check_day_count(&mut self, month_info: &SpecMonthInfo) {
        let Some(day_first) = month_info.day_infos.first() else {
            return;
        };
        let Some(n_days_expected) = count_days_in_month(day_first.year, day_first.month) else {
            return;
        };
        if month_info.day_infos.len() != n_days_expected as usize {
            let c_msg = format!(
                "Sheet {:?}: {} day rows, calendar month has {n_days_expected}.",
                month_info.month_name,
                month_info.day_infos.len()
            );
            warn!("{c_msg}");
            self.report.warn(c_msg);
        }
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        let c_name = sanitize_sheet_name(name, "_");
        // Excel compares sheet names case-insensitively.
        let mut c_candidate = c_name.clone();
        let mut n_idx = 2usize;
        while self
            .set_sheet_names_existing
            .contains(&c_candidate.to_lowercase())
        {
            c_candidate = create_sheet_identifier(&c_name, n_idx);
            n_idx += 1;
        }
        self.set_sheet_names_existing
            .insert(c_candidate.to_lowercase());

        if c_candidate != name {
            let c_msg = format!("Sheet name {name:?} written as {c_candidate:?}.");
            warn!("{c_msg}");
            self.report.warn(c_msg);
        }
        c_candidate
    }
}

/// Render the whole request into an in-memory workbook.
pub fn render_timesheet(
    request: &SpecExportRequest,
    theme: &SpecTimesheetTheme,
) -> Result<SpecTimesheetArtifact, TimesheetError> {
    let mut writer = TimesheetWriter::new(theme.clone());
    for month_info in &request.months_info {
        writer.write_month_sheet(month_info, request)?;
    }
    let v_bytes = writer.close_to_buffer()?;
    let file_name = derive_file_name(&request.name, request.year);

    info!(
        "Rendered timesheet {file_name}: sheets={}, bytes={}",
        request.months_info.len(),
        v_bytes.len()
    );
    Ok(SpecTimesheetArtifact {
        file_name,
        bytes: v_bytes,
        report: writer.report(),
    })
}

/// Render the request and write it into `dir_out` under its download name.
pub fn write_timesheet_to_dir(
    request: &SpecExportRequest,
    dir_out: impl AsRef<Path>,
    theme: &SpecTimesheetTheme,
) -> Result<PathBuf, TimesheetError> {
    let mut writer = TimesheetWriter::new(theme.clone());
    for month_info in &request.months_info {
        writer.write_month_sheet(month_info, request)?;
    }
    let path_file_out = dir_out
        .as_ref()
        .join(derive_file_name(&request.name, request.year));
    writer.close(&path_file_out)?;

    info!(
        "Wrote timesheet {}: sheets={}",
        path_file_out.display(),
        request.months_info.len()
    );
    Ok(path_file_out)
}

/// Issue worksheet commands for a planned layout.
///
/// Merges are laid down first; every planned cell is then written with its own
/// format so that covered cells keep their perimeter borders.
pub fn render_layout(
    worksheet: &mut Worksheet,
    layout: &SpecSheetLayout,
) -> Result<(), TimesheetError> {
    worksheet.set_name(&layout.sheet_name)?;

    for (col, width) in &layout.widths_by_col {
        worksheet.set_column_width(cast_col_num(*col)?, *width)?;
    }
    for (row, height) in &layout.heights_by_row {
        worksheet.set_row_height(cast_row_num(*row)?, *height)?;
    }

    for merge in &layout.merges {
        let format = layout
            .cell(merge.row_start, merge.col_start)
            .map(|cell| derive_rust_xlsx_format(&cell.format))
            .unwrap_or_else(Format::new);
        worksheet.merge_range(
            cast_row_num(merge.row_start)?,
            cast_col_num(merge.col_start)?,
            cast_row_num(merge.row_end)?,
            cast_col_num(merge.col_end)?,
            "",
            &format,
        )?;
    }

    for ((row, col), cell) in &layout.cells {
        let format = derive_rust_xlsx_format(&cell.format);
        write_cell_with_format(worksheet, *row, *col, &cell.value, &format)?;
    }

    Ok(())
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), TimesheetError> {
    let row = cast_row_num(row_idx)?;
    let col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::None => {
            worksheet.write_blank(row, col, format)?;
        }
        EnumCellValue::String(val) => {
            worksheet.write_string_with_format(row, col, val, format)?;
        }
        EnumCellValue::Date { year, month, day } => {
            let date = derive_excel_date(*year, *month, *day)?;
            worksheet.write_datetime_with_format(row, col, &date, format)?;
        }
    }
    Ok(())
}

fn derive_excel_date(year: i32, month: u32, day: u32) -> Result<ExcelDateTime, TimesheetError> {
    let invalid = || TimesheetError::InvalidDate { year, month, day };
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
    let n_year = u16::try_from(year).map_err(|_| invalid())?;
    let n_month = u8::try_from(month).map_err(|_| invalid())?;
    let n_day = u8::try_from(day).map_err(|_| invalid())?;
    ExcelDateTime::from_ymd(n_year, n_month, n_day).map_err(|_| invalid())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }

    if let Some(val) = spec.top {
        format = format.set_border_top(derive_format_border(val));
    }
    if let Some(val) = spec.bottom {
        format = format.set_border_bottom(derive_format_border(val));
    }
    if let Some(val) = spec.left {
        format = format.set_border_left(derive_format_border(val));
    }
    if let Some(val) = spec.right {
        format = format.set_border_right(derive_format_border(val));
    }
    if let Some(val) = &spec.border_color {
        format = format.set_border_color(val.as_str());
    }

    format
}

fn derive_format_border(border: EnumBorderStyle) -> FormatBorder {
    match border {
        EnumBorderStyle::None => FormatBorder::None,
        EnumBorderStyle::Thin => FormatBorder::Thin,
        EnumBorderStyle::Medium => FormatBorder::Medium,
        EnumBorderStyle::Thick => FormatBorder::Thick,
        EnumBorderStyle::Dashed => FormatBorder::Dashed,
        EnumBorderStyle::Dotted => FormatBorder::Dotted,
        EnumBorderStyle::Double => FormatBorder::Double,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        _ => None,
    }
}
