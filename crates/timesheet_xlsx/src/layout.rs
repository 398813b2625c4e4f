//! Library-independent worksheet plans.
//!
//! A month sheet is first planned as a [`SpecSheetLayout`]: a sparse grid of
//! typed values and accumulated cell formats plus merges and dimensions. The
//! writer then renders the plan through `rust_xlsxwriter`.

use std::collections::BTreeMap;

use tracing::debug;

use crate::conf::{
    C_INFIX_WORK_HOURS, C_LABEL_PUBLIC_HOLIDAY, C_LABEL_SIGNATURE_REVIEWER,
    C_LABEL_SIGNATURE_WORKER, C_LABEL_TITLE, C_PREFIX_NAME, C_PREFIX_WORK_HOURS,
    N_FONT_SIZE_TITLE, N_HEIGHT_ROW_DAY, N_HEIGHT_ROW_TITLE, N_IDX_COL_ARRIVAL, N_IDX_COL_AWAY,
    N_IDX_COL_DATE, N_IDX_COL_DEPARTURE, N_IDX_COL_MARGIN, N_IDX_COL_REASON,
    N_IDX_ROW_DAYS_START, N_IDX_ROW_GRID_HEADER, N_IDX_ROW_ORGANIZATION, N_IDX_ROW_RESERVED,
    N_IDX_ROW_TITLE, N_IDX_ROW_WORK_HOURS, N_NROWS_FOOTER, N_WIDTH_COL_MARGIN, N_WIDTH_COL_NARROW,
    N_WIDTH_COL_WIDE, TUP_LABELS_GRID_HEADER, derive_base_cell_format,
};
use crate::spec::{
    EnumBorderStyle, EnumCellValue, SpecCellFormat, SpecCellRange, SpecExportRequest,
    SpecMonthInfo, SpecSheetMerge, SpecTimesheetTheme,
};

/// One planned cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecSheetCell {
    pub value: EnumCellValue,
    pub format: SpecCellFormat,
}

/// Planned worksheet content keyed by zero-based `(row, col)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecSheetLayout {
    pub sheet_name: String,
    pub cells: BTreeMap<(usize, usize), SpecSheetCell>,
    pub merges: Vec<SpecSheetMerge>,
    pub widths_by_col: BTreeMap<usize, f64>,
    pub heights_by_row: BTreeMap<usize, f64>,
}

impl SpecSheetLayout {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            ..Default::default()
        }
    }

    /// Look up a planned cell.
    pub fn cell(&self, row: usize, col: usize) -> Option<&SpecSheetCell> {
        self.cells.get(&(row, col))
    }

    /// Planned value of a cell; `None` when absent or blank.
    pub fn value(&self, row: usize, col: usize) -> Option<&EnumCellValue> {
        self.cell(row, col)
            .map(|cell| &cell.value)
            .filter(|value| !matches!(value, EnumCellValue::None))
    }

    /// Set a cell value, keeping any format already accumulated.
    pub fn set_value(&mut self, row: usize, col: usize, value: EnumCellValue) {
        self.cells.entry((row, col)).or_default().value = value;
    }

    /// Overlay `patch` onto the cell's accumulated format.
    pub fn patch_format(&mut self, row: usize, col: usize, patch: &SpecCellFormat) {
        let cell = self.cells.entry((row, col)).or_default();
        cell.format = cell.format.merge(patch);
    }

    /// Overlay `patch` onto every cell of an inclusive range.
    pub fn patch_range(&mut self, range: &SpecCellRange, patch: &SpecCellFormat) {
        for row in range.row_top..=range.row_bottom {
            for col in range.col_left..=range.col_right {
                self.patch_format(row, col, patch);
            }
        }
    }

    pub fn merge_range(&mut self, row_start: usize, col_start: usize, row_end: usize, col_end: usize) {
        self.merges.push(SpecSheetMerge {
            row_start,
            col_start,
            row_end,
            col_end,
        });
    }

    pub fn set_column_width(&mut self, col: usize, width: f64) {
        self.widths_by_col.insert(col, width);
    }

    pub fn set_row_height(&mut self, row: usize, height: f64) {
        self.heights_by_row.insert(row, height);
    }

    /// Last planned row index, if any cell exists.
    pub fn row_last(&self) -> Option<usize> {
        self.cells.keys().map(|(row, _)| *row).max()
    }
}

/// Fill every cell of `range` and border only its outer perimeter.
///
/// Interior edges are left untouched; existing per-cell formats are merged,
/// not replaced.
pub fn apply_box_border_and_fill(
    layout: &mut SpecSheetLayout,
    range: &SpecCellRange,
    border: EnumBorderStyle,
    bg_color: Option<&str>,
    border_color: Option<&str>,
) {
    for row in range.row_top..=range.row_bottom {
        for col in range.col_left..=range.col_right {
            let patch = SpecCellFormat {
                bg_color: bg_color.map(str::to_string),
                border_color: border_color.map(str::to_string),
                top: (row == range.row_top).then_some(border),
                bottom: (row == range.row_bottom).then_some(border),
                left: (col == range.col_left).then_some(border),
                right: (col == range.col_right).then_some(border),
                ..Default::default()
            };
            layout.patch_format(row, col, &patch);
        }
    }
}

/// Plan one month worksheet.
pub fn plan_month_sheet(
    month_info: &SpecMonthInfo,
    request: &SpecExportRequest,
    theme: &SpecTimesheetTheme,
) -> SpecSheetLayout {
    let mut layout = SpecSheetLayout::new(month_info.month_name.clone());
    let fmt_base = derive_base_cell_format(theme);
    let fmt_center = SpecCellFormat {
        align: Some("center".to_string()),
        ..Default::default()
    };

    layout.set_column_width(N_IDX_COL_MARGIN, N_WIDTH_COL_MARGIN);
    for col in [N_IDX_COL_DATE, N_IDX_COL_ARRIVAL, N_IDX_COL_DEPARTURE] {
        layout.set_column_width(col, N_WIDTH_COL_NARROW);
    }
    for col in [N_IDX_COL_AWAY, N_IDX_COL_REASON] {
        layout.set_column_width(col, N_WIDTH_COL_WIDE);
    }

    plan_header_block(&mut layout, request, theme, &fmt_base);
    plan_grid_header(&mut layout, theme, &fmt_base, &fmt_center);

    let n_days = month_info.day_infos.len();
    let fmt_day_border = fmt_base.with_(SpecCellFormat::with_border_all(EnumBorderStyle::Thin));
    let fmt_weekend = SpecCellFormat {
        bg_color: Some(theme.color_primary.clone()),
        ..Default::default()
    };
    let fmt_date = SpecCellFormat {
        num_format: Some(theme.num_format_date.clone()),
        ..Default::default()
    };

    for (n_idx_day, day_info) in month_info.day_infos.iter().enumerate() {
        let row = N_IDX_ROW_DAYS_START + n_idx_day;
        layout.set_row_height(row, N_HEIGHT_ROW_DAY);

        layout.set_value(
            row,
            N_IDX_COL_DATE,
            EnumCellValue::Date {
                year: day_info.year,
                month: day_info.month,
                day: day_info.day,
            },
        );
        layout.patch_format(row, N_IDX_COL_DATE, &fmt_date);

        if day_info.is_active && !day_info.is_holiday {
            layout.set_value(row, N_IDX_COL_ARRIVAL, EnumCellValue::String(request.from.clone()));
            layout.set_value(row, N_IDX_COL_DEPARTURE, EnumCellValue::String(request.to.clone()));
        }
        if day_info.is_holiday && !day_info.is_weekend {
            layout.set_value(
                row,
                N_IDX_COL_REASON,
                EnumCellValue::String(C_LABEL_PUBLIC_HOLIDAY.to_string()),
            );
        }

        for col in N_IDX_COL_DATE..=N_IDX_COL_REASON {
            layout.patch_format(row, col, &fmt_day_border);
            if col != N_IDX_COL_DATE {
                layout.patch_format(row, col, &fmt_center);
            }
            if day_info.is_weekend || day_info.is_holiday {
                layout.patch_format(row, col, &fmt_weekend);
            }
        }
    }

    plan_footer(&mut layout, N_IDX_ROW_DAYS_START + n_days, &fmt_base);

    debug!(
        "Planned sheet {:?}: days={}, cells={}, merges={}",
        layout.sheet_name,
        n_days,
        layout.cells.len(),
        layout.merges.len()
    );
    layout
}

fn plan_header_block(
    layout: &mut SpecSheetLayout,
    request: &SpecExportRequest,
    theme: &SpecTimesheetTheme,
    fmt_base: &SpecCellFormat,
) {
    layout.set_row_height(N_IDX_ROW_TITLE, N_HEIGHT_ROW_TITLE);

    layout.merge_range(N_IDX_ROW_TITLE, N_IDX_COL_DATE, N_IDX_ROW_TITLE, N_IDX_COL_DEPARTURE);
    layout.set_value(
        N_IDX_ROW_TITLE,
        N_IDX_COL_DATE,
        EnumCellValue::String(C_LABEL_TITLE.to_string()),
    );
    layout.patch_format(
        N_IDX_ROW_TITLE,
        N_IDX_COL_DATE,
        &SpecCellFormat {
            bold: Some(true),
            font_size: Some(N_FONT_SIZE_TITLE),
            align: Some("center".to_string()),
            ..Default::default()
        },
    );

    let l_texts_right = [
        (N_IDX_ROW_TITLE, format!("{C_PREFIX_NAME}{}", request.name)),
        (N_IDX_ROW_ORGANIZATION, request.organization.clone()),
        (N_IDX_ROW_RESERVED, String::new()),
        (
            N_IDX_ROW_WORK_HOURS,
            format!(
                "{C_PREFIX_WORK_HOURS}{}{C_INFIX_WORK_HOURS}{}",
                request.from, request.to
            ),
        ),
    ];
    for (row, text) in l_texts_right {
        layout.merge_range(row, N_IDX_COL_AWAY, row, N_IDX_COL_REASON);
        if !text.is_empty() {
            layout.set_value(row, N_IDX_COL_AWAY, EnumCellValue::String(text));
        }
    }

    let range_header = SpecCellRange {
        row_top: N_IDX_ROW_TITLE,
        col_left: N_IDX_COL_DATE,
        col_right: N_IDX_COL_REASON,
        row_bottom: N_IDX_ROW_WORK_HOURS,
    };
    layout.patch_range(&range_header, fmt_base);
    apply_box_border_and_fill(
        layout,
        &range_header,
        EnumBorderStyle::Thin,
        Some(&theme.color_primary),
        Some(&theme.color_primary),
    );
}

fn plan_grid_header(
    layout: &mut SpecSheetLayout,
    theme: &SpecTimesheetTheme,
    fmt_base: &SpecCellFormat,
    fmt_center: &SpecCellFormat,
) {
    let row = N_IDX_ROW_GRID_HEADER;
    for (n_offset, label) in TUP_LABELS_GRID_HEADER.iter().enumerate() {
        layout.set_value(row, N_IDX_COL_DATE + n_offset, EnumCellValue::String(label.to_string()));
    }

    let range_grid_header = SpecCellRange {
        row_top: row,
        col_left: N_IDX_COL_DATE,
        col_right: N_IDX_COL_REASON,
        row_bottom: row,
    };
    layout.patch_range(&range_grid_header, fmt_base);
    apply_box_border_and_fill(
        layout,
        &range_grid_header,
        EnumBorderStyle::Thin,
        Some(&theme.color_secondary),
        None,
    );
    layout.patch_range(
        &range_grid_header,
        &SpecCellFormat {
            bottom: Some(EnumBorderStyle::Thick),
            ..Default::default()
        },
    );
    layout.patch_range(&range_grid_header, fmt_center);
}

fn plan_footer(layout: &mut SpecSheetLayout, row_top: usize, fmt_base: &SpecCellFormat) {
    let range_footer = SpecCellRange {
        row_top,
        col_left: N_IDX_COL_DATE,
        col_right: N_IDX_COL_REASON,
        row_bottom: row_top + N_NROWS_FOOTER - 1,
    };
    layout.patch_range(&range_footer, fmt_base);
    apply_box_border_and_fill(layout, &range_footer, EnumBorderStyle::Thin, None, None);

    let row_signature = row_top + 1;
    layout.merge_range(row_signature, N_IDX_COL_DATE, row_signature, N_IDX_COL_DEPARTURE);
    layout.set_value(
        row_signature,
        N_IDX_COL_DATE,
        EnumCellValue::String(C_LABEL_SIGNATURE_WORKER.to_string()),
    );
    layout.set_value(
        row_signature,
        N_IDX_COL_REASON,
        EnumCellValue::String(C_LABEL_SIGNATURE_REVIEWER.to_string()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecDayInfo;

    fn create_day(day: u32, is_active: bool, is_weekend: bool, is_holiday: bool) -> SpecDayInfo {
        SpecDayInfo {
            year: 2024,
            month: 5,
            day,
            is_active,
            is_weekend,
            is_holiday,
        }
    }

    fn create_request(l_days: Vec<SpecDayInfo>) -> SpecExportRequest {
        SpecExportRequest {
            name: "Jana Nováková".to_string(),
            organization: "Městský úřad".to_string(),
            from: "8:00".to_string(),
            to: "16:30".to_string(),
            year: 2024,
            months_info: vec![SpecMonthInfo {
                month_name: "Květen".to_string(),
                day_infos: l_days,
            }],
        }
    }

    fn plan(request: &SpecExportRequest) -> SpecSheetLayout {
        plan_month_sheet(
            &request.months_info[0],
            request,
            &SpecTimesheetTheme::default(),
        )
    }

    fn text(value: &str) -> EnumCellValue {
        EnumCellValue::String(value.to_string())
    }

    #[test]
    fn test_box_borders_only_outer_edges_and_fills_all() {
        let mut layout = SpecSheetLayout::new("s");
        let range = SpecCellRange {
            row_top: 0,
            col_left: 0,
            col_right: 2,
            row_bottom: 2,
        };
        apply_box_border_and_fill(&mut layout, &range, EnumBorderStyle::Thin, Some("#FF0000"), None);

        let fmt_corner = &layout.cell(0, 0).unwrap().format;
        assert_eq!(fmt_corner.top, Some(EnumBorderStyle::Thin));
        assert_eq!(fmt_corner.left, Some(EnumBorderStyle::Thin));
        assert_eq!(fmt_corner.bottom, None);
        assert_eq!(fmt_corner.right, None);

        let fmt_center = &layout.cell(1, 1).unwrap().format;
        assert_eq!(fmt_center.top, None);
        assert_eq!(fmt_center.bottom, None);
        assert_eq!(fmt_center.left, None);
        assert_eq!(fmt_center.right, None);
        assert_eq!(fmt_center.bg_color.as_deref(), Some("#FF0000"));

        let fmt_bottom_right = &layout.cell(2, 2).unwrap().format;
        assert_eq!(fmt_bottom_right.bottom, Some(EnumBorderStyle::Thin));
        assert_eq!(fmt_bottom_right.right, Some(EnumBorderStyle::Thin));
        assert_eq!(layout.cells.len(), 9);
    }

    #[test]
    fn test_box_keeps_existing_edges() {
        let mut layout = SpecSheetLayout::new("s");
        layout.patch_format(1, 1, &SpecCellFormat::with_border_all(EnumBorderStyle::Thick));
        let range = SpecCellRange {
            row_top: 1,
            col_left: 1,
            col_right: 1,
            row_bottom: 3,
        };
        apply_box_border_and_fill(&mut layout, &range, EnumBorderStyle::Thin, None, None);

        let fmt = &layout.cell(1, 1).unwrap().format;
        assert_eq!(fmt.top, Some(EnumBorderStyle::Thin));
        assert_eq!(fmt.bottom, Some(EnumBorderStyle::Thick));
        assert_eq!(fmt.bg_color, None);
    }

    #[test]
    fn test_header_block_texts_and_merges() {
        let layout = plan(&create_request(vec![create_day(1, true, false, false)]));

        assert_eq!(layout.value(2, 1), Some(&text("Evidence docházky")));
        assert_eq!(layout.value(2, 4), Some(&text("Jméno: Jana Nováková")));
        assert_eq!(layout.value(3, 4), Some(&text("Městský úřad")));
        assert_eq!(layout.value(4, 4), None);
        assert_eq!(layout.value(5, 4), Some(&text("Prac. doba od 8:00 do 16:30")));

        for merge in [
            SpecSheetMerge { row_start: 2, col_start: 1, row_end: 2, col_end: 3 },
            SpecSheetMerge { row_start: 2, col_start: 4, row_end: 2, col_end: 5 },
            SpecSheetMerge { row_start: 3, col_start: 4, row_end: 3, col_end: 5 },
            SpecSheetMerge { row_start: 4, col_start: 4, row_end: 4, col_end: 5 },
            SpecSheetMerge { row_start: 5, col_start: 4, row_end: 5, col_end: 5 },
        ] {
            assert!(layout.merges.contains(&merge), "missing merge {merge:?}");
        }

        let fmt_title = &layout.cell(2, 1).unwrap().format;
        assert_eq!(fmt_title.bold, Some(true));
        assert_eq!(fmt_title.font_size, Some(14));
        assert_eq!(fmt_title.align.as_deref(), Some("center"));
        assert_eq!(layout.heights_by_row.get(&2), Some(&18.0));

        // Header box spans B3:F6 with the primary fill.
        let fmt_inner = &layout.cell(4, 2).unwrap().format;
        assert_eq!(fmt_inner.bg_color.as_deref(), Some("#DDEBF7"));
        assert_eq!(fmt_inner.top, None);
        assert_eq!(layout.cell(5, 5).unwrap().format.right, Some(EnumBorderStyle::Thin));
        assert_eq!(layout.cell(5, 5).unwrap().format.bottom, Some(EnumBorderStyle::Thin));
    }

    #[test]
    fn test_column_widths() {
        let layout = plan(&create_request(vec![]));
        let l_widths: Vec<(usize, f64)> =
            layout.widths_by_col.iter().map(|(col, width)| (*col, *width)).collect();
        assert_eq!(
            l_widths,
            vec![(0, 5.0), (1, 12.0), (2, 12.0), (3, 12.0), (4, 24.0), (5, 24.0)]
        );
    }

    #[test]
    fn test_grid_header_has_labels_fill_and_thick_bottom() {
        let layout = plan(&create_request(vec![]));
        let l_labels: Vec<_> = (1..=5).map(|col| layout.value(6, col).cloned()).collect();
        assert_eq!(
            l_labels,
            vec![
                Some(text("Den")),
                Some(text("Příchod")),
                Some(text("Odchod")),
                Some(text("Mimo pracoviště")),
                Some(text("Důvod")),
            ]
        );

        for col in 1..=5 {
            let fmt = &layout.cell(6, col).unwrap().format;
            assert_eq!(fmt.bottom, Some(EnumBorderStyle::Thick));
            assert_eq!(fmt.top, Some(EnumBorderStyle::Thin));
            assert_eq!(fmt.bg_color.as_deref(), Some("#BDD7EE"));
            assert_eq!(fmt.align.as_deref(), Some("center"));
        }
        assert_eq!(layout.cell(6, 1).unwrap().format.left, Some(EnumBorderStyle::Thin));
        assert_eq!(layout.cell(6, 3).unwrap().format.left, None);
        assert_eq!(layout.cell(6, 5).unwrap().format.right, Some(EnumBorderStyle::Thin));
    }

    #[test]
    fn test_day_rows_and_footer_position() {
        let l_days: Vec<_> = (1..=31).map(|day| create_day(day, true, false, false)).collect();
        let layout = plan(&create_request(l_days));

        for n_idx in 0..31 {
            let row = 7 + n_idx;
            assert_eq!(
                layout.value(row, 1),
                Some(&EnumCellValue::Date {
                    year: 2024,
                    month: 5,
                    day: n_idx as u32 + 1
                })
            );
            assert_eq!(layout.heights_by_row.get(&row), Some(&16.0));
        }

        // Footer box occupies rows 8+N..10+N (1-based).
        let row_footer = 7 + 31;
        assert_eq!(layout.value(row_footer, 1), None);
        assert_eq!(
            layout.cell(row_footer, 1).unwrap().format.top,
            Some(EnumBorderStyle::Thin)
        );
        assert_eq!(layout.value(row_footer + 1, 1), Some(&text("Podpis pracovníka:")));
        assert_eq!(layout.value(row_footer + 1, 5), Some(&text("Kontroloval:")));
        assert!(layout.merges.contains(&SpecSheetMerge {
            row_start: row_footer + 1,
            col_start: 1,
            row_end: row_footer + 1,
            col_end: 3,
        }));
        assert_eq!(
            layout.cell(row_footer + 2, 5).unwrap().format.bottom,
            Some(EnumBorderStyle::Thin)
        );
        assert_eq!(layout.cell(row_footer + 1, 3).unwrap().format.bg_color, None);
        assert_eq!(layout.row_last(), Some(row_footer + 2));
    }

    #[test]
    fn test_active_days_get_times_regardless_of_weekend() {
        let layout = plan(&create_request(vec![
            create_day(1, true, false, false),
            create_day(2, true, true, false),
            create_day(3, false, false, false),
        ]));

        assert_eq!(layout.value(7, 2), Some(&text("8:00")));
        assert_eq!(layout.value(7, 3), Some(&text("16:30")));
        assert_eq!(layout.value(8, 2), Some(&text("8:00")));
        assert_eq!(layout.value(8, 3), Some(&text("16:30")));
        assert_eq!(layout.value(9, 2), None);
        assert_eq!(layout.value(9, 3), None);

        assert_eq!(layout.cell(7, 2).unwrap().format.bg_color, None);
        assert_eq!(
            layout.cell(8, 2).unwrap().format.bg_color.as_deref(),
            Some("#DDEBF7")
        );
    }

    #[test]
    fn test_holiday_label_only_on_working_days() {
        let layout = plan(&create_request(vec![
            create_day(1, true, false, true),
            create_day(2, false, true, true),
        ]));

        assert_eq!(layout.value(7, 5), Some(&text("Státní svátek")));
        assert_eq!(layout.value(7, 2), None);
        assert_eq!(layout.value(7, 3), None);

        assert_eq!(layout.value(8, 5), None);
        for col in 1..=5 {
            assert_eq!(
                layout.cell(8, col).unwrap().format.bg_color.as_deref(),
                Some("#DDEBF7")
            );
        }
    }

    #[test]
    fn test_day_cells_borders_and_alignment() {
        let layout = plan(&create_request(vec![create_day(1, true, false, false)]));

        for col in 1..=5 {
            let fmt = &layout.cell(7, col).unwrap().format;
            assert_eq!(fmt.top, Some(EnumBorderStyle::Thin));
            assert_eq!(fmt.bottom, Some(EnumBorderStyle::Thin));
            assert_eq!(fmt.left, Some(EnumBorderStyle::Thin));
            assert_eq!(fmt.right, Some(EnumBorderStyle::Thin));
            let c_align_expected = if col == 1 { None } else { Some("center") };
            assert_eq!(fmt.align.as_deref(), c_align_expected);
        }
        assert_eq!(
            layout.cell(7, 1).unwrap().format.num_format.as_deref(),
            Some("d.m.yyyy")
        );
        // Away-from-workplace column stays empty for manual entry.
        assert_eq!(layout.value(7, 4), None);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let request = create_request(vec![
            create_day(1, true, false, true),
            create_day(2, true, true, false),
        ]);
        assert_eq!(plan(&request), plan(&request));
    }

    #[test]
    fn test_theme_font_applies_to_header() {
        let request = create_request(vec![]);
        let theme = SpecTimesheetTheme {
            font_name: Some("Arial".to_string()),
            ..Default::default()
        };
        let layout = plan_month_sheet(&request.months_info[0], &request, &theme);
        assert_eq!(
            layout.cell(2, 1).unwrap().format.font_name.as_deref(),
            Some("Arial")
        );
        assert_eq!(
            layout.cell(6, 3).unwrap().format.font_name.as_deref(),
            Some("Arial")
        );
    }
}
