use chrono::Weekday;
use pyo3::exceptions::{PyOSError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;
use timesheet_xlsx::{
    SpecCalendarOptions, SpecExportRequest, SpecHoliday, SpecTimesheetTheme, TimesheetError,
    derive_file_name, derive_months_info, load_holidays, render_timesheet, sanitize_file_name,
    write_timesheet_to_dir,
};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "timesheet.xlsx.writer.v1";
const C_BRIDGE_TRANSPORT: &str = "rust_native";

fn map_timesheet_error(exception: TimesheetError) -> PyErr {
    match exception {
        TimesheetError::Io { .. } => PyOSError::new_err(exception.to_string()),
        TimesheetError::InvalidRequest(_)
        | TimesheetError::InvalidDate { .. }
        | TimesheetError::InvalidHolidays(_)
        | TimesheetError::IndexOverflow(_) => PyValueError::new_err(exception.to_string()),
        TimesheetError::Xlsx(_) | TimesheetError::Closed => {
            PyRuntimeError::new_err(exception.to_string())
        }
    }
}

fn parse_spec_timesheet_theme(
    color_primary: Option<String>,
    color_secondary: Option<String>,
    font_name: Option<String>,
) -> SpecTimesheetTheme {
    let theme_default = SpecTimesheetTheme::default();
    SpecTimesheetTheme {
        color_primary: color_primary.unwrap_or(theme_default.color_primary),
        color_secondary: color_secondary.unwrap_or(theme_default.color_secondary),
        font_name: font_name.or(theme_default.font_name),
        num_format_date: theme_default.num_format_date,
    }
}

fn parse_weekdays(values: &[String]) -> PyResult<Vec<Weekday>> {
    values
        .iter()
        .map(|value| {
            value.parse::<Weekday>().map_err(|_| {
                PyValueError::new_err(format!(
                    "Invalid weekday: `{value}`. Expected one of: ['mon', 'tue', 'wed', 'thu', 'fri', 'sat', 'sun']"
                ))
            })
        })
        .collect()
}

#[pyfunction(name = "sanitize_file_name")]
fn sanitize_file_name_py(name: &str) -> String {
    sanitize_file_name(name)
}

#[pyfunction(name = "derive_file_name")]
fn derive_file_name_py(name: &str, year: i32) -> String {
    derive_file_name(name, year)
}

/// Render request JSON into `(file_name, xlsx_bytes, warnings)`.
#[pyfunction(name = "render_timesheet")]
#[pyo3(signature = (request_json, color_primary = None, color_secondary = None, font_name = None))]
fn render_timesheet_py<'py>(
    py: Python<'py>,
    request_json: &str,
    color_primary: Option<String>,
    color_secondary: Option<String>,
    font_name: Option<String>,
) -> PyResult<(String, Bound<'py, PyBytes>, Vec<String>)> {
    let request = SpecExportRequest::from_json(request_json).map_err(map_timesheet_error)?;
    let theme = parse_spec_timesheet_theme(color_primary, color_secondary, font_name);

    let artifact = py
        .allow_threads(|| render_timesheet(&request, &theme))
        .map_err(map_timesheet_error)?;
    Ok((
        artifact.file_name,
        PyBytes::new(py, &artifact.bytes),
        artifact.report.warnings,
    ))
}

/// Render request JSON into `dir_out`; returns the written file path.
#[pyfunction(name = "write_timesheet")]
#[pyo3(signature = (request_json, dir_out, color_primary = None, color_secondary = None, font_name = None))]
fn write_timesheet_py(
    py: Python<'_>,
    request_json: &str,
    dir_out: String,
    color_primary: Option<String>,
    color_secondary: Option<String>,
    font_name: Option<String>,
) -> PyResult<String> {
    let request = SpecExportRequest::from_json(request_json).map_err(map_timesheet_error)?;
    let theme = parse_spec_timesheet_theme(color_primary, color_secondary, font_name);

    let path_file_out = py
        .allow_threads(|| write_timesheet_to_dir(&request, &dir_out, &theme))
        .map_err(map_timesheet_error)?;
    Ok(path_file_out.to_string_lossy().to_string())
}

/// Load stored holiday JSON as `[(day, month), ...]`, falling back to defaults.
#[pyfunction(name = "load_holidays")]
#[pyo3(signature = (text = None))]
fn load_holidays_py(text: Option<&str>) -> Vec<(u32, u32)> {
    load_holidays(text)
        .into_iter()
        .map(|holiday| (holiday.day, holiday.month))
        .collect()
}

/// Plan month records for `year` and return them as `monthsInfo` JSON.
#[pyfunction(name = "derive_months_info")]
#[pyo3(signature = (year, holidays = None, months = None, weekdays_active = None))]
fn derive_months_info_py(
    year: i32,
    holidays: Option<Vec<(u32, u32)>>,
    months: Option<Vec<u32>>,
    weekdays_active: Option<Vec<String>>,
) -> PyResult<String> {
    let l_holidays = match holidays {
        Some(values) => values
            .into_iter()
            .map(|(day, month)| SpecHoliday { day, month })
            .collect(),
        None => load_holidays(None),
    };

    let options_default = SpecCalendarOptions::default();
    let options = SpecCalendarOptions {
        months: months.unwrap_or(options_default.months),
        weekdays_active: match weekdays_active {
            Some(values) => parse_weekdays(&values)?,
            None => options_default.weekdays_active,
        },
    };

    let l_months = derive_months_info(year, &l_holidays, &options).map_err(map_timesheet_error)?;
    serde_json::to_string(&l_months)
        .map_err(|err| PyValueError::new_err(format!("Failed to encode months: {err}")))
}

#[pymodule]
fn _timesheet_xlsx_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_function(wrap_pyfunction!(sanitize_file_name_py, module)?)?;
    module.add_function(wrap_pyfunction!(derive_file_name_py, module)?)?;
    module.add_function(wrap_pyfunction!(render_timesheet_py, module)?)?;
    module.add_function(wrap_pyfunction!(write_timesheet_py, module)?)?;
    module.add_function(wrap_pyfunction!(load_holidays_py, module)?)?;
    module.add_function(wrap_pyfunction!(derive_months_info_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    module.add("MIME_XLSX", timesheet_xlsx::C_MIME_XLSX)?;
    Ok(())
}
