//! Stateless helper utilities used by the timesheet kernel.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::conf::{
    C_EXT_XLSX, C_SHEET_NAME_FALLBACK, C_SHEET_NAME_RESERVED, N_LEN_EXCEL_SHEET_NAME_MAX,
    TUP_EXCEL_ILLEGAL,
};
use crate::spec::TimesheetError;

static RE_WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));
// ASCII word class, so letters without a decomposition (e.g. `ł`) are dropped.
static RE_NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("static regex"));

////////////////////////////////////////////////////////////////////////////////
// #region FileNames

/// Strip combining diacritics after canonical decomposition.
pub fn strip_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|chr| !('\u{0300}'..='\u{036f}').contains(chr))
        .collect()
}

/// Turn a display name into a lowercase file name fragment.
///
/// A two-word name (`"First Last"`) yields just the surname; any other word
/// count yields the whole name joined by underscores.
pub fn sanitize_file_name(name: &str) -> String {
    let c_name = strip_diacritics(name);
    let l_words: Vec<&str> = RE_WHITESPACE_RUN.split(&c_name).collect();

    let c_token = if l_words.len() == 2 {
        RE_NON_WORD.replace_all(l_words[1], "").into_owned()
    } else {
        let c_joined = RE_WHITESPACE_RUN.replace_all(&c_name, "_");
        RE_NON_WORD.replace_all(&c_joined, "").into_owned()
    };

    c_token.to_lowercase()
}

/// Build the download file name `<sanitized-name>_<year>.xlsx`.
pub fn derive_file_name(name: &str, year: i32) -> String {
    format!("{}_{year}.{C_EXT_XLSX}", sanitize_file_name(name))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to a sheet name Excel accepts.
///
/// Leading/trailing apostrophes are dropped and the reserved name `History`
/// gets a `replace_to` suffix.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().trim_matches('\'').trim().to_string();
    if c_name.is_empty() {
        c_name = C_SHEET_NAME_FALLBACK.to_string();
    }
    if c_name.eq_ignore_ascii_case(C_SHEET_NAME_RESERVED) {
        c_name.push_str(replace_to);
    }

    let c_name: String = c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect();
    // Truncation may expose a trailing apostrophe.
    let c_name = c_name.trim_end_matches('\'').trim_end();
    if c_name.is_empty() {
        C_SHEET_NAME_FALLBACK.to_string()
    } else {
        c_name.to_string()
    }
}

/// Create suffixed sheet name (`base__2`, `base__3`, ...), respecting length cap.
pub fn create_sheet_identifier(base_name: &str, n_idx: usize) -> String {
    let c_suffix = format!("__{n_idx}");
    let n_len_base_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_suffix.len());

    let c_base: String = base_name.chars().take(usize::max(1, n_len_base_max)).collect();
    format!("{c_base}{c_suffix}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region IndexCasting

pub fn cast_row_num(value: usize) -> Result<u32, TimesheetError> {
    u32::try_from(value)
        .map_err(|_| TimesheetError::IndexOverflow(format!("row index overflow: {value}")))
}

pub fn cast_col_num(value: usize) -> Result<u16, TimesheetError> {
    u16::try_from(value)
        .map_err(|_| TimesheetError::IndexOverflow(format!("column index overflow: {value}")))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
