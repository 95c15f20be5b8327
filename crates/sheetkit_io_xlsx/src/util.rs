//! Stateless helper utilities used by the XLSX sink.

use std::collections::BTreeSet;

use sheetkit_export::{EnumCellValue, EnumColumnType};

use crate::conf::{
    C_SHEET_NAME_FALLBACK, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    N_WIDTH_DATE, N_WIDTH_DATETIME, TUP_EXCEL_ILLEGAL,
};

////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    let c_name = c_name.trim().trim_matches('\'');
    if c_name.is_empty() {
        return C_SHEET_NAME_FALLBACK.to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// First of `name`, `name__2`, `name__3`, ... not present in `existing`.
///
/// Excel compares sheet names case-insensitively; so does this.
pub fn derive_unique_sheet_name(existing: &BTreeSet<String>, name: &str) -> String {
    let is_taken = |candidate: &str| existing.contains(&candidate.to_lowercase());
    if !is_taken(name) {
        return name.to_string();
    }

    let mut n_idx = 2usize;
    loop {
        let c_suffix = format!("__{n_idx}");
        let n_len_base = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_suffix.chars().count());
        let base_name: String = name.chars().take(n_len_base).collect();
        let candidate = format!("{base_name}{c_suffix}");
        if !is_taken(&candidate) {
            return candidate;
        }
        n_idx += 1;
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Limits

/// Check that a row of `width` cells fits at zero-based row `row_idx`.
pub fn validate_row_position(row_idx: usize, width: usize) -> Result<(), String> {
    if row_idx >= N_NROWS_EXCEL_MAX {
        return Err(format!(
            "Excel row limit exceeded: row {} > {N_NROWS_EXCEL_MAX}.",
            row_idx + 1
        ));
    }
    if width > N_NCOLS_EXCEL_MAX {
        return Err(format!(
            "Excel column limit exceeded: {width} columns > {N_NCOLS_EXCEL_MAX}."
        ));
    }
    Ok(())
}

/// Zero-based row index as a `rust_xlsxwriter` row number.
pub fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

/// Zero-based column index as a `rust_xlsxwriter` column number.
pub fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellText

/// Text for a number written into a `String` column; integral values drop `.0`.
pub fn convert_number_to_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Estimate displayed width units for one cell value.
///
/// Used by autofit inference logic.
pub fn estimate_width_len(value: &EnumCellValue, rule_type: EnumColumnType) -> usize {
    match value {
        EnumCellValue::None => 0,
        EnumCellValue::String(s) => estimate_unicode_string_width(s),
        EnumCellValue::Integer(n) => n.to_string().len(),
        EnumCellValue::Number(n) => convert_number_to_text(*n).len(),
        EnumCellValue::Boolean(val) => {
            if *val {
                4
            } else {
                5
            }
        }
        EnumCellValue::Date(_) if rule_type == EnumColumnType::Time => N_WIDTH_DATETIME,
        EnumCellValue::Date(_) => N_WIDTH_DATE,
        EnumCellValue::DateTime(_) if rule_type == EnumColumnType::Date => N_WIDTH_DATE,
        EnumCellValue::DateTime(_) => N_WIDTH_DATETIME,
    }
}

/// Width of `s` with non-ASCII characters counted wider.
pub fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
