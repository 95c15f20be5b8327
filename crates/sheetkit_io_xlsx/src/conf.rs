//! XLSX constants and default preset factories.

use crate::spec::SpecXlsxWorkbookOptions;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Replacement for illegal sheet-name characters.
pub const C_SHEET_NAME_REPLACEMENT: &str = "_";
/// Sheet name used when sanitizing leaves nothing.
pub const C_SHEET_NAME_FALLBACK: &str = "Sheet";

/// Upper bound Excel accepts for a column width.
pub const N_WIDTH_EXCEL_MAX: usize = 255;
/// Display width of a rendered date cell.
pub const N_WIDTH_DATE: usize = 10;
/// Display width of a rendered date-time cell.
pub const N_WIDTH_DATETIME: usize = 19;

/// Build default workbook options.
pub fn derive_default_xlsx_workbook_options() -> SpecXlsxWorkbookOptions {
    SpecXlsxWorkbookOptions::default()
}
