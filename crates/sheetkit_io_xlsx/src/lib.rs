//! `sheetkit_io_xlsx` v1:
//! XLSX workbook sink and Polars record source for `sheetkit_export`.
//!
//! Modules:
//! - `conf`   : Excel limits and default presets
//! - `spec`   : sink options and reports
//! - `util`   : pure helper functions
//! - `writer` : `rust_xlsxwriter`-backed workbook sink
//! - `frame`  : `DataFrame` record source
pub mod conf;
pub mod frame;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
    derive_default_xlsx_workbook_options,
};
pub use frame::{DataFrameRow, DataFrameSource};
pub use spec::{
    EnumAutofitColumnsRule, SpecAutofitCellsPolicy, SpecXlsxSheetReport, SpecXlsxWorkbookOptions,
};
pub use util::{derive_unique_sheet_name, sanitize_sheet_name};
pub use writer::{SpecXlsxStyle, XlsxWorkbook};
