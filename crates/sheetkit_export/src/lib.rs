//! `sheetkit_export` v1:
//! Record-to-spreadsheet export kernel.
//!
//! Modules:
//! - `conf`     : constants and default presets
//! - `spec`     : options, resolved configuration, cell model and errors
//! - `record`   : record access capability and dynamic record values
//! - `path`     : dotted attribute path resolution
//! - `i18n`     : translation capability and JSON message catalogs
//! - `label`    : inflections, header labels and sheet names
//! - `coerce`   : boolean and date value coercion
//! - `source`   : record source/store capabilities
//! - `sink`     : workbook sink capability and in-memory sink
//! - `style`    : default format selection and style minting
//! - `row`      : row emission
//! - `builder`  : sheet builder
//! - `registry` : exportable types and per-type defaults
pub mod builder;
pub mod coerce;
pub mod conf;
pub mod i18n;
pub mod label;
pub mod path;
pub mod record;
pub mod registry;
pub mod row;
pub mod sink;
pub mod source;
pub mod spec;
pub mod style;

pub use builder::{export_sheet, export_sheet_new, resolve_export_config};
pub use conf::{C_I18N_NAMESPACE_CONVENTIONAL, N_SIZE_BATCH_DEFAULT};
pub use i18n::{NoTranslate, SpecI18nCatalog, Translate};
pub use label::{humanize, titleize};
pub use path::resolve_path;
pub use record::{EnumRecordValue, RecordAccess};
pub use registry::{ExportRecord, ExportRegistry};
pub use row::emit_row;
pub use sink::{MemoryWorkbook, SpecMemoryRow, SpecMemorySheet, WorkbookSink};
pub use source::{
    EnumExportData, FnBatch, FnRecord, RecordSource, RecordStore, SpecRecordFilters,
    collect_records,
};
pub use spec::{
    EnumCellValue, EnumColumnType, EnumColumnTypes, EnumI18n, EnumRowStyle, ExportError,
    ExportOutcome, SpecCellFormat, SpecColumn, SpecExportConfig, SpecExportDefaults,
    SpecExportOptions, SpecSheetHandle,
};
