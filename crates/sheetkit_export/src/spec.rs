//! Shared export specification models, options and errors.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::record::EnumRecordValue;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Style description handed to the sink when minting a style handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color.
    pub bg_color: Option<String>,
    /// Font color.
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            text_wrap: other.text_wrap.or(self.text_wrap),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }
}

/// Style applied to one appended row.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumRowStyle<S> {
    /// Same style for every cell of the row.
    Uniform(S),
    /// One style per column, aligned with the column list.
    PerColumn(Vec<S>),
}

impl<S> EnumRowStyle<S> {
    /// Style for the cell at `col_idx`, if any.
    pub fn get(&self, col_idx: usize) -> Option<&S> {
        match self {
            Self::Uniform(style) => Some(style),
            Self::PerColumn(l_styles) => l_styles.get(col_idx),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValues

/// Cell-ready value produced by the row pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Whole number, kept exact.
    Integer(i64),
    /// Numeric value.
    Number(f64),
    /// Native boolean value.
    Boolean(bool),
    /// Calendar date without time-of-day.
    Date(NaiveDate),
    /// Date with time-of-day.
    DateTime(NaiveDateTime),
}

impl From<EnumRecordValue> for EnumCellValue {
    fn from(value: EnumRecordValue) -> Self {
        match value {
            EnumRecordValue::Null => Self::None,
            EnumRecordValue::Boolean(val) => Self::Boolean(val),
            EnumRecordValue::Integer(val) => Self::Integer(val),
            EnumRecordValue::Number(val) => Self::Number(val),
            EnumRecordValue::String(val) => Self::String(val),
            EnumRecordValue::Date(val) => Self::Date(val),
            EnumRecordValue::DateTime(val) => Self::DateTime(val),
            EnumRecordValue::Map(_) | EnumRecordValue::List(_) | EnumRecordValue::Object(_) => {
                Self::None
            }
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnSpecification

/// Declared semantic type of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumColumnType {
    /// Rendered as a localized yes/no string.
    Boolean,
    /// Date-only value.
    Date,
    /// Date with time-of-day.
    Time,
    /// Free text.
    String,
    /// No declared type.
    #[default]
    None,
}

/// Column types as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumColumnTypes {
    /// One type applied to every column.
    Uniform(EnumColumnType),
    /// Types aligned positionally with the column list.
    PerColumn(Vec<EnumColumnType>),
}

/// Structured per-column descriptor built during configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecColumn {
    /// Dotted attribute path (`\.` escapes a literal dot).
    pub path: String,
    /// Effective type after boolean rewriting.
    pub rule_type: EnumColumnType,
    /// Explicit header label.
    pub label: Option<String>,
    /// Per-column data format merged over the type default.
    pub fmt: Option<SpecCellFormat>,
}

impl SpecColumn {
    /// Untyped, unlabeled column for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            rule_type: EnumColumnType::None,
            label: None,
            fmt: None,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ExportOptions

/// Localization setting for one record type or export call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EnumI18n {
    /// No catalog lookups.
    #[default]
    Disabled,
    /// Use the conventional attribute-label namespace.
    Conventional,
    /// Use the given namespace.
    Namespace(String),
}

/// Defaults attached to a record type at registration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecExportDefaults {
    /// Default column list; `None` until discovered or supplied.
    pub columns: Option<Vec<String>>,
    /// Default localization setting.
    pub i18n: EnumI18n,
}

/// Per-call export options. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct SpecExportOptions {
    /// Column list override.
    pub columns: Option<Vec<String>>,
    /// Column type override.
    pub types: Option<EnumColumnTypes>,
    /// Explicit header labels by column path.
    pub labels: BTreeMap<String, String>,
    /// Per-column data formats by column path.
    pub formats: BTreeMap<String, SpecCellFormat>,
    /// Uniform data-row style.
    pub style: Option<SpecCellFormat>,
    /// Header style; defaults to `style`.
    pub header_style: Option<SpecCellFormat>,
    /// Localization override.
    pub i18n: Option<EnumI18n>,
    /// Sheet name override.
    pub name: Option<String>,
    /// Materialize the dataset before checking and iterating it.
    pub if_as_array: bool,
    /// Batch size for cursor iteration; defaults to `N_SIZE_BATCH_DEFAULT`.
    pub size_batch: Option<usize>,
    /// Remaining criteria passed to the data store query.
    pub filters: BTreeMap<String, EnumRecordValue>,
}

/// Resolved configuration for one export call.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecExportConfig {
    /// Snake-case record type key used in label lookups.
    pub type_key: String,
    /// Requested sheet name.
    pub sheet_name: String,
    /// Ordered column descriptors.
    pub columns: Vec<SpecColumn>,
    /// Active i18n namespace.
    pub namespace: Option<String>,
    /// Indices of columns declared boolean (now typed `String`).
    pub set_cols_idx_boolean: BTreeSet<usize>,
    /// Data-row format plan.
    pub fmt_row: EnumRowStyle<SpecCellFormat>,
    /// Header-row format, if any.
    pub fmt_header: Option<SpecCellFormat>,
    /// Records per batch for cursor iteration.
    pub size_batch: usize,
}

impl SpecExportConfig {
    /// Effective type hints in column order.
    pub fn column_types(&self) -> Vec<EnumColumnType> {
        self.columns.iter().map(|col| col.rule_type).collect()
    }

    /// Number of output columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportAndErrors

/// Sheet created by a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetHandle {
    /// Zero-based sheet index within the workbook.
    pub idx: usize,
    /// Final sheet name (after sink-side sanitizing).
    pub name: String,
}

/// Result of one export call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Dataset was empty; the sink was not touched.
    Skipped,
    /// Header and rows were appended to a new sheet.
    Written {
        /// Sheet that received the rows.
        sheet: SpecSheetHandle,
        /// Number of data rows (header excluded).
        n_rows: usize,
    },
}

/// Errors surfaced by an export call.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No column list could be resolved.
    #[error("No columns configured for `{type_key}`: pass `columns` or register defaults.")]
    NoColumns {
        /// Record type key.
        type_key: String,
    },
    /// Per-column types outnumber the columns.
    #[error("`types` has {n_types} entries but only {n_columns} columns are configured.")]
    TypesLengthMismatch {
        /// Number of declared types.
        n_types: usize,
        /// Number of configured columns.
        n_columns: usize,
    },
    /// Export requested for a type that was never registered.
    #[error("Record type `{type_key}` is not registered for export.")]
    NotRegistered {
        /// Record type key.
        type_key: String,
    },
    /// Sink adapter failure.
    #[error("sink error: {0}")]
    Sink(String),
    /// Data source adapter failure.
    #[error("data source error: {0}")]
    Source(String),
    /// Localization catalog could not be loaded.
    #[error("i18n catalog error: {0}")]
    Catalog(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
