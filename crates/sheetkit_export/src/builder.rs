//! Sheet builder: configuration merge, empty short-circuit, header and rows.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::conf::N_SIZE_BATCH_DEFAULT;
use crate::i18n::Translate;
use crate::label::{derive_snake_case, resolve_label, resolve_namespace, resolve_sheet_name};
use crate::registry::ExportRecord;
use crate::row::emit_row;
use crate::sink::WorkbookSink;
use crate::source::{EnumExportData, RecordSource, collect_records};
use crate::spec::{
    EnumCellValue, EnumColumnType, EnumColumnTypes, EnumRowStyle, ExportError, ExportOutcome,
    SpecColumn, SpecExportConfig, SpecExportDefaults, SpecExportOptions,
};
use crate::style::{mint_row_styles, plan_header_format, plan_row_formats};

////////////////////////////////////////////////////////////////////////////////
// #region Configuring

/// Expand declared types to one entry per column.
///
/// Missing trailing entries default to `None`; more types than columns is an error.
pub fn normalize_column_types(
    types: Option<&EnumColumnTypes>,
    n_columns: usize,
) -> Result<Vec<EnumColumnType>, ExportError> {
    match types {
        None => Ok(vec![EnumColumnType::None; n_columns]),
        Some(EnumColumnTypes::Uniform(rule_type)) => Ok(vec![*rule_type; n_columns]),
        Some(EnumColumnTypes::PerColumn(l_types)) => {
            if l_types.len() > n_columns {
                return Err(ExportError::TypesLengthMismatch {
                    n_types: l_types.len(),
                    n_columns,
                });
            }
            let mut l_types_full = l_types.clone();
            l_types_full.resize(n_columns, EnumColumnType::None);
            Ok(l_types_full)
        }
    }
}

/// Merge call options over registered defaults into a resolved configuration.
///
/// Columns come from the call, then the registered defaults, then the data
/// source description. Boolean columns are rewritten to `String` and their
/// indices recorded.
pub fn resolve_export_config<T>(
    defaults: Option<&SpecExportDefaults>,
    options: &SpecExportOptions,
    columns_described: Option<Vec<String>>,
    translator: &dyn Translate,
) -> Result<SpecExportConfig, ExportError>
where
    T: ExportRecord,
{
    let type_key = derive_snake_case(T::type_key());

    let l_paths = options
        .columns
        .clone()
        .or_else(|| defaults.and_then(|spec| spec.columns.clone()))
        .or(columns_described)
        .filter(|l_paths| !l_paths.is_empty())
        .ok_or_else(|| ExportError::NoColumns {
            type_key: type_key.clone(),
        })?;
    let l_types = normalize_column_types(options.types.as_ref(), l_paths.len())?;

    let i18n = options
        .i18n
        .clone()
        .or_else(|| defaults.map(|spec| spec.i18n.clone()))
        .unwrap_or_default();
    let namespace = resolve_namespace(&i18n);

    let mut set_cols_idx_boolean = BTreeSet::new();
    let columns: Vec<SpecColumn> = l_paths
        .into_iter()
        .zip(l_types)
        .enumerate()
        .map(|(n_idx_col, (path, rule_type))| {
            let rule_type = if rule_type == EnumColumnType::Boolean {
                set_cols_idx_boolean.insert(n_idx_col);
                EnumColumnType::String
            } else {
                rule_type
            };
            SpecColumn {
                label: options.labels.get(&path).cloned(),
                fmt: options.formats.get(&path).cloned(),
                path,
                rule_type,
            }
        })
        .collect();

    let sheet_name = options.name.clone().unwrap_or_else(|| {
        resolve_sheet_name(&T::table_name(), namespace.as_deref(), translator)
    });

    let fmt_row = plan_row_formats(&columns, options.style.as_ref());
    let fmt_header = plan_header_format(options.header_style.as_ref(), options.style.as_ref());

    debug!(
        type_key = %type_key,
        n_columns = columns.len(),
        n_boolean = set_cols_idx_boolean.len(),
        namespace = ?namespace,
        sheet_name = %sheet_name,
        "resolved export configuration"
    );

    Ok(SpecExportConfig {
        type_key,
        sheet_name,
        columns,
        namespace,
        set_cols_idx_boolean,
        fmt_row,
        fmt_header,
        size_batch: options
            .size_batch
            .filter(|n_size| *n_size > 0)
            .unwrap_or(N_SIZE_BATCH_DEFAULT),
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Emission

/// Header cells for a resolved configuration.
pub fn derive_header_cells(
    config: &SpecExportConfig,
    translator: &dyn Translate,
) -> Vec<EnumCellValue> {
    config
        .columns
        .iter()
        .map(|col| {
            EnumCellValue::String(resolve_label(
                &col.path,
                col.label.as_deref(),
                config.namespace.as_deref(),
                &config.type_key,
                translator,
            ))
        })
        .collect()
}

/// Export records of type `T` into a new sheet of `sink`.
///
/// Returns [`ExportOutcome::Skipped`] without touching the sink when the
/// dataset is empty. Otherwise one header row plus one row per record is
/// appended. Records are visited in batches when the source supports it.
pub fn export_sheet<T, W>(
    sink: &mut W,
    data: EnumExportData<'_, T>,
    options: &SpecExportOptions,
    defaults: Option<&SpecExportDefaults>,
    translator: &dyn Translate,
) -> Result<ExportOutcome, ExportError>
where
    T: ExportRecord,
    W: WorkbookSink + ?Sized,
{
    let source_queried: Box<dyn RecordSource<Record = T> + '_>;
    let (source, columns_described): (&dyn RecordSource<Record = T>, Option<Vec<String>>) =
        match data {
            EnumExportData::Data(source) => {
                if !options.filters.is_empty() {
                    warn!(
                        n_filters = options.filters.len(),
                        "filters ignored for directly supplied data"
                    );
                }
                (source, source.describe_columns())
            }
            EnumExportData::Store(store) => {
                source_queried = store.select(&options.filters)?;
                let columns_described = store
                    .describe_columns()
                    .or_else(|| source_queried.describe_columns());
                (source_queried.as_ref(), columns_described)
            }
        };

    let config = resolve_export_config::<T>(defaults, options, columns_described, translator)?;

    let l_records_materialized: Vec<T>;
    let source: &dyn RecordSource<Record = T> = if options.if_as_array {
        l_records_materialized = collect_records(source)?;
        debug!(
            n_records = l_records_materialized.len(),
            "materialized dataset"
        );
        &l_records_materialized
    } else {
        source
    };

    if source.is_empty()? {
        debug!(sheet_name = %config.sheet_name, "empty dataset, sheet skipped");
        return Ok(ExportOutcome::Skipped);
    }

    let style_row = mint_row_styles(sink, &config.fmt_row)?;
    let style_header = match &config.fmt_header {
        Some(fmt) => Some(EnumRowStyle::Uniform(sink.add_style(fmt)?)),
        None => None,
    };

    let sheet = sink.add_sheet(&config.sheet_name)?;
    let l_header = derive_header_cells(&config, translator);
    sink.append_row(sheet.idx, &l_header, style_header.as_ref(), &[])?;

    let l_types = config.column_types();
    let mut n_rows = 0usize;
    let mut write_record = |record: &T| -> Result<(), ExportError> {
        let l_cells = emit_row(record, &config, translator);
        sink.append_row(sheet.idx, &l_cells, Some(&style_row), &l_types)?;
        n_rows += 1;
        Ok(())
    };

    if source.has_batches() {
        source.for_each_batch(config.size_batch, &mut |l_batch| {
            debug!(n_records = l_batch.len(), "writing batch");
            l_batch.iter().try_for_each(&mut write_record)
        })?;
    } else {
        source.for_each_record(&mut write_record)?;
    }

    info!(sheet_name = %sheet.name, n_rows, "exported sheet");
    Ok(ExportOutcome::Written { sheet, n_rows })
}

/// Export into a freshly created sink and hand it back to the caller.
pub fn export_sheet_new<T, W>(
    data: EnumExportData<'_, T>,
    options: &SpecExportOptions,
    defaults: Option<&SpecExportDefaults>,
    translator: &dyn Translate,
) -> Result<(W, ExportOutcome), ExportError>
where
    T: ExportRecord,
    W: WorkbookSink + Default,
{
    let mut sink = W::default();
    let outcome = export_sheet(&mut sink, data, options, defaults, translator)?;
    Ok((sink, outcome))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
