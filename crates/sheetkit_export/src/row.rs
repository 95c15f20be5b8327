//! One record in, one row of cell values out.

use crate::coerce::coerce_value;
use crate::i18n::Translate;
use crate::path::resolve_path;
use crate::record::RecordAccess;
use crate::spec::{EnumCellValue, SpecExportConfig};

/// Build the cells of one data row in column order.
///
/// Every row has exactly one cell per configured column; unresolvable paths
/// become blank cells.
pub fn emit_row<R>(
    record: &R,
    config: &SpecExportConfig,
    translator: &dyn Translate,
) -> Vec<EnumCellValue>
where
    R: RecordAccess + ?Sized,
{
    config
        .columns
        .iter()
        .enumerate()
        .map(|(n_idx_col, col)| {
            let value_raw = resolve_path(record, &col.path);
            let value = coerce_value(
                value_raw,
                col.rule_type,
                config.set_cols_idx_boolean.contains(&n_idx_col),
                config.namespace.as_deref(),
                translator,
            );
            EnumCellValue::from(value)
        })
        .collect()
}
