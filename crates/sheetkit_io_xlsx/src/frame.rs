//! Polars `DataFrame` as an exportable record source.

use std::collections::BTreeMap;
use std::io::Cursor;

use polars::prelude::{AnyValue, DataFrame, IpcReader, SerReader};
use sheetkit_export::{
    EnumRecordValue, ExportError, ExportRecord, FnBatch, FnRecord, RecordAccess, RecordSource,
    N_SIZE_BATCH_DEFAULT,
};
use tracing::debug;

/// One `DataFrame` row; values are read by column name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataFrameRow {
    dict_values: BTreeMap<String, EnumRecordValue>,
}

impl DataFrameRow {
    /// Value of `column` in this row.
    pub fn get(&self, column: &str) -> Option<&EnumRecordValue> {
        self.dict_values.get(column)
    }
}

impl RecordAccess for DataFrameRow {
    fn read_member(&self, _name: &str) -> Option<EnumRecordValue> {
        None
    }

    fn read_key(&self, key: &str) -> Option<EnumRecordValue> {
        self.dict_values.get(key).cloned()
    }
}

impl ExportRecord for DataFrameRow {
    fn type_key() -> &'static str {
        "row"
    }
}

/// Record source over an in-memory `DataFrame`.
///
/// Batches are produced by slicing, so only one batch of rows is
/// materialized at a time.
#[derive(Debug, Clone)]
pub struct DataFrameSource {
    df: DataFrame,
}

impl DataFrameSource {
    /// Source over all rows of `df`.
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    /// Read a `DataFrame` from Arrow IPC bytes.
    pub fn from_ipc_bytes(v_ipc_df: &[u8]) -> Result<Self, ExportError> {
        let df = IpcReader::new(Cursor::new(v_ipc_df))
            .finish()
            .map_err(|err| {
                ExportError::Source(format!("Failed to read IPC DataFrame bytes: {err}"))
            })?;
        debug!(height = df.height(), width = df.width(), "read IPC DataFrame");
        Ok(Self::new(df))
    }

    /// Underlying frame.
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }
}

impl RecordSource for DataFrameSource {
    type Record = DataFrameRow;

    fn is_empty(&self) -> Result<bool, ExportError> {
        Ok(self.df.height() == 0)
    }

    fn for_each_record(&self, f: &mut FnRecord<'_, DataFrameRow>) -> Result<(), ExportError> {
        self.for_each_batch(N_SIZE_BATCH_DEFAULT, &mut |l_rows| {
            l_rows.iter().try_for_each(&mut *f)
        })
    }

    fn has_batches(&self) -> bool {
        true
    }

    fn for_each_batch(
        &self,
        size_batch: usize,
        f: &mut FnBatch<'_, DataFrameRow>,
    ) -> Result<(), ExportError> {
        let n_size = usize::max(1, size_batch);
        let n_height = self.df.height();
        let mut n_offset = 0usize;
        while n_offset < n_height {
            let df_slice = self.df.slice(n_offset as i64, n_size);
            let l_rows = derive_rows_from_dataframe(&df_slice)?;
            f(&l_rows)?;
            n_offset += n_size;
        }
        Ok(())
    }

    fn describe_columns(&self) -> Option<Vec<String>> {
        Some(
            self.df
                .get_column_names_str()
                .into_iter()
                .map(ToString::to_string)
                .collect(),
        )
    }
}

fn derive_rows_from_dataframe(df: &DataFrame) -> Result<Vec<DataFrameRow>, ExportError> {
    let l_colnames = df.get_column_names_str();
    let l_cols = df.get_columns();

    let mut l_rows = Vec::with_capacity(df.height());
    for n_idx_row in 0..df.height() {
        let mut dict_values = BTreeMap::new();
        for (c_name, col) in l_colnames.iter().zip(l_cols) {
            let value = col
                .get(n_idx_row)
                .map_err(|err| ExportError::Source(format!("Failed to access cell value: {err}")))?;
            dict_values.insert(c_name.to_string(), derive_record_value_from_any_value(value));
        }
        l_rows.push(DataFrameRow { dict_values });
    }
    Ok(l_rows)
}

fn derive_record_value_from_any_value(value: AnyValue<'_>) -> EnumRecordValue {
    match value {
        AnyValue::Null => EnumRecordValue::Null,
        AnyValue::Boolean(val) => EnumRecordValue::Boolean(val),
        AnyValue::String(val) => EnumRecordValue::String(val.to_string()),
        AnyValue::StringOwned(val) => EnumRecordValue::String(val.to_string()),
        AnyValue::UInt8(val) => EnumRecordValue::Integer(val.into()),
        AnyValue::UInt16(val) => EnumRecordValue::Integer(val.into()),
        AnyValue::UInt32(val) => EnumRecordValue::Integer(val.into()),
        AnyValue::UInt64(val) => i64::try_from(val)
            .map(EnumRecordValue::Integer)
            .unwrap_or(EnumRecordValue::Number(val as f64)),
        AnyValue::Int8(val) => EnumRecordValue::Integer(val.into()),
        AnyValue::Int16(val) => EnumRecordValue::Integer(val.into()),
        AnyValue::Int32(val) => EnumRecordValue::Integer(val.into()),
        AnyValue::Int64(val) => EnumRecordValue::Integer(val),
        AnyValue::Float32(val) => EnumRecordValue::Number(val.into()),
        AnyValue::Float64(val) => EnumRecordValue::Number(val),
        _ => EnumRecordValue::String(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IpcWriter, SerWriter, df};

    use super::*;

    fn create_source() -> DataFrameSource {
        let df = df!(
            "id" => &[1i64, 2, 3, 4, 5],
            "name" => &[Some("a"), None, Some("c"), Some("d"), Some("e")],
            "active" => &[true, false, true, true, false],
        )
        .expect("df");
        DataFrameSource::new(df)
    }

    #[test]
    fn test_describe_columns_uses_column_names() {
        assert_eq!(
            create_source().describe_columns(),
            Some(vec!["id".to_string(), "name".to_string(), "active".to_string()])
        );
    }

    #[test]
    fn test_batches_slice_the_frame() {
        let source = create_source();
        let mut l_batch_sizes = Vec::new();
        let mut l_ids = Vec::new();
        source
            .for_each_batch(2, &mut |l_rows| {
                l_batch_sizes.push(l_rows.len());
                l_ids.extend(l_rows.iter().filter_map(|row| row.read_key("id")));
                Ok(())
            })
            .expect("batches");

        assert!(source.has_batches());
        assert_eq!(l_batch_sizes, vec![2, 2, 1]);
        assert_eq!(
            l_ids,
            (1..=5).map(EnumRecordValue::Integer).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_row_values_are_converted() {
        let source = create_source();
        let mut l_rows = Vec::new();
        source
            .for_each_record(&mut |row| {
                l_rows.push(row.clone());
                Ok(())
            })
            .expect("records");

        assert_eq!(l_rows.len(), 5);
        assert_eq!(l_rows[0].get("name"), Some(&EnumRecordValue::from("a")));
        assert_eq!(l_rows[1].get("name"), Some(&EnumRecordValue::Null));
        assert_eq!(l_rows[1].get("active"), Some(&EnumRecordValue::Boolean(false)));
        assert_eq!(l_rows[0].read_member("id"), None);
    }

    #[test]
    fn test_ipc_bytes_round_into_source() {
        let mut df = create_source().dataframe().clone();
        let mut v_ipc = Vec::new();
        IpcWriter::new(&mut v_ipc).finish(&mut df).expect("ipc");

        let source = DataFrameSource::from_ipc_bytes(&v_ipc).expect("source");
        assert_eq!(source.dataframe().height(), 5);
        assert!(!source.is_empty().expect("is_empty"));
    }

    #[test]
    fn test_invalid_ipc_bytes_are_a_source_error() {
        let err = DataFrameSource::from_ipc_bytes(b"not ipc").expect_err("invalid");
        assert!(matches!(err, ExportError::Source(_)));
    }
}
