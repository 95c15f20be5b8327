//! Data source capabilities consumed by the sheet builder.

use std::collections::BTreeMap;

use crate::path::resolve_path;
use crate::record::{EnumRecordValue, RecordAccess};
use crate::spec::ExportError;

/// Criteria passed through to a store query, keyed by column path.
pub type SpecRecordFilters = BTreeMap<String, EnumRecordValue>;

/// Record callback used by [`RecordSource::for_each_record`].
pub type FnRecord<'f, R> = dyn FnMut(&R) -> Result<(), ExportError> + 'f;
/// Batch callback used by [`RecordSource::for_each_batch`].
pub type FnBatch<'f, R> = dyn FnMut(&[R]) -> Result<(), ExportError> + 'f;

/// A (possibly query-scoped) collection of records.
pub trait RecordSource {
    /// Record type yielded by the source.
    type Record: RecordAccess;

    /// Emptiness as seen by the export.
    ///
    /// Adapters over grouped queries should drop grouping that does not change
    /// membership before counting, so the check is not falsely empty.
    fn is_empty(&self) -> Result<bool, ExportError>;

    /// Visit every record in order.
    fn for_each_record(&self, f: &mut FnRecord<'_, Self::Record>) -> Result<(), ExportError>;

    /// Whether [`RecordSource::for_each_batch`] is backed by cursor iteration.
    fn has_batches(&self) -> bool {
        false
    }

    /// Visit records in bounded batches of at most `size_batch`.
    ///
    /// The default delivers one record per batch through `for_each_record`.
    fn for_each_batch(
        &self,
        size_batch: usize,
        f: &mut FnBatch<'_, Self::Record>,
    ) -> Result<(), ExportError> {
        let _ = size_batch;
        self.for_each_record(&mut |record| f(std::slice::from_ref(record)))
    }

    /// Natural column list of the records, if the source can describe it.
    fn describe_columns(&self) -> Option<Vec<String>> {
        None
    }
}

/// Query layer that turns filter criteria into a record source.
pub trait RecordStore {
    /// Record type yielded by queries.
    type Record: RecordAccess;

    /// Records matching `filters`.
    fn select(
        &self,
        filters: &SpecRecordFilters,
    ) -> Result<Box<dyn RecordSource<Record = Self::Record> + '_>, ExportError>;

    /// Natural column list of the stored records, if available.
    fn describe_columns(&self) -> Option<Vec<String>> {
        None
    }
}

/// Where an export reads its records from.
pub enum EnumExportData<'a, R> {
    /// Query the store with the call's filters.
    Store(&'a dyn RecordStore<Record = R>),
    /// Directly supplied collection; filters are not applied.
    Data(&'a dyn RecordSource<Record = R>),
}

impl<R: RecordAccess> RecordSource for Vec<R> {
    type Record = R;

    fn is_empty(&self) -> Result<bool, ExportError> {
        Ok(self.as_slice().is_empty())
    }

    fn for_each_record(&self, f: &mut FnRecord<'_, R>) -> Result<(), ExportError> {
        self.iter().try_for_each(f)
    }
}

impl<R: RecordAccess + Clone> RecordStore for Vec<R> {
    type Record = R;

    /// Equality match of every filter path against each record.
    fn select(
        &self,
        filters: &SpecRecordFilters,
    ) -> Result<Box<dyn RecordSource<Record = R> + '_>, ExportError> {
        let l_matched: Vec<R> = self
            .iter()
            .filter(|record| {
                filters
                    .iter()
                    .all(|(c_path, value)| resolve_path(*record, c_path) == *value)
            })
            .cloned()
            .collect();
        Ok(Box::new(l_matched))
    }
}

/// Eagerly collect every record of `source`.
pub fn collect_records<S>(source: &S) -> Result<Vec<S::Record>, ExportError>
where
    S: RecordSource + ?Sized,
    S::Record: Clone,
{
    let mut l_records = Vec::new();
    source.for_each_record(&mut |record| {
        l_records.push(record.clone());
        Ok(())
    })?;
    Ok(l_records)
}
