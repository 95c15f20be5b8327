//! Exportable record types and the per-type defaults registry.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::builder::export_sheet;
use crate::i18n::Translate;
use crate::label::derive_snake_case;
use crate::record::{EnumRecordValue, RecordAccess};
use crate::sink::WorkbookSink;
use crate::source::EnumExportData;
use crate::spec::{ExportError, ExportOutcome, SpecExportDefaults, SpecExportOptions};

/// A record type that can be exported to a sheet.
pub trait ExportRecord: RecordAccess + Clone {
    /// Stable type identity, used as registry key and label scope.
    fn type_key() -> &'static str;

    /// Table name used for the default sheet name.
    fn table_name() -> String {
        derive_snake_case(Self::type_key())
    }

    /// Natural column list of the type, if it can be discovered.
    ///
    /// `None` means discovery is not possible yet (for example the backing
    /// store is not ready); it is retried on first export.
    fn natural_columns() -> Option<Vec<String>> {
        None
    }
}

/// Dynamic records (for example parsed JSON documents).
impl ExportRecord for EnumRecordValue {
    fn type_key() -> &'static str {
        "record"
    }
}

static REGISTRY_GLOBAL: OnceLock<ExportRegistry> = OnceLock::new();

/// Registered export defaults, keyed by [`ExportRecord::type_key`].
#[derive(Debug, Default)]
pub struct ExportRegistry {
    dict_defaults: RwLock<BTreeMap<&'static str, Arc<SpecExportDefaults>>>,
}

impl ExportRegistry {
    /// Empty registry, independent of [`Self::global`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry.
    pub fn global() -> &'static ExportRegistry {
        REGISTRY_GLOBAL.get_or_init(ExportRegistry::new)
    }

    /// Register `T` with `defaults`. The first registration of a type wins.
    ///
    /// Missing default columns are discovered from [`ExportRecord::natural_columns`].
    pub fn register<T: ExportRecord>(
        &self,
        defaults: SpecExportDefaults,
    ) -> Arc<SpecExportDefaults> {
        let mut dict_defaults = self
            .dict_defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = dict_defaults.get(T::type_key()) {
            debug!(type_key = T::type_key(), "already registered, keeping first defaults");
            return Arc::clone(existing);
        }

        let columns = defaults.columns.or_else(|| {
            let columns = T::natural_columns();
            if columns.is_none() {
                warn!(
                    type_key = T::type_key(),
                    "column discovery unavailable, default columns left unset"
                );
            }
            columns
        });
        let defaults = Arc::new(SpecExportDefaults {
            columns,
            i18n: defaults.i18n,
        });
        dict_defaults.insert(T::type_key(), Arc::clone(&defaults));
        debug!(type_key = T::type_key(), "registered export defaults");
        defaults
    }

    /// Whether `T` has been registered.
    pub fn is_registered<T: ExportRecord>(&self) -> bool {
        self.dict_defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(T::type_key())
    }

    /// Registered defaults of `T`.
    pub fn defaults<T: ExportRecord>(&self) -> Option<Arc<SpecExportDefaults>> {
        self.dict_defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(T::type_key())
            .cloned()
    }

    /// Registered defaults of `T`, retrying column discovery once if it was
    /// unavailable at registration time.
    fn resolve_defaults<T: ExportRecord>(&self) -> Result<Arc<SpecExportDefaults>, ExportError> {
        let defaults = self
            .defaults::<T>()
            .ok_or_else(|| ExportError::NotRegistered {
                type_key: T::type_key().to_string(),
            })?;
        if defaults.columns.is_some() {
            return Ok(defaults);
        }
        let Some(columns) = T::natural_columns() else {
            return Ok(defaults);
        };

        let mut dict_defaults = self
            .dict_defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = dict_defaults
            .entry(T::type_key())
            .or_insert_with(|| Arc::clone(&defaults));
        if entry.columns.is_none() {
            *entry = Arc::new(SpecExportDefaults {
                columns: Some(columns),
                i18n: entry.i18n.clone(),
            });
            debug!(type_key = T::type_key(), "discovered default columns on first use");
        }
        Ok(Arc::clone(entry))
    }

    /// Export a registered type into a new sheet of `sink`.
    pub fn export<T, W>(
        &self,
        sink: &mut W,
        data: EnumExportData<'_, T>,
        options: &SpecExportOptions,
        translator: &dyn Translate,
    ) -> Result<ExportOutcome, ExportError>
    where
        T: ExportRecord,
        W: WorkbookSink + ?Sized,
    {
        let defaults = self.resolve_defaults::<T>()?;
        export_sheet(sink, data, options, Some(&defaults), translator)
    }
}
