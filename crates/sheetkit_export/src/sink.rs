//! Workbook sink capability and an in-memory implementation.

use crate::spec::{
    EnumCellValue, EnumColumnType, EnumRowStyle, ExportError, SpecCellFormat, SpecSheetHandle,
};

/// Spreadsheet workbook receiving exported sheets.
pub trait WorkbookSink {
    /// Reusable style handle minted by the sink.
    type Style: Clone;

    /// Mint a style handle from a style description.
    fn add_style(&mut self, fmt: &SpecCellFormat) -> Result<Self::Style, ExportError>;

    /// Create a new sheet; the sink may adjust the name.
    fn add_sheet(&mut self, name: &str) -> Result<SpecSheetHandle, ExportError>;

    /// Append one row to `sheet_idx`.
    ///
    /// `types` carries per-column hints for the sink's own cell formatting and
    /// may be empty (header rows).
    fn append_row(
        &mut self,
        sheet_idx: usize,
        cells: &[EnumCellValue],
        style: Option<&EnumRowStyle<Self::Style>>,
        types: &[EnumColumnType],
    ) -> Result<(), ExportError>;
}

/// Row captured by [`MemoryWorkbook`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpecMemoryRow {
    /// Cell values in column order.
    pub cells: Vec<EnumCellValue>,
    /// Style handles (indices into [`MemoryWorkbook::styles`]).
    pub style: Option<EnumRowStyle<usize>>,
    /// Type hints passed with the row.
    pub types: Vec<EnumColumnType>,
}

/// Sheet captured by [`MemoryWorkbook`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecMemorySheet {
    /// Sheet name.
    pub name: String,
    /// Appended rows, header first.
    pub rows: Vec<SpecMemoryRow>,
}

/// Sink that keeps sheets, rows and styles in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    /// Sheets in creation order.
    pub sheets: Vec<SpecMemorySheet>,
    /// Minted styles; a handle is the index into this list.
    pub styles: Vec<SpecCellFormat>,
}

impl MemoryWorkbook {
    /// Empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&SpecMemorySheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

impl WorkbookSink for MemoryWorkbook {
    type Style = usize;

    fn add_style(&mut self, fmt: &SpecCellFormat) -> Result<usize, ExportError> {
        self.styles.push(fmt.clone());
        Ok(self.styles.len() - 1)
    }

    fn add_sheet(&mut self, name: &str) -> Result<SpecSheetHandle, ExportError> {
        self.sheets.push(SpecMemorySheet {
            name: name.to_string(),
            rows: Vec::new(),
        });
        Ok(SpecSheetHandle {
            idx: self.sheets.len() - 1,
            name: name.to_string(),
        })
    }

    fn append_row(
        &mut self,
        sheet_idx: usize,
        cells: &[EnumCellValue],
        style: Option<&EnumRowStyle<usize>>,
        types: &[EnumColumnType],
    ) -> Result<(), ExportError> {
        let sheet = self
            .sheets
            .get_mut(sheet_idx)
            .ok_or_else(|| ExportError::Sink(format!("Sheet index out of range: {sheet_idx}")))?;
        sheet.rows.push(SpecMemoryRow {
            cells: cells.to_vec(),
            style: style.cloned(),
            types: types.to_vec(),
        });
        Ok(())
    }
}
