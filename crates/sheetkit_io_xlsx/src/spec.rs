//! XLSX sink options and per-sheet report models.

/// Source rows used for autofit width inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumAutofitColumnsRule {
    /// Disable autofit.
    None,
    /// Infer width from header cells only (default).
    #[default]
    Header,
    /// Infer width from body cells only.
    Body,
    /// Infer width from both header and body cells.
    All,
}

/// Autofit policy applied when the workbook is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    /// Autofit width inference rule.
    pub rule_columns: EnumAutofitColumnsRule,
    /// Max body rows inspected when body-based inference is active.
    pub height_body_inferred_max: Option<usize>,
    /// Minimum final width.
    pub width_cell_min: usize,
    /// Maximum final width.
    pub width_cell_max: usize,
    /// Width padding added after inference.
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            rule_columns: EnumAutofitColumnsRule::Header,
            height_body_inferred_max: Some(20_000),
            width_cell_min: 8,
            width_cell_max: 60,
            width_cell_padding: 2,
        }
    }
}

impl SpecAutofitCellsPolicy {
    /// Clamp a recorded width into the policy's bounds.
    pub fn derive_final_width(&self, n_width_recorded: usize) -> usize {
        let n_min = usize::max(1, self.width_cell_min);
        let n_max = usize::min(
            crate::conf::N_WIDTH_EXCEL_MAX,
            usize::max(n_min, self.width_cell_max),
        );
        usize::min(
            n_max,
            usize::max(n_min, n_width_recorded + self.width_cell_padding),
        )
    }
}

/// Workbook-wide options of [`crate::writer::XlsxWorkbook`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxWorkbookOptions {
    /// Column autofit policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
    /// Freeze the first (header) row of every sheet.
    pub if_freeze_header: bool,
}

impl Default for SpecXlsxWorkbookOptions {
    fn default() -> Self {
        Self {
            policy_autofit: SpecAutofitCellsPolicy::default(),
            if_freeze_header: true,
        }
    }
}

/// Written sheet summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxSheetReport {
    /// Final sheet name.
    pub sheet_name: String,
    /// Rows written, header included.
    pub n_rows: usize,
    /// Widest row written.
    pub n_cols: usize,
}
