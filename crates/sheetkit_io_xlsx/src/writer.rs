//! XLSX workbook sink backed by `rust_xlsxwriter`.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use rust_xlsxwriter::{
    ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError,
};
use sheetkit_export::conf::{C_NUM_FORMAT_DATE, C_NUM_FORMAT_DATETIME};
use sheetkit_export::{
    EnumCellValue, EnumColumnType, EnumRowStyle, ExportError, SpecCellFormat, SpecSheetHandle,
    WorkbookSink,
};
use tracing::{debug, info, warn};

use crate::conf::C_SHEET_NAME_REPLACEMENT;
use crate::spec::{EnumAutofitColumnsRule, SpecXlsxSheetReport, SpecXlsxWorkbookOptions};
use crate::util::{
    cast_col_num, cast_row_num, convert_number_to_text, derive_unique_sheet_name,
    estimate_width_len, sanitize_sheet_name, validate_row_position,
};

#[derive(Debug, Default)]
struct SpecSheetState {
    name: String,
    n_row_next: usize,
    n_cols: usize,
    l_width_header: Vec<usize>,
    l_width_body: Vec<usize>,
    n_rows_body_inferred: usize,
}

/// Minted cell style.
///
/// Date cells use the date variants, which carry the default date or
/// datetime number format when the style description sets none.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecXlsxStyle {
    /// Format for non-date cells.
    pub fmt: Format,
    /// Format for date-only cells.
    pub fmt_date: Format,
    /// Format for date-time cells.
    pub fmt_datetime: Format,
}

impl SpecXlsxStyle {
    fn new(spec: &SpecCellFormat) -> Self {
        let fmt = derive_rust_xlsx_format(spec);
        if spec.num_format.is_some() {
            return Self {
                fmt_date: fmt.clone(),
                fmt_datetime: fmt.clone(),
                fmt,
            };
        }
        let derive_with_num_format = |c_num_format: &str| {
            derive_rust_xlsx_format(&spec.with_(SpecCellFormat {
                num_format: Some(c_num_format.to_string()),
                ..Default::default()
            }))
        };
        Self {
            fmt_date: derive_with_num_format(C_NUM_FORMAT_DATE),
            fmt_datetime: derive_with_num_format(C_NUM_FORMAT_DATETIME),
            fmt,
        }
    }
}

/// Stateful workbook sink.
///
/// The workbook is buffered in memory until [`Self::save`] or
/// [`Self::save_to_buffer`] is called. The first row appended to a sheet is
/// treated as its header row.
pub struct XlsxWorkbook {
    workbook: Workbook,
    options: SpecXlsxWorkbookOptions,
    set_sheet_names_existing: BTreeSet<String>,
    l_sheets: Vec<SpecSheetState>,
    fmt_date: Format,
    fmt_datetime: Format,
}

impl Default for XlsxWorkbook {
    fn default() -> Self {
        Self::new(SpecXlsxWorkbookOptions::default())
    }
}

impl XlsxWorkbook {
    /// Empty workbook with the given sheet options.
    pub fn new(options: SpecXlsxWorkbookOptions) -> Self {
        Self {
            workbook: Workbook::new(),
            options,
            set_sheet_names_existing: BTreeSet::new(),
            l_sheets: Vec::new(),
            fmt_date: Format::new().set_num_format(C_NUM_FORMAT_DATE),
            fmt_datetime: Format::new().set_num_format(C_NUM_FORMAT_DATETIME),
        }
    }

    /// Sheet names in creation order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.l_sheets.iter().map(|state| state.name.clone()).collect()
    }

    /// Rows written to sheet `sheet_idx`, header included.
    pub fn n_rows(&self, sheet_idx: usize) -> Option<usize> {
        self.l_sheets.get(sheet_idx).map(|state| state.n_row_next)
    }

    /// Per-sheet summary of what has been written so far.
    pub fn report(&self) -> Vec<SpecXlsxSheetReport> {
        self.l_sheets
            .iter()
            .map(|state| SpecXlsxSheetReport {
                sheet_name: state.name.clone(),
                n_rows: state.n_row_next,
                n_cols: state.n_cols,
            })
            .collect()
    }

    /// Apply autofit widths and write the workbook to `path`.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        self.apply_column_widths()?;
        self.workbook.save(path).map_err(derive_sink_error)?;
        info!(path = %path.display(), n_sheets = self.l_sheets.len(), "saved workbook");
        Ok(())
    }

    /// Apply autofit widths and return the workbook file bytes.
    pub fn save_to_buffer(&mut self) -> Result<Vec<u8>, ExportError> {
        self.apply_column_widths()?;
        let buf = self.workbook.save_to_buffer().map_err(derive_sink_error)?;
        debug!(n_bytes = buf.len(), "serialized workbook");
        Ok(buf)
    }

    fn apply_column_widths(&mut self) -> Result<(), ExportError> {
        let policy = &self.options.policy_autofit;
        if policy.rule_columns == EnumAutofitColumnsRule::None {
            return Ok(());
        }

        for (n_idx_sheet, state) in self.l_sheets.iter().enumerate() {
            let worksheet = self
                .workbook
                .worksheet_from_index(n_idx_sheet)
                .map_err(derive_sink_error)?;
            for n_idx_col in 0..state.n_cols {
                let n_width_header = state.l_width_header.get(n_idx_col).copied().unwrap_or(0);
                let n_width_body = state.l_width_body.get(n_idx_col).copied().unwrap_or(0);
                let n_width_recorded = match policy.rule_columns {
                    EnumAutofitColumnsRule::Body => n_width_body,
                    EnumAutofitColumnsRule::All => usize::max(n_width_header, n_width_body),
                    EnumAutofitColumnsRule::Header | EnumAutofitColumnsRule::None => {
                        n_width_header
                    }
                };
                worksheet
                    .set_column_width(
                        cast_col_num(n_idx_col).map_err(ExportError::Sink)?,
                        policy.derive_final_width(n_width_recorded) as f64,
                    )
                    .map_err(derive_sink_error)?;
            }
        }
        Ok(())
    }
}

impl WorkbookSink for XlsxWorkbook {
    type Style = SpecXlsxStyle;

    fn add_style(&mut self, fmt: &SpecCellFormat) -> Result<SpecXlsxStyle, ExportError> {
        Ok(SpecXlsxStyle::new(fmt))
    }

    fn add_sheet(&mut self, name: &str) -> Result<SpecSheetHandle, ExportError> {
        let c_name_sanitized = sanitize_sheet_name(name, C_SHEET_NAME_REPLACEMENT);
        let c_name_unique =
            derive_unique_sheet_name(&self.set_sheet_names_existing, &c_name_sanitized);
        if c_name_unique != name {
            warn!(requested = name, sheet_name = %c_name_unique, "sheet name adjusted");
        }

        let worksheet = self.workbook.add_worksheet();
        worksheet
            .set_name(&c_name_unique)
            .map_err(derive_sink_error)?;
        if self.options.if_freeze_header {
            worksheet.set_freeze_panes(1, 0).map_err(derive_sink_error)?;
        }

        self.set_sheet_names_existing
            .insert(c_name_unique.to_lowercase());
        self.l_sheets.push(SpecSheetState {
            name: c_name_unique.clone(),
            ..Default::default()
        });

        Ok(SpecSheetHandle {
            idx: self.l_sheets.len() - 1,
            name: c_name_unique,
        })
    }

    fn append_row(
        &mut self,
        sheet_idx: usize,
        cells: &[EnumCellValue],
        style: Option<&EnumRowStyle<SpecXlsxStyle>>,
        types: &[EnumColumnType],
    ) -> Result<(), ExportError> {
        let state = self
            .l_sheets
            .get_mut(sheet_idx)
            .ok_or_else(|| ExportError::Sink(format!("Sheet index out of range: {sheet_idx}")))?;
        validate_row_position(state.n_row_next, cells.len()).map_err(ExportError::Sink)?;

        let worksheet = self
            .workbook
            .worksheet_from_index(sheet_idx)
            .map_err(derive_sink_error)?;
        let n_row = cast_row_num(state.n_row_next).map_err(ExportError::Sink)?;
        let if_is_header = state.n_row_next == 0;
        let policy = &self.options.policy_autofit;
        let if_infer_body = !if_is_header
            && matches!(
                policy.rule_columns,
                EnumAutofitColumnsRule::Body | EnumAutofitColumnsRule::All
            )
            && policy
                .height_body_inferred_max
                .is_none_or(|n_max| state.n_rows_body_inferred < n_max);

        if cells.len() > state.n_cols {
            state.n_cols = cells.len();
            state.l_width_header.resize(cells.len(), 0);
            state.l_width_body.resize(cells.len(), 0);
        }

        for (n_idx_col, value) in cells.iter().enumerate() {
            let rule_type = types.get(n_idx_col).copied().unwrap_or_default();
            write_cell(
                worksheet,
                n_row,
                cast_col_num(n_idx_col).map_err(ExportError::Sink)?,
                value,
                rule_type,
                style.and_then(|style| style.get(n_idx_col)),
                (&self.fmt_date, &self.fmt_datetime),
            )?;

            let n_width = estimate_width_len(value, rule_type);
            if if_is_header {
                state.l_width_header[n_idx_col] =
                    usize::max(state.l_width_header[n_idx_col], n_width);
            } else if if_infer_body {
                state.l_width_body[n_idx_col] = usize::max(state.l_width_body[n_idx_col], n_width);
            }
        }

        if if_infer_body {
            state.n_rows_body_inferred += 1;
        }
        state.n_row_next += 1;
        Ok(())
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    n_row: u32,
    n_col: u16,
    value: &EnumCellValue,
    rule_type: EnumColumnType,
    style: Option<&SpecXlsxStyle>,
    (fmt_date, fmt_datetime): (&Format, &Format),
) -> Result<(), ExportError> {
    let fmt = style.map(|style| &style.fmt);
    let fmt_date = style.map_or(fmt_date, |style| &style.fmt_date);
    let fmt_datetime = style.map_or(fmt_datetime, |style| &style.fmt_datetime);
    match value {
        EnumCellValue::None => {
            if let Some(fmt) = fmt {
                worksheet
                    .write_blank(n_row, n_col, fmt)
                    .map_err(derive_sink_error)?;
            }
        }
        EnumCellValue::String(val) => {
            write_string(worksheet, n_row, n_col, val, fmt)?;
        }
        EnumCellValue::Integer(val) if rule_type == EnumColumnType::String => {
            write_string(worksheet, n_row, n_col, &val.to_string(), fmt)?;
        }
        EnumCellValue::Integer(val) => {
            match fmt {
                Some(fmt) => worksheet.write_number_with_format(n_row, n_col, *val as f64, fmt),
                None => worksheet.write_number(n_row, n_col, *val as f64),
            }
            .map_err(derive_sink_error)?;
        }
        EnumCellValue::Number(val) if rule_type == EnumColumnType::String => {
            write_string(worksheet, n_row, n_col, &convert_number_to_text(*val), fmt)?;
        }
        EnumCellValue::Number(val) => {
            match fmt {
                Some(fmt) => worksheet.write_number_with_format(n_row, n_col, *val, fmt),
                None => worksheet.write_number(n_row, n_col, *val),
            }
            .map_err(derive_sink_error)?;
        }
        EnumCellValue::Boolean(val) => {
            match fmt {
                Some(fmt) => worksheet.write_boolean_with_format(n_row, n_col, *val, fmt),
                None => worksheet.write_boolean(n_row, n_col, *val),
            }
            .map_err(derive_sink_error)?;
        }
        EnumCellValue::Date(val) => {
            let datetime = derive_excel_date(val)?;
            let fmt = if rule_type == EnumColumnType::Time {
                fmt_datetime
            } else {
                fmt_date
            };
            worksheet
                .write_datetime_with_format(n_row, n_col, &datetime, fmt)
                .map_err(derive_sink_error)?;
        }
        EnumCellValue::DateTime(val) => {
            let (datetime, fmt) = if rule_type == EnumColumnType::Date {
                (derive_excel_date(&val.date())?, fmt_date)
            } else {
                (derive_excel_datetime(val)?, fmt_datetime)
            };
            worksheet
                .write_datetime_with_format(n_row, n_col, &datetime, fmt)
                .map_err(derive_sink_error)?;
        }
    }
    Ok(())
}

fn write_string(
    worksheet: &mut Worksheet,
    n_row: u32,
    n_col: u16,
    val: &str,
    fmt: Option<&Format>,
) -> Result<(), ExportError> {
    match fmt {
        Some(fmt) => worksheet.write_string_with_format(n_row, n_col, val, fmt),
        None => worksheet.write_string(n_row, n_col, val),
    }
    .map_err(derive_sink_error)?;
    Ok(())
}

fn derive_excel_date(date: &NaiveDate) -> Result<ExcelDateTime, ExportError> {
    let n_year = u16::try_from(date.year())
        .map_err(|_| ExportError::Sink(format!("Date out of Excel range: {date}")))?;
    ExcelDateTime::from_ymd(n_year, date.month() as u8, date.day() as u8)
        .map_err(derive_sink_error)
}

fn derive_excel_datetime(datetime: &NaiveDateTime) -> Result<ExcelDateTime, ExportError> {
    let n_seconds =
        f64::from(datetime.second()) + f64::from(datetime.nanosecond() % 1_000_000_000) / 1e9;
    derive_excel_date(&datetime.date())?
        .and_hms(datetime.hour() as u16, datetime.minute() as u8, n_seconds)
        .map_err(derive_sink_error)
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    match align.trim().to_ascii_lowercase().as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "justify" => Some(FormatAlign::Justify),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn derive_sink_error(err: XlsxError) -> ExportError {
    ExportError::Sink(format!("xlsx write error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecAutofitCellsPolicy;

    #[test]
    fn test_add_sheet_sanitizes_and_deduplicates_names() {
        let mut workbook = XlsxWorkbook::default();

        let sheet_a = workbook.add_sheet("Posts").expect("sheet");
        let sheet_b = workbook.add_sheet("posts").expect("sheet");
        let sheet_c = workbook.add_sheet("Q1/Q2").expect("sheet");

        assert_eq!((sheet_a.idx, sheet_a.name.as_str()), (0, "Posts"));
        assert_eq!((sheet_b.idx, sheet_b.name.as_str()), (1, "posts__2"));
        assert_eq!(sheet_c.name, "Q1_Q2");
        assert_eq!(workbook.sheet_names(), vec!["Posts", "posts__2", "Q1_Q2"]);
    }

    #[test]
    fn test_append_row_tracks_rows_and_widths() {
        let mut workbook = XlsxWorkbook::default();
        let sheet = workbook.add_sheet("Items").expect("sheet");
        let fmt = workbook
            .add_style(&SpecCellFormat {
                bold: Some(true),
                ..Default::default()
            })
            .expect("style");

        workbook
            .append_row(
                sheet.idx,
                &[
                    EnumCellValue::String("Id".to_string()),
                    EnumCellValue::String("A rather long header".to_string()),
                ],
                Some(&EnumRowStyle::Uniform(fmt)),
                &[],
            )
            .expect("header");
        workbook
            .append_row(
                sheet.idx,
                &[EnumCellValue::Integer(7), EnumCellValue::None],
                None,
                &[EnumColumnType::String, EnumColumnType::None],
            )
            .expect("row");

        assert_eq!(workbook.n_rows(sheet.idx), Some(2));
        assert_eq!(
            workbook.report(),
            vec![SpecXlsxSheetReport {
                sheet_name: "Items".to_string(),
                n_rows: 2,
                n_cols: 2,
            }]
        );
        assert_eq!(workbook.l_sheets[0].l_width_header, vec![2, 20]);
        assert_eq!(workbook.l_sheets[0].l_width_body, vec![0, 0]);
    }

    #[test]
    fn test_append_row_to_unknown_sheet_is_an_error() {
        let mut workbook = XlsxWorkbook::default();
        let err = workbook
            .append_row(0, &[EnumCellValue::None], None, &[])
            .expect_err("no sheet");
        assert!(matches!(err, ExportError::Sink(_)));
    }

    #[test]
    fn test_date_values_are_written() {
        let mut workbook = XlsxWorkbook::default();
        let sheet = workbook.add_sheet("Dates").expect("sheet");
        let date = NaiveDate::from_ymd_opt(2023, 12, 31).expect("date");
        let datetime = date.and_hms_opt(23, 59, 59).expect("datetime");

        workbook
            .append_row(
                sheet.idx,
                &[
                    EnumCellValue::Date(date),
                    EnumCellValue::DateTime(datetime),
                    EnumCellValue::DateTime(datetime),
                ],
                None,
                &[
                    EnumColumnType::Date,
                    EnumColumnType::Time,
                    EnumColumnType::Date,
                ],
            )
            .expect("row");

        let buf = workbook.save_to_buffer().expect("buffer");
        assert!(buf.starts_with(b"PK"));
    }

    #[test]
    fn test_large_integers_are_written_exactly_as_text() {
        let mut workbook = XlsxWorkbook::new(SpecXlsxWorkbookOptions {
            policy_autofit: SpecAutofitCellsPolicy {
                rule_columns: EnumAutofitColumnsRule::Body,
                ..Default::default()
            },
            ..Default::default()
        });
        let sheet = workbook.add_sheet("Ids").expect("sheet");
        let n_id = 9_007_199_254_740_993i64;

        workbook
            .append_row(sheet.idx, &[EnumCellValue::String("Id".to_string())], None, &[])
            .expect("header");
        workbook
            .append_row(
                sheet.idx,
                &[EnumCellValue::Integer(n_id)],
                None,
                &[EnumColumnType::String],
            )
            .expect("row");

        assert_eq!(workbook.l_sheets[0].l_width_body, vec![n_id.to_string().len()]);
        assert!(workbook.save_to_buffer().expect("buffer").starts_with(b"PK"));
    }

    #[test]
    fn test_date_styles_carry_date_number_format() {
        let mut workbook = XlsxWorkbook::default();
        let style = workbook
            .add_style(&SpecCellFormat {
                text_wrap: Some(true),
                ..Default::default()
            })
            .expect("style");
        assert_eq!(style.fmt, Format::new().set_text_wrap());
        assert_eq!(
            style.fmt_date,
            Format::new().set_num_format(C_NUM_FORMAT_DATE).set_text_wrap()
        );
        assert_eq!(
            style.fmt_datetime,
            Format::new().set_num_format(C_NUM_FORMAT_DATETIME).set_text_wrap()
        );

        let style_custom = workbook
            .add_style(&SpecCellFormat {
                num_format: Some("yyyy".to_string()),
                ..Default::default()
            })
            .expect("style");
        assert_eq!(style_custom.fmt_date, style_custom.fmt);
        assert_eq!(style_custom.fmt_datetime, style_custom.fmt);
    }

    #[test]
    fn test_format_conversion_helpers() {
        assert_eq!(derive_format_border(1), FormatBorder::Thin);
        assert_eq!(derive_format_border(99), FormatBorder::None);
        assert_eq!(derive_format_align(" VCenter "), Some(FormatAlign::VerticalCenter));
        assert_eq!(derive_format_align("sideways"), None);
    }
}
