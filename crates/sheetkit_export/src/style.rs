//! Default style selection and style minting.

use std::collections::HashMap;

use crate::conf::derive_default_type_format;
use crate::sink::WorkbookSink;
use crate::spec::{EnumRowStyle, ExportError, SpecCellFormat, SpecColumn};

/// Plan data-row formats.
///
/// An explicit row format applies to every column; otherwise each column gets
/// its type default with the column's own format merged on top.
pub fn plan_row_formats(
    columns: &[SpecColumn],
    fmt_row: Option<&SpecCellFormat>,
) -> EnumRowStyle<SpecCellFormat> {
    if let Some(fmt_row) = fmt_row {
        return EnumRowStyle::Uniform(fmt_row.clone());
    }

    EnumRowStyle::PerColumn(
        columns
            .iter()
            .map(|col| {
                let fmt_base = derive_default_type_format(col.rule_type);
                match &col.fmt {
                    Some(fmt_col) => fmt_base.merge(fmt_col),
                    None => fmt_base,
                }
            })
            .collect(),
    )
}

/// Header format: explicit header format, else the explicit row format.
pub fn plan_header_format(
    fmt_header: Option<&SpecCellFormat>,
    fmt_row: Option<&SpecCellFormat>,
) -> Option<SpecCellFormat> {
    fmt_header.or(fmt_row).cloned()
}

/// Mint sink styles for a format plan; equal formats share one handle.
pub fn mint_row_styles<W>(
    sink: &mut W,
    plan: &EnumRowStyle<SpecCellFormat>,
) -> Result<EnumRowStyle<W::Style>, ExportError>
where
    W: WorkbookSink + ?Sized,
{
    match plan {
        EnumRowStyle::Uniform(fmt) => Ok(EnumRowStyle::Uniform(sink.add_style(fmt)?)),
        EnumRowStyle::PerColumn(l_fmts) => {
            let mut dict_minted: HashMap<&SpecCellFormat, W::Style> = HashMap::new();
            let mut l_styles = Vec::with_capacity(l_fmts.len());
            for fmt in l_fmts {
                let style = match dict_minted.get(fmt) {
                    Some(style) => style.clone(),
                    None => {
                        let style = sink.add_style(fmt)?;
                        dict_minted.insert(fmt, style.clone());
                        style
                    }
                };
                l_styles.push(style);
            }
            Ok(EnumRowStyle::PerColumn(l_styles))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemoryWorkbook;
    use crate::spec::EnumColumnType;

    fn create_columns() -> Vec<SpecColumn> {
        let mut l_columns = vec![
            SpecColumn::new("created_at"),
            SpecColumn::new("born_on"),
            SpecColumn::new("title"),
            SpecColumn::new("id"),
        ];
        l_columns[0].rule_type = EnumColumnType::Time;
        l_columns[1].rule_type = EnumColumnType::Date;
        l_columns[2].rule_type = EnumColumnType::String;
        l_columns
    }

    #[test]
    fn test_explicit_row_format_is_uniform() {
        let fmt_row = SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        };
        assert_eq!(
            plan_row_formats(&create_columns(), Some(&fmt_row)),
            EnumRowStyle::Uniform(fmt_row)
        );
    }

    #[test]
    fn test_defaults_follow_column_types() {
        let EnumRowStyle::PerColumn(l_fmts) = plan_row_formats(&create_columns(), None) else {
            panic!("expected per-column plan");
        };

        assert_eq!(l_fmts[0].num_format.as_deref(), Some("dd-mm-yyyy hh:mm:ss"));
        assert_eq!(l_fmts[1].num_format.as_deref(), Some("dd-mm-yyyy"));
        assert_eq!(l_fmts[2].text_wrap, Some(true));
        assert_eq!(l_fmts[3].text_wrap, Some(true));
    }

    #[test]
    fn test_column_format_merges_over_type_default() {
        let mut l_columns = create_columns();
        l_columns[1].fmt = Some(SpecCellFormat {
            num_format: Some("yyyy-mm-dd".to_string()),
            bold: Some(true),
            ..Default::default()
        });

        let plan = plan_row_formats(&l_columns, None);
        let fmt_col = plan.get(1).expect("format");
        assert_eq!(fmt_col.num_format.as_deref(), Some("yyyy-mm-dd"));
        assert_eq!(fmt_col.bold, Some(true));
    }

    #[test]
    fn test_header_defaults_to_row_format() {
        let fmt_row = SpecCellFormat {
            italic: Some(true),
            ..Default::default()
        };
        let fmt_header = SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        };

        assert_eq!(plan_header_format(None, None), None);
        assert_eq!(plan_header_format(None, Some(&fmt_row)), Some(fmt_row.clone()));
        assert_eq!(
            plan_header_format(Some(&fmt_header), Some(&fmt_row)),
            Some(fmt_header)
        );
    }

    #[test]
    fn test_minting_shares_handles_for_equal_formats() {
        let mut workbook = MemoryWorkbook::new();
        let plan = plan_row_formats(&create_columns(), None);

        let styles = mint_row_styles(&mut workbook, &plan).expect("styles");
        assert_eq!(styles, EnumRowStyle::PerColumn(vec![0, 1, 2, 2]));
        assert_eq!(workbook.styles.len(), 3);
    }
}
