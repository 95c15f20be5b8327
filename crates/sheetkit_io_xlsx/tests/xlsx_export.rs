use polars::prelude::df;
use pretty_assertions::assert_eq;
use serde_json::json;
use sheetkit_export::{
    EnumColumnType, EnumColumnTypes, EnumExportData, EnumRecordValue, ExportOutcome, NoTranslate,
    SpecCellFormat, SpecExportOptions, export_sheet,
};
use sheetkit_io_xlsx::{
    DataFrameRow, DataFrameSource, EnumAutofitColumnsRule, SpecAutofitCellsPolicy,
    SpecXlsxSheetReport, SpecXlsxWorkbookOptions, XlsxWorkbook,
};

fn create_frame_source() -> DataFrameSource {
    let df = df!(
        "id" => &[1i64, 2, 3],
        "title" => &["First", "Second", "Third"],
        "published" => &[1i64, 0, 1],
        "created_on" => &["2023-12-31", "2024-01-01", "not a date"],
    )
    .expect("df");
    DataFrameSource::new(df)
}

#[test]
fn test_dataframe_export_saves_workbook() {
    let source = create_frame_source();
    let options = SpecExportOptions {
        types: Some(EnumColumnTypes::PerColumn(vec![
            EnumColumnType::String,
            EnumColumnType::None,
            EnumColumnType::Boolean,
            EnumColumnType::Date,
        ])),
        header_style: Some(SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        }),
        name: Some("Posts/2024".to_string()),
        size_batch: Some(2),
        ..Default::default()
    };
    let mut workbook = XlsxWorkbook::default();

    let outcome = export_sheet::<DataFrameRow, _>(
        &mut workbook,
        EnumExportData::Data(&source),
        &options,
        None,
        &NoTranslate,
    )
    .expect("export");
    assert!(matches!(outcome, ExportOutcome::Written { n_rows: 3, .. }));

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("posts.xlsx");
    workbook.save(&path).expect("save");

    assert!(std::fs::metadata(&path).expect("metadata").len() > 0);
    assert_eq!(
        workbook.report(),
        vec![SpecXlsxSheetReport {
            sheet_name: "Posts_2024".to_string(),
            n_rows: 4,
            n_cols: 4,
        }]
    );
}

#[test]
fn test_empty_frame_adds_no_sheet() {
    let df = df!("id" => Vec::<i64>::new()).expect("df");
    let source = DataFrameSource::new(df);
    let mut workbook = XlsxWorkbook::default();

    let outcome = export_sheet::<DataFrameRow, _>(
        &mut workbook,
        EnumExportData::Data(&source),
        &SpecExportOptions::default(),
        None,
        &NoTranslate,
    )
    .expect("export");

    assert_eq!(outcome, ExportOutcome::Skipped);
    assert!(workbook.sheet_names().is_empty());
}

#[test]
fn test_repeated_exports_get_unique_sheets() {
    let l_records = vec![EnumRecordValue::from_json(&json!({"id": 1, "tags": ["a", "b"]}))];
    let options = SpecExportOptions {
        columns: Some(vec!["id".to_string(), "tags.1".to_string()]),
        name: Some("Records".to_string()),
        ..Default::default()
    };
    let mut workbook = XlsxWorkbook::new(SpecXlsxWorkbookOptions {
        policy_autofit: SpecAutofitCellsPolicy {
            rule_columns: EnumAutofitColumnsRule::All,
            ..Default::default()
        },
        if_freeze_header: false,
    });

    for _ in 0..3 {
        export_sheet::<EnumRecordValue, _>(
            &mut workbook,
            EnumExportData::Data(&l_records),
            &options,
            None,
            &NoTranslate,
        )
        .expect("export");
    }

    assert_eq!(
        workbook.sheet_names(),
        vec!["Records", "Records__2", "Records__3"]
    );
    let buf = workbook.save_to_buffer().expect("buffer");
    assert!(buf.starts_with(b"PK"));
}
