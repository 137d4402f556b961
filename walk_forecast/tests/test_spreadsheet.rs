use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use walk_forecast::data::DataLoader;
use walk_forecast::error::ForecastError;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Write one sheet with `fill` into a fresh workbook
fn workbook<F>(dir: &TempDir, name: &str, fill: F) -> PathBuf
where
    F: FnOnce(&mut Worksheet) -> Result<(), XlsxError>,
{
    let path = dir.path().join(name);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    fill(sheet).unwrap();
    workbook.save(&path).unwrap();
    path
}

fn load(path: &Path) -> walk_forecast::Result<walk_forecast::DailySeries> {
    DataLoader::default().load(path)
}

#[test]
fn test_date_formatted_cells() {
    let dir = tempdir().unwrap();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let path = workbook(&dir, "dates.xlsx", |sheet| {
        sheet.write_string(0, 0, "date")?;
        sheet.write_string(0, 1, "gross_posted")?;
        // 44927 is 2023-01-01
        for (row, value) in [(1u32, 100.5), (2, 101.0), (3, 99.25)] {
            sheet.write_number_with_format(row, 0, 44926.0 + row as f64, &date_format)?;
            sheet.write_number(row, 1, value)?;
        }
        Ok(())
    });

    let series = load(&path).unwrap();

    assert_eq!(series.name(), "gross_posted");
    assert_eq!(series.dates(), &[ymd(2023, 1, 1), ymd(2023, 1, 2), ymd(2023, 1, 3)]);
    assert_eq!(series.values(), &[100.5, 101.0, 99.25]);
}

#[test]
fn test_string_dates_and_numeric_text() {
    let dir = tempdir().unwrap();
    let path = workbook(&dir, "strings.xlsx", |sheet| {
        sheet.write_string(0, 0, " Date ")?;
        sheet.write_string(0, 1, "GROSS_POSTED")?;
        sheet.write_string(1, 0, "2023-03-01")?;
        sheet.write_number(1, 1, 10.0)?;
        sheet.write_string(2, 0, "2023/03/02")?;
        sheet.write_string(2, 1, " 12.5 ")?;
        sheet.write_string(3, 0, "03/03/2023")?;
        sheet.write_number(3, 1, 11.0)?;
        Ok(())
    });

    let series = load(&path).unwrap();

    assert_eq!(series.dates(), &[ymd(2023, 3, 1), ymd(2023, 3, 2), ymd(2023, 3, 3)]);
    assert_eq!(series.values(), &[10.0, 12.5, 11.0]);
}

#[test]
fn test_blank_rows_are_skipped() {
    let dir = tempdir().unwrap();
    let path = workbook(&dir, "blank.xlsx", |sheet| {
        sheet.write_string(0, 0, "date")?;
        sheet.write_string(0, 1, "gross_posted")?;
        sheet.write_string(1, 0, "2023-01-01")?;
        sheet.write_number(1, 1, 1.0)?;
        sheet.write_string(3, 0, "2023-01-02")?;
        sheet.write_number(3, 1, 2.0)?;
        Ok(())
    });

    let series = load(&path).unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series.values(), &[1.0, 2.0]);
}

#[test]
fn test_missing_value_cell_is_reported() {
    let dir = tempdir().unwrap();
    let path = workbook(&dir, "gap.xlsx", |sheet| {
        sheet.write_string(0, 0, "date")?;
        sheet.write_string(0, 1, "gross_posted")?;
        sheet.write_string(1, 0, "2023-01-01")?;
        sheet.write_number(1, 1, 1.0)?;
        sheet.write_string(2, 0, "2023-01-02")?;
        Ok(())
    });

    match load(&path) {
        Err(ForecastError::DataError(msg)) => {
            assert!(msg.contains("gross_posted"));
            assert!(msg.contains("row 2"));
        }
        other => panic!("expected DataError, got {:?}", other),
    }
}

#[test]
fn test_missing_target_column() {
    let dir = tempdir().unwrap();
    let path = workbook(&dir, "columns.xlsx", |sheet| {
        sheet.write_string(0, 0, "date")?;
        sheet.write_string(0, 1, "net_posted")?;
        sheet.write_string(1, 0, "2023-01-01")?;
        sheet.write_number(1, 1, 1.0)?;
        Ok(())
    });

    let err = load(&path).unwrap_err();
    assert!(err.is_input_error());
    assert!(err.to_string().contains("gross_posted"));
}

#[test]
fn test_header_only_sheet_has_no_data() {
    let dir = tempdir().unwrap();
    let path = workbook(&dir, "header.xlsx", |sheet| {
        sheet.write_string(0, 0, "date")?;
        sheet.write_string(0, 1, "gross_posted")?;
        Ok(())
    });

    assert!(matches!(load(&path), Err(ForecastError::DataError(_))));
}

#[test]
fn test_corrupt_workbook_is_a_spreadsheet_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"not a zip archive").unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(err, ForecastError::SpreadsheetError(_)));
    assert!(err.is_input_error());
}
