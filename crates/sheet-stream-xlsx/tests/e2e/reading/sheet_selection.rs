//! Tests for choosing a worksheet by index.

use std::io::Cursor;

use crate::{read_rows, XlsxFixture};
use pretty_assertions::assert_eq;
use sheet_stream_xlsx::{XlsxError, XlsxWorkbook};

fn three_sheets() -> Vec<u8> {
    XlsxFixture::new()
        .sheet("First", r#"<row r="1"><c r="A1" t="inlineStr"><is><t>first</t></is></c></row>"#)
        .sheet("Second", r#"<row r="1"><c r="A1" t="inlineStr"><is><t>second</t></is></c></row><row r="2"><c r="A2"><v>2</v></c></row>"#)
        .sheet("Third", "")
        .build()
}

#[test]
fn test_sheet_names_in_order() {
    let workbook = XlsxWorkbook::open(Cursor::new(three_sheets())).unwrap();
    assert_eq!(workbook.sheet_count(), 3);
    assert_eq!(workbook.sheet_names(), vec!["First", "Second", "Third"]);
}

#[test]
fn test_each_index_reads_its_own_sheet() {
    let first = read_rows(three_sheets(), 0).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].get(0), Some("first"));

    let second = read_rows(three_sheets(), 1).unwrap();
    assert_eq!(second.len(), 2);
    assert_eq!(second[0].get(0), Some("second"));
    assert_eq!(second[1].get(0), Some("2"));

    assert!(read_rows(three_sheets(), 2).unwrap().is_empty());
}

#[test]
fn test_index_past_last_sheet_is_empty() {
    assert!(read_rows(three_sheets(), 3).unwrap().is_empty());
    assert!(read_rows(three_sheets(), 100).unwrap().is_empty());
}

#[test]
fn test_open_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.xlsx");
    std::fs::write(&path, three_sheets()).unwrap();

    let mut workbook = XlsxWorkbook::open_path(&path).unwrap();
    let rows: Vec<_> = workbook
        .sheet_rows(1)
        .unwrap()
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_garbage_input_is_an_open_failure() {
    let err = XlsxWorkbook::open(Cursor::new(vec![0u8; 64])).unwrap_err();
    assert!(matches!(err, XlsxError::Zip(_)));
}
