//! Tests for choosing a worksheet by index.

use std::io::Cursor;

use crate::*;
use pretty_assertions::assert_eq;
use sheet_stream_xls::{XlsError, XlsWorkbook};

fn three_sheets() -> XlsFixture {
    XlsFixture::new()
        .shared_strings(&["first", "second"])
        .sheet("First", &[label_sst(0, 0, 0)])
        .chart("Chart")
        .sheet("Second", &[label_sst(0, 0, 1), number(1, 0, 0, 2.0)])
        .sheet("Third", &[])
}

#[test]
fn test_sheet_names_skip_charts() {
    let workbook = XlsWorkbook::open(Cursor::new(three_sheets().build())).unwrap();
    assert_eq!(workbook.sheet_count(), 3);
    assert_eq!(workbook.sheet_names(), vec!["First", "Second", "Third"]);
}

#[test]
fn test_each_index_reads_its_own_sheet() {
    let first = read_rows(three_sheets().build(), 0).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].get(0), Some("first"));

    let second = read_rows(three_sheets().build(), 1).unwrap();
    assert_eq!(second.len(), 2);
    assert_eq!(second[0].get(0), Some("second"));
    assert_eq!(second[1].get(0), Some("2"));

    assert!(read_rows(three_sheets().build(), 2).unwrap().is_empty());
}

#[test]
fn test_rows_end_at_the_selected_sheet() {
    let bytes = XlsFixture::new()
        .shared_strings(&["a1", "a2", "b1", "c1"])
        .sheet("A", &[label_sst(0, 0, 0), label_sst(1, 0, 1)])
        .sheet("B", &[label_sst(0, 0, 2)])
        .sheet("C", &[label_sst(0, 0, 3)])
        .build();
    let rows = read_rows(bytes, 0).unwrap();
    let texts: Vec<_> = rows.iter().map(|r| r.get(0)).collect();
    assert_eq!(texts, vec![Some("a1"), Some("a2")]);
}

#[test]
fn test_index_past_last_sheet_is_empty() {
    assert!(read_rows(three_sheets().build(), 3).unwrap().is_empty());
}

#[test]
fn test_book_stream_name() {
    let bytes = wrap_in_cfb("/Book", &three_sheets().stream());
    let rows = read_rows(bytes, 0).unwrap();
    assert_eq!(rows[0].get(0), Some("first"));
}

#[test]
fn test_missing_workbook_stream() {
    let bytes = wrap_in_cfb("/Other", &three_sheets().stream());
    assert!(matches!(
        XlsWorkbook::open(Cursor::new(bytes)),
        Err(XlsError::InvalidFormat(_))
    ));
}

#[test]
fn test_non_biff8_rejected() {
    let mut stream = record(0x0809, &[0x00, 0x05, 0x05, 0x00]);
    stream.extend(record(0x000A, &[]));
    let bytes = wrap_in_cfb("/Workbook", &stream);
    assert!(matches!(
        XlsWorkbook::open(Cursor::new(bytes)),
        Err(XlsError::UnsupportedVersion(_))
    ));
}

#[test]
fn test_open_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.xls");
    std::fs::write(&path, three_sheets().build()).unwrap();

    let mut workbook = XlsWorkbook::open_path(&path).unwrap();
    let rows: Vec<_> = workbook
        .sheet_rows(1)
        .unwrap()
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(rows.len(), 2);
}
