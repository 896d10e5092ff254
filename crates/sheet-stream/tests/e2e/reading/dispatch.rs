//! Container detection for streams and paths.

use std::io::Cursor;

use crate::*;
use pretty_assertions::assert_eq;
use sheet_stream::{Error, SheetReader};

fn people_reader() -> SheetReader<Person> {
    SheetReader::new().row_filter(|row| row.index() > 0)
}

#[test]
fn test_stream_sniffed_either_way() {
    let a = people_reader().read(Cursor::new(xlsx(&[("P", PEOPLE)]))).unwrap();
    let b = people_reader().read(Cursor::new(xls(&[("P", PEOPLE)]))).unwrap();
    assert_eq!(a.len(), 3);
    assert_eq!(a, b);
}

#[test]
fn test_explicit_decoders() {
    let a = people_reader().read_xlsx(Cursor::new(xlsx(&[("P", PEOPLE)]))).unwrap();
    let b = people_reader().read_xls(Cursor::new(xls(&[("P", PEOPLE)]))).unwrap();
    assert_eq!(a, b);

    let wrong = people_reader().read_xls(Cursor::new(xlsx(&[("P", PEOPLE)])));
    assert!(matches!(wrong, Err(Error::Xls(_))));
}

#[test]
fn test_xls_suffix_dispatches_without_sniffing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("People.XLS");
    std::fs::write(&path, xls(&[("P", PEOPLE)])).unwrap();

    let mut names = Vec::new();
    people_reader()
        .read_path_then(&path, |p| names.push(p.name))
        .unwrap();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);

    // The suffix wins over the content
    let mislabeled = dir.path().join("actually-xlsx.xls");
    std::fs::write(&mislabeled, xlsx(&[("P", PEOPLE)])).unwrap();
    assert!(matches!(people_reader().read_path(&mislabeled), Err(Error::Xls(_))));
}

#[test]
fn test_xlsx_suffix_is_sniffed() {
    let dir = tempfile::tempdir().unwrap();
    let legacy = dir.path().join("legacy.xlsx");
    std::fs::write(&legacy, xls(&[("P", PEOPLE)])).unwrap();

    let mut names = Vec::new();
    people_reader()
        .read_path_then(&legacy, |p| names.push(p.name))
        .unwrap();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);

    let package = dir.path().join("macros.xlsm");
    std::fs::write(&package, xlsx(&[("P", PEOPLE)])).unwrap();
    assert_eq!(people_reader().read_path(&package).unwrap().len(), 3);
}

#[test]
fn test_unknown_suffix_is_sniffed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.bin");
    std::fs::write(&path, xls(&[("P", PEOPLE)])).unwrap();
    assert_eq!(people_reader().read_path(&path).unwrap().len(), 3);
}

#[test]
fn test_garbage_is_an_open_failure() {
    let err = people_reader()
        .read(Cursor::new(b"name,age\nAlice,30\n".to_vec()))
        .unwrap_err();
    assert!(matches!(err, Error::Xlsx(_)));

    let err = people_reader().read(Cursor::new(Vec::new())).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
}
