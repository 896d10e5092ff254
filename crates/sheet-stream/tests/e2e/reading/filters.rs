//! Row and record predicates, and failures raised by callers' closures.

use std::io::Cursor;

use crate::*;
use pretty_assertions::assert_eq;
use sheet_stream::{Error, SheetReader};

#[test]
fn test_reject_all_rows_is_empty() {
    for bytes in [xlsx(&[("People", PEOPLE)]), xls(&[("People", PEOPLE)])] {
        let people = SheetReader::<Person>::new()
            .row_filter(|_| false)
            .read(Cursor::new(bytes))
            .unwrap();
        assert!(people.is_empty());
    }
}

#[test]
fn test_record_filter_sees_mapped_values() {
    let people = SheetReader::<Person>::new()
        .row_filter(|row| row.index() > 0)
        .record_filter(|p| p.active && p.age < 30)
        .read(Cursor::new(xlsx(&[("People", PEOPLE)])))
        .unwrap();
    assert_eq!(people, vec![person("Carol", 28, Some(77.0), true)]);
}

#[test]
fn test_row_filter_on_raw_text() {
    let people = SheetReader::<Person>::new()
        .row_filter(|row| row.get(0).map_or(false, |name| name.starts_with('B')))
        .read(Cursor::new(xls(&[("People", PEOPLE)])))
        .unwrap();
    assert_eq!(people, vec![person("Bob", 41, None, false)]);
}

#[test]
fn test_predicate_error_aborts_after_prior_deliveries() {
    let reader = SheetReader::<Person>::new()
        .row_filter(|row| row.index() > 0)
        .try_record_filter(|p: &Person| {
            if p.name == "Bob" {
                Err(format!("refusing {}", p.name))
            } else {
                Ok(true)
            }
        });

    for bytes in [xlsx(&[("People", PEOPLE)]), xls(&[("People", PEOPLE)])] {
        let mut seen = Vec::new();
        let err = reader
            .read_then(Cursor::new(bytes), |p| seen.push(p.name))
            .unwrap_err();
        assert!(matches!(err, Error::Predicate(ref e) if e.to_string() == "refusing Bob"));
        assert_eq!(seen, vec!["Alice"]);
    }
}

#[test]
fn test_row_predicate_error() {
    let err = SheetReader::<Person>::new()
        .try_row_filter(|row| {
            if row.index() == 2 {
                Err("row 3 is corrupt")
            } else {
                Ok(true)
            }
        })
        .read(Cursor::new(xls(&[("People", PEOPLE)])))
        .unwrap_err();
    assert!(matches!(err, Error::Predicate(_)));
}

#[test]
fn test_handler_error_aborts() {
    let mut calls = 0;
    let err = SheetReader::<Person>::new()
        .try_read_then(Cursor::new(xlsx(&[("People", PEOPLE)])), |_| {
            calls += 1;
            if calls == 2 {
                Err("sink closed")
            } else {
                Ok(())
            }
        })
        .unwrap_err();
    assert!(matches!(err, Error::Handler(ref e) if e.to_string() == "sink closed"));
    assert_eq!(calls, 2);
}
