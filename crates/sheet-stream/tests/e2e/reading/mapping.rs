//! Column binding and coercion as seen through a full read.

use std::io::Cursor;

use crate::*;
use pretty_assertions::assert_eq;
use sheet_stream::{BindingResult, FieldBindings, SheetReader, SheetRecord};

#[test]
fn test_bad_cell_leaves_only_that_field_default() {
    let rows: &[&[&str]] = &[&["Dave", "forty", "12.5", "maybe"]];
    for bytes in [xlsx(&[("People", rows)]), xls(&[("People", rows)])] {
        let people = SheetReader::<Person>::new().read(Cursor::new(bytes)).unwrap();
        assert_eq!(people, vec![person("Dave", 0, Some(12.5), false)]);
    }
}

#[test]
fn test_unbound_and_missing_columns() {
    let rows: &[&[&str]] = &[&["Eve", "", "", "", "extra", "ignored"], &["", "33"]];
    let people = SheetReader::<Person>::new()
        .read(Cursor::new(xlsx(&[("People", rows)])))
        .unwrap();
    assert_eq!(
        people,
        vec![person("Eve", 0, None, false), person("", 33, None, false)]
    );
}

#[derive(Debug, Default, PartialEq)]
struct Pair {
    left: String,
    right: String,
}

impl SheetRecord for Pair {
    fn bindings() -> BindingResult<FieldBindings<Self>> {
        FieldBindings::<Self>::new()
            .bind_letters("A", "left", |p: &mut Pair, v: String| p.left = v)?
            .bind_letters("C", "right", |p: &mut Pair, v: String| p.right = v)
    }
}

#[test]
fn test_binding_by_letters_skips_columns() {
    let rows: &[&[&str]] = &[&["one", "two", "three"]];
    let pairs = SheetReader::<Pair>::new()
        .read(Cursor::new(xls(&[("Pairs", rows)])))
        .unwrap();
    assert_eq!(
        pairs,
        vec![Pair {
            left: "one".into(),
            right: "three".into()
        }]
    );
}

#[derive(Debug, Default)]
struct Broken;

impl SheetRecord for Broken {
    fn bindings() -> BindingResult<FieldBindings<Self>> {
        FieldBindings::<Self>::new().bind_letters("A1", "cell", |_: &mut Broken, _: String| {})
    }
}

#[test]
fn test_invalid_binding_fails_before_decoding() {
    let err = SheetReader::<Broken>::new()
        .read(Cursor::new(xlsx(&[("Any", &[&["x"]])])))
        .unwrap_err();
    assert!(matches!(err, sheet_stream::Error::Binding(_)));
}
