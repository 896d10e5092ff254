//! Tests for reading cell values of each XLSX cell type.

use crate::{cells, read_rows, XlsxFixture};
use pretty_assertions::assert_eq;

#[test]
fn test_number_values() {
    let bytes = XlsxFixture::new()
        .sheet(
            "Numbers",
            r#"<row r="1"><c r="A1"><v>42</v></c></row>
               <row r="2"><c r="A2"><v>3.14159</v></c></row>
               <row r="3"><c r="A3" t="n"><v>-100</v></c></row>
               <row r="4"><c r="A4"><v>0</v></c></row>
               <row r="5"><c r="A5"><v>1E+20</v></c></row>"#,
        )
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    let texts: Vec<&str> = rows.iter().map(|r| r.get(0).unwrap()).collect();
    assert_eq!(texts, vec!["42", "3.14159", "-100", "0", "1E+20"]);
}

#[test]
fn test_string_values() {
    let bytes = XlsxFixture::new()
        .shared_strings(&["Hello", "World with spaces", "Unicode: \u{65e5}\u{672c}\u{8a9e}"])
        .sheet(
            "Strings",
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="s"><v>2</v></c></row>
               <row r="2"><c r="A2" t="inlineStr"><is><t>inline &lt;tag&gt;</t></is></c></row>"#,
        )
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    assert_eq!(
        cells(&rows[0]),
        vec![
            (0, "Hello".to_string()),
            (1, "World with spaces".to_string()),
            (2, "Unicode: \u{65e5}\u{672c}\u{8a9e}".to_string()),
        ]
    );
    assert_eq!(rows[1].get(0), Some("inline <tag>"));
}

#[test]
fn test_boolean_and_error_values() {
    let bytes = XlsxFixture::new()
        .sheet(
            "Flags",
            r#"<row r="1"><c r="A1" t="b"><v>1</v></c><c r="B1" t="b"><v>0</v></c><c r="C1" t="e"><v>#DIV/0!</v></c></row>"#,
        )
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    assert_eq!(
        cells(&rows[0]),
        vec![
            (0, "TRUE".to_string()),
            (1, "FALSE".to_string()),
            (2, "#DIV/0!".to_string()),
        ]
    );
}

#[test]
fn test_formula_cached_values() {
    let bytes = XlsxFixture::new()
        .sheet(
            "Formulas",
            r#"<row r="1"><c r="A1"><f>1+1</f><v>2</v></c><c r="B1" t="str"><f>"a"&amp;"b"</f><v>ab</v></c><c r="C1"><f>NOW()</f></c></row>"#,
        )
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    assert_eq!(
        cells(&rows[0]),
        vec![(0, "2".to_string()), (1, "ab".to_string())]
    );
}

#[test]
fn test_rows_keep_physical_order_and_index() {
    let bytes = XlsxFixture::new()
        .sheet(
            "Sparse",
            r#"<row r="1"><c r="A1"><v>1</v></c></row><row r="3"/><row r="10"><c r="C10"><v>10</v></c></row>"#,
        )
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    let indexes: Vec<u32> = rows.iter().map(|r| r.index()).collect();
    assert_eq!(indexes, vec![0, 2, 9]);
    assert!(rows[1].is_empty());
    assert_eq!(rows[2].get(2), Some("10"));
}
