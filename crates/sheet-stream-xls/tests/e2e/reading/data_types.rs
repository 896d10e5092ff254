//! Tests for reading the various cell record types.

use crate::*;
use pretty_assertions::assert_eq;

#[test]
fn test_numbers_render_as_general() {
    let bytes = XlsFixture::new()
        .sheet(
            "Data",
            &[
                number(0, 0, 0, 42.0),
                number(0, 1, 0, 3.14),
                number(0, 2, 0, -100.0),
                number(0, 3, 0, 0.0),
            ],
        )
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        cells(&rows[0]),
        vec![
            (0, "42".to_string()),
            (1, "3.14".to_string()),
            (2, "-100".to_string()),
            (3, "0".to_string()),
        ]
    );
}

#[test]
fn test_rk_and_mulrk() {
    let bytes = XlsFixture::new()
        .sheet("Data", &[rk_int(0, 0, 0, 7), mulrk_ints(1, 1, &[10, 20, 30])])
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    assert_eq!(cells(&rows[0]), vec![(0, "7".to_string())]);
    assert_eq!(
        cells(&rows[1]),
        vec![
            (1, "10".to_string()),
            (2, "20".to_string()),
            (3, "30".to_string()),
        ]
    );
}

#[test]
fn test_booleans_and_errors() {
    let bytes = XlsFixture::new()
        .sheet(
            "Data",
            &[
                boolean(0, 0, true),
                boolean(0, 1, false),
                error(0, 2, 0x2A),
                error(0, 3, 0x17),
            ],
        )
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    assert_eq!(
        cells(&rows[0]),
        vec![
            (0, "TRUE".to_string()),
            (1, "FALSE".to_string()),
            (2, "#N/A".to_string()),
            (3, "#REF!".to_string()),
        ]
    );
}

#[test]
fn test_formula_string_result() {
    let bytes = XlsFixture::new()
        .sheet("Data", &[formula_text(0, 0, "A&B"), number(0, 1, 0, 1.0)])
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    assert_eq!(
        cells(&rows[0]),
        vec![(0, "A&B".to_string()), (1, "1".to_string())]
    );
}

#[test]
fn test_number_formats_from_xf() {
    let bytes = XlsFixture::new()
        .format(164, "0.00")
        .xf(164) // XF 1
        .xf(14) // XF 2: mm-dd-yy
        .xf(10) // XF 3: 0.00%
        .sheet(
            "Data",
            &[
                number(0, 0, 1, 2.5),
                number(0, 1, 2, 45306.0),
                number(0, 2, 3, 0.125),
            ],
        )
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    assert_eq!(
        cells(&rows[0]),
        vec![
            (0, "2.50".to_string()),
            (1, "01-15-24".to_string()),
            (2, "12.50%".to_string()),
        ]
    );
}

#[test]
fn test_1904_date_mode() {
    let bytes = XlsFixture::new()
        .date_1904()
        .format(164, "yyyy-mm-dd")
        .xf(164)
        .sheet("Data", &[number(0, 0, 1, 43844.0)])
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    assert_eq!(rows[0].get(0), Some("2024-01-15"));
}

#[test]
fn test_rows_without_cells_are_not_emitted() {
    let bytes = XlsFixture::new()
        .sheet("Data", &[number(0, 0, 0, 1.0), number(5, 0, 0, 6.0)])
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    let indices: Vec<u32> = rows.iter().map(|r| r.index()).collect();
    assert_eq!(indices, vec![0, 5]);
}
