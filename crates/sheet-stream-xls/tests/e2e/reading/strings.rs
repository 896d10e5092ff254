//! Tests for shared and inline strings, including CONTINUE splits.

use crate::*;
use pretty_assertions::assert_eq;
use sheet_stream_xls::biff::records;
use sheet_stream_xls::XlsError;

#[test]
fn test_shared_strings() {
    let bytes = XlsFixture::new()
        .shared_strings(&["Alice", "Bob", ""])
        .sheet(
            "People",
            &[label_sst(0, 0, 1), label_sst(0, 1, 0), label_sst(1, 0, 2)],
        )
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    assert_eq!(
        cells(&rows[0]),
        vec![(0, "Bob".to_string()), (1, "Alice".to_string())]
    );
    assert_eq!(rows[1].get(0), Some(""));
}

#[test]
fn test_inline_label_unicode() {
    let bytes = XlsFixture::new()
        .sheet("Data", &[label(0, 0, "Zoë"), label(0, 1, "日本語")])
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    assert_eq!(
        cells(&rows[0]),
        vec![(0, "Zoë".to_string()), (1, "日本語".to_string())]
    );
}

#[test]
fn test_shared_string_split_across_continue() {
    // "Hello" with "Hel" in the SST and "lo" (as UTF-16) in a CONTINUE
    let mut sst = [1u32.to_le_bytes(), 1u32.to_le_bytes()].concat();
    sst.extend_from_slice(&[0x05, 0x00, 0x00, b'H', b'e', b'l']);
    let mut raw = record(records::SST, &sst);
    raw.extend(record(records::CONTINUE, &[0x01, b'l', 0x00, b'o', 0x00]));

    let bytes = XlsFixture::new()
        .raw_sst(raw)
        .sheet("Data", &[label_sst(0, 0, 0)])
        .build();

    let rows = read_rows(bytes, 0).unwrap();
    assert_eq!(rows[0].get(0), Some("Hello"));
}

#[test]
fn test_sst_index_out_of_range() {
    let bytes = XlsFixture::new()
        .shared_strings(&["only"])
        .sheet("Data", &[label_sst(0, 0, 3)])
        .build();

    assert!(matches!(read_rows(bytes, 0), Err(XlsError::Parse(_))));
}
