//! BIFF8 Unicode string decoding.
//!
//! BIFF8 strings have a complex encoding:
//! - Header: char_count (2 bytes, 1 byte in short strings) + flags (1 byte)
//! - Flags bit 0 (`fHighByte`): 0 = compressed Latin-1, 1 = uncompressed UTF-16LE
//! - Flags bit 2 (`fExtSt`): extended string data follows (Asian phonetic)
//! - Flags bit 3 (`fRichSt`): rich text run array follows
//! - If fRichSt: 2-byte run count follows the flags
//! - If fExtSt: 4-byte extended data size follows
//! - Then the character data
//! - Then the rich text runs (4 bytes each) if fRichSt
//! - Then the extended data if fExtSt
//!
//! When character data crosses a CONTINUE boundary, the continuation starts
//! with a fresh flags byte whose bit 0 gives the encoding of the remainder.

use super::parser::ByteReader;
use crate::error::{XlsError, XlsResult};

/// Read a BIFF8 "short" string (1-byte length prefix, used in BOUNDSHEET).
pub fn read_short_string(r: &mut ByteReader<'_>) -> XlsResult<String> {
    let char_count = r.u8()? as usize;
    let flags = r.u8()?;
    read_string_body(r, char_count, flags, &[])
}

/// Read a BIFF8 Unicode string with a 2-byte length prefix that lies within
/// a single record body.
pub fn read_unicode_string(r: &mut ByteReader<'_>) -> XlsResult<String> {
    read_continued_string(r, &[])
}

/// Read a BIFF8 Unicode string that may cross the CONTINUE boundaries at
/// `continues` (offsets into the merged body).
pub fn read_continued_string(r: &mut ByteReader<'_>, continues: &[usize]) -> XlsResult<String> {
    let char_count = r.u16()? as usize;
    let flags = r.u8()?;
    read_string_body(r, char_count, flags, continues)
}

fn read_string_body(
    r: &mut ByteReader<'_>,
    char_count: usize,
    flags: u8,
    continues: &[usize],
) -> XlsResult<String> {
    let run_count = if flags & 0x08 != 0 { r.u16()? as usize } else { 0 };
    let ext_size = if flags & 0x04 != 0 { r.u32()? as usize } else { 0 };

    let mut wide = flags & 0x01 != 0;
    let mut units: Vec<u16> = Vec::with_capacity(char_count);

    while units.len() < char_count {
        if continues.binary_search(&r.position()).is_ok() {
            wide = r.u8()? & 0x01 != 0;
        }
        // Characters up to the next boundary (or the end of the body)
        let next = continues
            .iter()
            .copied()
            .find(|&b| b > r.position())
            .unwrap_or(r.len());
        let width = if wide { 2 } else { 1 };
        let available = (next - r.position()) / width;
        let take = available.min(char_count - units.len());
        if take == 0 {
            return Err(XlsError::Parse(format!(
                "string data too short: {} of {} characters at offset {}",
                units.len(),
                char_count,
                r.position()
            )));
        }

        let bytes = r.bytes(take * width)?;
        if wide {
            units.extend(bytes.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])));
        } else {
            units.extend(bytes.iter().map(|&b| b as u16));
        }
    }

    // Rich text runs (4 bytes each) and phonetic data carry no text
    r.skip(run_count * 4 + ext_size)?;

    String::from_utf16(&units).map_err(|e| XlsError::Parse(format!("invalid UTF-16 string: {e}")))
}

/// Parse the SST (Shared String Table) from its merged record body.
///
/// The SST body starts with:
/// - `total_strings` (4 bytes, u32): total string refs in workbook
/// - `unique_strings` (4 bytes, u32): number of entries in this table
/// - Then `unique_strings` Unicode string entries
pub fn parse_sst(data: &[u8], continues: &[usize]) -> XlsResult<Vec<String>> {
    let mut r = ByteReader::new(data);

    let _total_strings = r.u32()?;
    let unique_count = r.u32()? as usize;

    // The declared count is untrusted; cap the preallocation by body size
    let mut strings = Vec::with_capacity(unique_count.min(data.len() / 3));

    for i in 0..unique_count {
        match read_continued_string(&mut r, continues) {
            Ok(s) => strings.push(s),
            Err(e) => {
                // Some XLS files have SST padding or truncation issues.
                log::warn!("SST parse error at string {i}/{unique_count}: {e}");
                break;
            }
        }
    }

    Ok(strings)
}
