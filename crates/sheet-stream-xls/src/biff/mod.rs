//! BIFF8 (Binary Interchange File Format) handling.
//!
//! A BIFF8 stream is a sequence of records, each with a 4-byte header
//! (2 bytes record type + 2 bytes body length) followed by the body.
//!
//! CONTINUE records (type 0x003C) extend the body of the preceding record
//! beyond the 8224-byte per-record limit. [`RecordReader`] merges them and
//! remembers where each continuation started, because strings split across
//! a boundary carry an extra flags byte there.

pub mod parser;
pub mod records;
pub mod strings;

use std::io::{ErrorKind, Read};

use crate::error::{XlsError, XlsResult};

/// A single BIFF8 record (with CONTINUE bodies already merged).
#[derive(Debug, Clone, PartialEq)]
pub struct BiffRecord {
    /// Record type ID (e.g. `records::SST`, `records::NUMBER`).
    pub record_type: u16,
    /// Record body bytes (CONTINUE bodies concatenated).
    pub data: Vec<u8>,
    /// Offsets into `data` at which each CONTINUE body begins.
    pub continues: Vec<usize>,
}

/// Lazily reads records from a BIFF8 stream.
///
/// Reads exactly as far as the records requested. The record after a merged
/// record is read ahead only to detect CONTINUE; nothing is read ahead of an
/// EOF record.
pub struct RecordReader<R> {
    inner: R,
    lookahead: Option<(u16, Vec<u8>)>,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            lookahead: None,
        }
    }

    /// Read one raw record. `None` at a clean end of stream.
    fn read_raw(&mut self) -> XlsResult<Option<(u16, Vec<u8>)>> {
        let mut header = [0u8; 4];
        let mut filled = 0;
        while filled < header.len() {
            match self.inner.read(&mut header[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(XlsError::Io(e)),
            }
        }
        match filled {
            0 => return Ok(None),
            4 => {}
            n => {
                return Err(XlsError::Parse(format!(
                    "truncated record header: {} of 4 bytes",
                    n
                )))
            }
        }

        let record_type = u16::from_le_bytes([header[0], header[1]]);
        let body_len = u16::from_le_bytes([header[2], header[3]]) as usize;

        let mut body = vec![0u8; body_len];
        match self.inner.read_exact(&mut body) {
            Ok(()) => Ok(Some((record_type, body))),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(XlsError::Parse(format!(
                "record 0x{:04X} truncated: expected {} body bytes",
                record_type, body_len
            ))),
            Err(e) => Err(XlsError::Io(e)),
        }
    }

    /// Next record with its CONTINUE bodies merged. `None` at end of stream.
    pub fn next_record(&mut self) -> XlsResult<Option<BiffRecord>> {
        let (record_type, mut data) = match self.lookahead.take() {
            Some(raw) => raw,
            None => match self.read_raw()? {
                Some(raw) => raw,
                None => return Ok(None),
            },
        };

        let mut continues = Vec::new();
        if record_type != records::EOF {
            while let Some((next_type, body)) = self.read_raw()? {
                if next_type == records::CONTINUE {
                    continues.push(data.len());
                    data.extend_from_slice(&body);
                } else {
                    self.lookahead = Some((next_type, body));
                    break;
                }
            }
        }

        Ok(Some(BiffRecord {
            record_type,
            data,
            continues,
        }))
    }
}

/// Extract the BOF record fields from a record body.
///
/// Returns `(version, substream_type)`.
/// - `version` should be `0x0600` for BIFF8
/// - `substream_type`: 0x0005 = workbook globals, 0x0010 = worksheet, etc.
pub fn parse_bof(data: &[u8]) -> XlsResult<(u16, u16)> {
    if data.len() < 4 {
        return Err(XlsError::InvalidFormat("BOF record too short".into()));
    }
    let version = u16::from_le_bytes([data[0], data[1]]);
    let dt = u16::from_le_bytes([data[2], data[3]]);
    Ok((version, dt))
}
