//! Low-level binary parsing helpers for BIFF8 records.
//!
//! All multi-byte integers in BIFF8 are little-endian.

use crate::error::{XlsError, XlsResult};

/// Forward-only reader over one record body.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset into the body
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total body length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left after the current offset
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Take the next `n` bytes.
    pub fn bytes(&mut self, n: usize) -> XlsResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(XlsError::Parse(format!(
                "unexpected end of data at offset {}, need {} bytes",
                self.pos, n
            )));
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn skip(&mut self, n: usize) -> XlsResult<()> {
        self.bytes(n).map(|_| ())
    }

    pub fn u8(&mut self) -> XlsResult<u8> {
        Ok(self.bytes(1)?[0])
    }

    pub fn u16(&mut self) -> XlsResult<u16> {
        let b = self.bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32(&mut self) -> XlsResult<u32> {
        let b = self.bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// IEEE 754 double
    pub fn f64(&mut self) -> XlsResult<f64> {
        let b = self.bytes(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(b);
        Ok(f64::from_le_bytes(raw))
    }

    /// RK-encoded number
    pub fn rk(&mut self) -> XlsResult<f64> {
        self.u32().map(decode_rk)
    }

    /// The leading `row(2) + col(2) + xf(2)` shared by every cell record.
    pub fn cell_header(&mut self) -> XlsResult<(u32, u16, u16)> {
        let row = self.u16()? as u32;
        let col = self.u16()?;
        let xf = self.u16()?;
        Ok((row, col, xf))
    }
}

/// Decode an RK-encoded number.
///
/// RK encoding (4 bytes):
/// - Bit 0: if 1, the decoded number should be divided by 100
/// - Bit 1: if 1, bits 2..31 are a signed 30-bit integer; if 0, they are the
///   upper 30 bits of an IEEE 754 double whose lower 34 bits are zero
#[inline]
pub fn decode_rk(rk: u32) -> f64 {
    let value = if rk & 0x02 != 0 {
        ((rk as i32) >> 2) as f64
    } else {
        f64::from_bits(((rk & 0xFFFF_FFFC) as u64) << 32)
    };

    if rk & 0x01 != 0 {
        value / 100.0
    } else {
        value
    }
}
