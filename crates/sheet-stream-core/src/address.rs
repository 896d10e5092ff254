//! A1-style cell references as they appear in sheet XML (`r="B12"`).
//!
//! Only the relative form is needed while decoding; `$` markers are accepted
//! and ignored.

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
pub fn column_to_letters(col: u16) -> String {
    let mut result = Vec::new();
    let mut n = col as u32 + 1;

    while n > 0 {
        n -= 1;
        result.push((n % 26) as u8 + b'A');
        n /= 26;
    }

    result.reverse();
    String::from_utf8(result).unwrap_or_default()
}

/// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
pub fn letters_to_column(letters: &str) -> Result<u16> {
    if letters.is_empty() {
        return Err(Error::InvalidAddress("empty column letters".into()));
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidAddress(format!(
                "invalid column letter '{}'",
                c
            )));
        }
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        if col > MAX_COLS as u32 {
            return Err(Error::ColumnOutOfBounds(col - 1, MAX_COLS - 1));
        }
    }

    Ok((col - 1) as u16)
}

/// Parse a cell reference such as `"C7"` or `"$C$7"` into 0-based `(row, col)`.
pub fn parse_cell_ref(s: &str) -> Result<(u32, u16)> {
    let s = s.trim();
    let letters: String = s
        .chars()
        .filter(|c| *c != '$')
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    let col = letters_to_column(&letters)?;

    let digits: String = s
        .chars()
        .filter(|c| *c != '$')
        .skip(letters.len())
        .collect();
    if digits.is_empty() {
        return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
    }
    let row: u32 = digits
        .parse()
        .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;
    if row == 0 {
        return Err(Error::InvalidAddress(format!(
            "row number must be >= 1 in '{}'",
            s
        )));
    }
    if row > MAX_ROWS {
        return Err(Error::RowOutOfBounds(row - 1, MAX_ROWS - 1));
    }

    Ok((row - 1, col))
}

/// Column part of a cell reference, for cells whose row is already known.
pub fn parse_column_ref(s: &str) -> Result<u16> {
    parse_cell_ref(s).map(|(_, col)| col)
}
