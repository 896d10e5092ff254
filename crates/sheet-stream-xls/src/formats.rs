//! Number formats from the FORMAT and XF records of the workbook globals.

use std::collections::HashMap;

use sheet_stream_core::{DateSystem, NumberFormat};

use crate::biff::parser::ByteReader;
use crate::biff::strings::read_continued_string;
use crate::error::{XlsError, XlsResult};

/// Collects FORMAT and XF records while the globals are read.
#[derive(Debug, Default)]
pub(crate) struct FormatTableBuilder {
    custom: HashMap<u16, String>,
    xf_formats: Vec<u16>,
}

impl FormatTableBuilder {
    /// FORMAT: ifmt(2) + XLUnicodeString
    pub(crate) fn add_format(&mut self, data: &[u8], continues: &[usize]) -> XlsResult<()> {
        let mut r = ByteReader::new(data);
        let ifmt = r.u16()?;
        let code = read_continued_string(&mut r, continues)?;
        self.custom.insert(ifmt, code);
        Ok(())
    }

    /// XF: ifnt(2) + ifmt(2) + ... (20 bytes in BIFF8). Only ifmt matters here.
    pub(crate) fn add_xf(&mut self, data: &[u8]) -> XlsResult<()> {
        if data.len() < 20 {
            return Err(XlsError::Parse(format!(
                "XF record too short: {} bytes (expected 20)",
                data.len()
            )));
        }
        let mut r = ByteReader::new(data);
        let _ifnt = r.u16()?;
        self.xf_formats.push(r.u16()?);
        Ok(())
    }

    pub(crate) fn build(self) -> CellFormats {
        let formats = self
            .xf_formats
            .iter()
            .map(|&id| NumberFormat::resolve(id as u32, self.custom.get(&id).map(String::as_str)))
            .collect();
        CellFormats { formats }
    }
}

/// XF index → number format table.
#[derive(Debug, Default)]
pub(crate) struct CellFormats {
    formats: Vec<NumberFormat>,
}

impl CellFormats {
    pub(crate) fn render(&self, xf: u16, value: f64, dates: DateSystem) -> String {
        match self.formats.get(xf as usize) {
            Some(format) => format.render(value, dates),
            None => NumberFormat::General.render(value, dates),
        }
    }
}
