//! XLS (BIFF8) workbook session and sheet row decoding.
//!
//! Opens a Compound File Binary (CFB/OLE2) container, reads the workbook
//! globals from the `Workbook` stream, and decodes one worksheet substream on
//! demand by seeking to the offset its BOUNDSHEET record declares.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use sheet_stream_core::{DateSystem, RawRow};

use crate::biff::parser::ByteReader;
use crate::biff::strings::{parse_sst, read_continued_string, read_short_string, read_unicode_string};
use crate::biff::{self, records, BiffRecord, RecordReader};
use crate::error::{XlsError, XlsResult};
use crate::formats::{CellFormats, FormatTableBuilder};

/// A worksheet listed by a BOUNDSHEET record.
#[derive(Debug, Clone)]
struct SheetInfo {
    /// Absolute byte offset of the sheet's BOF in the Workbook stream.
    offset: u32,
    name: String,
}

/// An open XLS file.
pub struct XlsWorkbook<R> {
    cfb: cfb::CompoundFile<R>,
    stream_path: &'static str,
    sst: Vec<String>,
    formats: CellFormats,
    dates: DateSystem,
    sheets: Vec<SheetInfo>,
}

impl XlsWorkbook<File> {
    /// Open an XLS file from a filesystem path.
    pub fn open_path<P: AsRef<Path>>(path: P) -> XlsResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::open(file)
    }
}

impl<R: Read + Seek> XlsWorkbook<R> {
    /// Open an XLS file from any `Read + Seek` source and read its globals.
    pub fn open(reader: R) -> XlsResult<Self> {
        let mut cfb = cfb::CompoundFile::open(reader)?;

        // Some files use "Book" for the workbook stream
        let stream_path = if cfb.exists("/Workbook") {
            "/Workbook"
        } else if cfb.exists("/Book") {
            "/Book"
        } else {
            return Err(XlsError::InvalidFormat(
                "no Workbook or Book stream found in CFB".into(),
            ));
        };

        let stream = cfb.open_stream(stream_path)?;
        let mut reader = RecordReader::new(BufReader::new(stream));

        match reader.next_record()? {
            Some(rec) if rec.record_type == records::BOF => {
                let (version, dt) = biff::parse_bof(&rec.data)?;
                if dt != records::BOF_WORKBOOK_GLOBALS {
                    return Err(XlsError::InvalidFormat(format!(
                        "expected workbook globals BOF, got substream type 0x{dt:04X}"
                    )));
                }
                if version != records::BIFF8_VERSION {
                    return Err(XlsError::UnsupportedVersion(format!(
                        "expected BIFF8 (0x0600), got 0x{version:04X}"
                    )));
                }
            }
            _ => {
                return Err(XlsError::InvalidFormat(
                    "no workbook globals BOF found".into(),
                ))
            }
        }

        let mut sst = Vec::new();
        let mut sheets = Vec::new();
        let mut date_1904 = false;
        let mut formats = FormatTableBuilder::default();

        loop {
            let Some(rec) = reader.next_record()? else {
                return Err(XlsError::Parse("workbook globals end without EOF".into()));
            };
            match rec.record_type {
                records::EOF => break,
                records::SST => sst = parse_sst(&rec.data, &rec.continues)?,
                records::BOUNDSHEET => {
                    if let Some(info) = Self::parse_boundsheet(&rec.data)? {
                        sheets.push(info);
                    }
                }
                records::DATEMODE => {
                    let mut r = ByteReader::new(&rec.data);
                    date_1904 = r.u16()? == 1;
                }
                records::FORMAT => {
                    if let Err(e) = formats.add_format(&rec.data, &rec.continues) {
                        log::warn!("skipping unreadable FORMAT record: {e}");
                    }
                }
                records::XF => formats.add_xf(&rec.data)?,
                _ => {}
            }
        }

        Ok(Self {
            cfb,
            stream_path,
            sst,
            formats: formats.build(),
            dates: DateSystem::from_1904_flag(date_1904),
            sheets,
        })
    }

    /// Parse a BOUNDSHEET record body: offset(4) + visibility(1) + type(1) + name.
    ///
    /// Returns `None` for chart, macro and VBA sheets.
    fn parse_boundsheet(data: &[u8]) -> XlsResult<Option<SheetInfo>> {
        let mut r = ByteReader::new(data);
        let offset = r.u32()?;
        let _visibility = r.u8()?;
        let sheet_type = r.u8()?;
        let name = read_short_string(&mut r)?;

        if sheet_type != records::SHEET_TYPE_WORKSHEET {
            log::debug!("ignoring non-worksheet '{}' (type {})", name, sheet_type);
            return Ok(None);
        }
        Ok(Some(SheetInfo { offset, name }))
    }

    /// Number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Worksheet names in BOUNDSHEET order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Date system declared by the DATEMODE record
    pub fn date_system(&self) -> DateSystem {
        self.dates
    }

    /// Decode the rows of the worksheet at `index` (0-based, BOUNDSHEET order).
    ///
    /// Only the target sheet's substream is read. Returns `Ok(None)` when the
    /// workbook has no worksheet at `index`.
    pub fn sheet_rows(&mut self, index: usize) -> XlsResult<Option<XlsRows<'_, impl Read + '_>>> {
        let Self {
            cfb,
            stream_path,
            sst,
            formats,
            dates,
            sheets,
        } = self;

        let mut target = None;
        for (pos, sheet) in sheets.iter().enumerate() {
            if pos > index {
                break;
            }
            if pos == index {
                target = Some(sheet);
            } else {
                log::debug!("passing over sheet {} '{}'", pos, sheet.name);
            }
        }
        let Some(sheet) = target else {
            log::debug!(
                "sheet index {} not present ({} worksheets)",
                index,
                sheets.len()
            );
            return Ok(None);
        };

        log::debug!(
            "decoding sheet {} '{}' at stream offset {}",
            index,
            sheet.name,
            sheet.offset
        );
        let mut stream = cfb.open_stream(*stream_path)?;
        stream.seek(SeekFrom::Start(sheet.offset as u64))?;
        let mut reader = RecordReader::new(BufReader::new(stream));

        match reader.next_record()? {
            Some(rec) if rec.record_type == records::BOF => {
                let (_, dt) = biff::parse_bof(&rec.data)?;
                if dt != records::BOF_WORKSHEET {
                    return Err(XlsError::InvalidFormat(format!(
                        "sheet '{}' offset points at substream type 0x{dt:04X}",
                        sheet.name
                    )));
                }
            }
            _ => {
                return Err(XlsError::InvalidFormat(format!(
                    "sheet '{}' offset does not point at a BOF record",
                    sheet.name
                )))
            }
        }

        Ok(Some(XlsRows {
            reader,
            sst: sst.as_slice(),
            formats: &*formats,
            dates: *dates,
            depth: 1,
            pending_formula: None,
            current: None,
            done: false,
        }))
    }
}

impl<R> std::fmt::Debug for XlsWorkbook<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsWorkbook")
            .field("stream_path", &self.stream_path)
            .field("sheets", &self.sheets)
            .field("sst", &self.sst.len())
            .field("dates", &self.dates)
            .finish_non_exhaustive()
    }
}

/// Display text for a BOOLERR / FORMULA error code.
fn error_text(code: u8) -> &'static str {
    match code {
        0x00 => "#NULL!",
        0x07 => "#DIV/0!",
        0x0F => "#VALUE!",
        0x17 => "#REF!",
        0x1D => "#NAME?",
        0x24 => "#NUM!",
        0x2A => "#N/A",
        0x2B => "#GETTING_DATA",
        _ => "#VALUE!",
    }
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// Rows of one worksheet substream, in record order.
///
/// BIFF8 has no row delimiters in the cell stream: a row ends when a cell of
/// another row arrives, or at the substream's EOF. Rows without any valued
/// cell therefore produce no [`RawRow`].
pub struct XlsRows<'a, S> {
    reader: RecordReader<S>,
    sst: &'a [String],
    formats: &'a CellFormats,
    dates: DateSystem,
    /// BOF/EOF nesting; embedded chart substreams sit inside a worksheet.
    depth: u32,
    /// Cell of the last FORMULA whose string result is in the next STRING record
    pending_formula: Option<(u32, u16)>,
    current: Option<RawRow>,
    done: bool,
}

impl<'a, S: Read> XlsRows<'a, S> {
    /// Add a cell, returning the previous row if this cell starts a new one.
    fn place(&mut self, row: u32, col: u16, text: String) -> Option<RawRow> {
        let finished = if self.current.as_ref().is_some_and(|c| c.index() != row) {
            self.current.take()
        } else {
            None
        };
        self.current
            .get_or_insert_with(|| RawRow::new(row))
            .push(col, text);
        finished
    }

    fn number(&self, xf: u16, value: f64) -> String {
        self.formats.render(xf, value, self.dates)
    }

    /// Decode a cell record into `(row, [(col, text)])`.
    fn cells(&mut self, rec: &BiffRecord) -> XlsResult<Option<(u32, Vec<(u16, String)>)>> {
        let mut r = ByteReader::new(&rec.data);
        let cell = match rec.record_type {
            // LABELSST: row(2) + col(2) + xf(2) + sst_index(4)
            records::LABELSST => {
                let (row, col, _) = r.cell_header()?;
                let idx = r.u32()? as usize;
                let text = self.sst.get(idx).cloned().ok_or_else(|| {
                    XlsError::Parse(format!("SST index {} out of bounds ({})", idx, self.sst.len()))
                })?;
                (row, vec![(col, text)])
            }
            // LABEL / RSTRING: row(2) + col(2) + xf(2) + unicode_string [+ runs]
            records::LABEL | records::RSTRING => {
                let (row, col, _) = r.cell_header()?;
                (row, vec![(col, read_unicode_string(&mut r)?)])
            }
            // NUMBER: row(2) + col(2) + xf(2) + f64(8)
            records::NUMBER => {
                let (row, col, xf) = r.cell_header()?;
                let value = r.f64()?;
                (row, vec![(col, self.number(xf, value))])
            }
            // RK: row(2) + col(2) + xf(2) + rk(4)
            records::RK => {
                let (row, col, xf) = r.cell_header()?;
                let value = r.rk()?;
                (row, vec![(col, self.number(xf, value))])
            }
            // MULRK: row(2) + first_col(2) + [xf(2) + rk(4)]* + last_col(2)
            records::MULRK => {
                let row = r.u16()? as u32;
                let first_col = r.u16()?;
                if rec.data.len() < 6 {
                    return Err(XlsError::Parse("MULRK record too short".into()));
                }
                let count = (rec.data.len() - 6) / 6;
                let mut cells = Vec::with_capacity(count);
                for i in 0..count {
                    let xf = r.u16()?;
                    let value = r.rk()?;
                    cells.push((first_col.saturating_add(i as u16), self.number(xf, value)));
                }
                (row, cells)
            }
            // BOOLERR: row(2) + col(2) + xf(2) + value(1) + is_error(1)
            records::BOOLERR => {
                let (row, col, _) = r.cell_header()?;
                let value = r.u8()?;
                let is_error = r.u8()? != 0;
                let text = if is_error {
                    error_text(value)
                } else {
                    bool_text(value != 0)
                };
                (row, vec![(col, text.to_string())])
            }
            // FORMULA: row(2) + col(2) + xf(2) + result(8) + options(2) + ...
            records::FORMULA => {
                let (row, col, xf) = r.cell_header()?;
                let result = r.bytes(8)?;
                if result[6] != 0xFF || result[7] != 0xFF {
                    let mut raw = [0u8; 8];
                    raw.copy_from_slice(result);
                    (row, vec![(col, self.number(xf, f64::from_le_bytes(raw)))])
                } else {
                    match result[0] {
                        0x00 => {
                            // The string follows in a STRING record
                            self.pending_formula = Some((row, col));
                            return Ok(None);
                        }
                        0x01 => (row, vec![(col, bool_text(result[2] != 0).to_string())]),
                        0x02 => (row, vec![(col, error_text(result[2]).to_string())]),
                        // Empty string result
                        _ => {
                            self.pending_formula = None;
                            return Ok(None);
                        }
                    }
                }
            }
            records::STRING => {
                let Some((row, col)) = self.pending_formula.take() else {
                    return Ok(None);
                };
                (row, vec![(col, read_continued_string(&mut r, &rec.continues)?)])
            }
            _ => return Ok(None),
        };
        // SHRFMLA or ARRAY may sit between a FORMULA and its STRING
        self.pending_formula = None;
        Ok(Some(cell))
    }

    fn next_row(&mut self) -> XlsResult<Option<RawRow>> {
        loop {
            let Some(rec) = self.reader.next_record()? else {
                return Err(XlsError::Parse("sheet substream ends without EOF".into()));
            };

            match rec.record_type {
                records::BOF => {
                    self.depth += 1;
                    continue;
                }
                records::EOF => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        self.done = true;
                        return Ok(self.current.take());
                    }
                    continue;
                }
                _ if self.depth > 1 => continue,
                _ => {}
            }

            let Some((row, cells)) = self.cells(&rec)? else {
                continue;
            };
            let mut finished = None;
            for (col, text) in cells {
                if let Some(done) = self.place(row, col, text) {
                    finished = Some(done);
                }
            }
            if finished.is_some() {
                return Ok(finished);
            }
        }
    }
}

impl<'a, S: Read> Iterator for XlsRows<'a, S> {
    type Item = XlsResult<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<S> std::fmt::Debug for XlsRows<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsRows")
            .field("depth", &self.depth)
            .field("current", &self.current.as_ref().map(RawRow::index))
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
