//! Lazy decoding of one worksheet's `<sheetData>` into rows.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use sheet_stream_core::address::parse_cell_ref;
use sheet_stream_core::{DateSystem, RawRow};

use crate::error::{XlsxError, XlsxResult};
use crate::escape::decode_excel_escapes;
use crate::styles::CellFormats;

/// Value type from a cell's `t` attribute.
#[derive(Debug, Clone, PartialEq)]
enum CellKind {
    Number,
    SharedString,
    InlineString,
    FormulaString,
    Boolean,
    Error,
    Unknown(String),
}

impl CellKind {
    fn from_attr(t: &[u8]) -> Self {
        match t {
            b"n" => CellKind::Number,
            b"s" => CellKind::SharedString,
            b"inlineStr" => CellKind::InlineString,
            b"str" => CellKind::FormulaString,
            b"b" => CellKind::Boolean,
            b"e" => CellKind::Error,
            other => CellKind::Unknown(String::from_utf8_lossy(other).into_owned()),
        }
    }
}

/// The `<c>` element currently being read.
#[derive(Debug)]
struct PendingCell {
    col: u16,
    kind: CellKind,
    style: Option<u32>,
    value: Option<String>,
}

/// Which text-bearing element the reader is inside.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TextTarget {
    None,
    Value,
    InlineText,
}

/// Decoding state, kept apart from the XML reader and its buffer so that
/// events borrowed from the buffer can be handled without conflicts.
struct RowState<'a> {
    shared_strings: &'a [String],
    formats: &'a CellFormats,
    dates: DateSystem,
    next_row: u32,
    next_col: u16,
    row: Option<RawRow>,
    cell: Option<PendingCell>,
    text: TextTarget,
    in_inline: bool,
    in_phonetic: bool,
}

impl<'a> RowState<'a> {
    fn row_index(&self, e: &BytesStart<'_>) -> XlsxResult<u32> {
        for attr in e.attributes().flatten() {
            if attr.key.as_ref() == b"r" {
                let value = attr.unescape_value().map_err(XlsxError::Xml)?;
                let r: u32 = value
                    .parse()
                    .map_err(|_| XlsxError::Parse(format!("Invalid row number '{}'", value)))?;
                return r
                    .checked_sub(1)
                    .ok_or_else(|| XlsxError::Parse("Row number 0".into()));
            }
        }
        Ok(self.next_row)
    }

    fn start_row(&mut self, e: &BytesStart<'_>) -> XlsxResult<u32> {
        let index = self.row_index(e)?;
        self.next_row = index.saturating_add(1);
        self.next_col = 0;
        Ok(index)
    }

    fn start_cell(&mut self, e: &BytesStart<'_>) -> XlsxResult<()> {
        let mut col = self.next_col;
        let mut kind = CellKind::Number;
        let mut style = None;

        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"r" => {
                    let value = attr.unescape_value().map_err(XlsxError::Xml)?;
                    let (_, c) = parse_cell_ref(&value).map_err(|e| {
                        XlsxError::Parse(format!("Invalid cell reference '{}': {}", value, e))
                    })?;
                    col = c;
                }
                b"t" => kind = CellKind::from_attr(&attr.value),
                b"s" => {
                    style = attr
                        .unescape_value()
                        .ok()
                        .and_then(|s| s.parse::<u32>().ok());
                }
                _ => {}
            }
        }

        self.next_col = col.saturating_add(1);
        self.cell = Some(PendingCell {
            col,
            kind,
            style,
            value: None,
        });
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        if self.text == TextTarget::None {
            return;
        }
        if let Some(cell) = self.cell.as_mut() {
            cell.value.get_or_insert_with(String::new).push_str(text);
        }
    }

    fn finish_cell(&mut self) -> XlsxResult<()> {
        let Some(cell) = self.cell.take() else {
            return Ok(());
        };
        let col = cell.col;
        if let Some(text) = self.cell_text(cell)? {
            // A cell outside any <row> is attached to a row of its own
            let next_row = self.next_row;
            self.row
                .get_or_insert_with(|| RawRow::new(next_row))
                .push(col, text);
        }
        Ok(())
    }

    /// Display text of a finished cell; `None` for cells without a value.
    fn cell_text(&self, cell: PendingCell) -> XlsxResult<Option<String>> {
        let Some(value) = cell.value else {
            return Ok(None);
        };
        let text = match cell.kind {
            CellKind::SharedString => {
                let idx: usize = value.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", value))
                })?;
                self.shared_strings
                    .get(idx)
                    .cloned()
                    .ok_or_else(|| {
                        XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                    })?
            }
            CellKind::InlineString | CellKind::FormulaString => {
                decode_excel_escapes(&value).into_owned()
            }
            CellKind::Boolean => {
                let truthy = value == "1" || value.eq_ignore_ascii_case("true");
                let text = if truthy { "TRUE" } else { "FALSE" };
                text.to_string()
            }
            CellKind::Error => value,
            CellKind::Number => match value.trim().parse::<f64>() {
                Ok(n) => self.formats.render(cell.style, n, self.dates),
                Err(_) => value,
            },
            CellKind::Unknown(t) => {
                log::warn!("unknown cell type '{}' in column {}, keeping raw text", t, cell.col);
                value
            }
        };
        Ok(Some(text))
    }
}

/// Iterator over the rows of one worksheet, in document order.
///
/// Yields one [`RawRow`] per `<row>` element, including rows without any
/// valued cell. Decoding stops at the first error.
pub struct SheetRows<'a, B> {
    xml: Reader<B>,
    buf: Vec<u8>,
    state: RowState<'a>,
    done: bool,
}

impl<'a, B: BufRead> SheetRows<'a, B> {
    pub(crate) fn new(
        reader: B,
        shared_strings: &'a [String],
        formats: &'a CellFormats,
        dates: DateSystem,
    ) -> Self {
        Self {
            xml: Reader::from_reader(reader),
            buf: Vec::new(),
            state: RowState {
                shared_strings,
                formats,
                dates,
                next_row: 0,
                next_col: 0,
                row: None,
                cell: None,
                text: TextTarget::None,
                in_inline: false,
                in_phonetic: false,
            },
            done: false,
        }
    }

    fn next_row(&mut self) -> XlsxResult<Option<RawRow>> {
        loop {
            self.buf.clear();
            let state = &mut self.state;
            match self.xml.read_event_into(&mut self.buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"row" => {
                        let index = state.start_row(&e)?;
                        state.row = Some(RawRow::new(index));
                    }
                    b"c" => state.start_cell(&e)?,
                    b"v" if state.cell.is_some() => state.text = TextTarget::Value,
                    b"is" if state.cell.is_some() => state.in_inline = true,
                    b"rPh" => state.in_phonetic = true,
                    b"t" if state.in_inline && !state.in_phonetic => {
                        state.text = TextTarget::InlineText;
                    }
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"row" => {
                        let index = state.start_row(&e)?;
                        return Ok(Some(RawRow::new(index)));
                    }
                    // A cell with no content still advances the implicit column
                    b"c" => {
                        state.start_cell(&e)?;
                        state.cell = None;
                    }
                    _ => {}
                },
                Event::Text(e) => {
                    if state.text != TextTarget::None {
                        let text = e.unescape()?;
                        state.push_text(&text);
                    }
                }
                Event::CData(e) => {
                    if state.text != TextTarget::None {
                        state.push_text(&String::from_utf8_lossy(&e));
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"v" | b"t" => state.text = TextTarget::None,
                    b"is" => state.in_inline = false,
                    b"rPh" => state.in_phonetic = false,
                    b"c" => state.finish_cell()?,
                    b"row" => {
                        if let Some(row) = state.row.take() {
                            return Ok(Some(row));
                        }
                    }
                    b"sheetData" => return Ok(state.row.take()),
                    _ => {}
                },
                Event::Eof => return Ok(state.row.take()),
                _ => {}
            }
        }
    }
}

impl<'a, B: BufRead> Iterator for SheetRows<'a, B> {
    type Item = XlsxResult<RawRow>;

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

impl<B> std::fmt::Debug for SheetRows<'_, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetRows")
            .field("next_row", &self.state.next_row)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
