//! Number formats referenced by cell styles (`xl/styles.xml`).
//!
//! Only `numFmts` and the `numFmtId` of each `cellXfs` entry are read; fonts,
//! fills and borders have no effect on cell text.

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use sheet_stream_core::{DateSystem, NumberFormat};

use crate::error::{XlsxError, XlsxResult};

/// Style index → number format table.
#[derive(Debug, Default)]
pub(crate) struct CellFormats {
    formats: Vec<NumberFormat>,
}

impl CellFormats {
    /// Format for a cell's `s` attribute. Missing or unknown styles are General.
    pub(crate) fn get(&self, style: Option<u32>) -> &NumberFormat {
        static GENERAL: NumberFormat = NumberFormat::General;
        style
            .and_then(|s| self.formats.get(s as usize))
            .unwrap_or(&GENERAL)
    }

    pub(crate) fn render(&self, style: Option<u32>, value: f64, dates: DateSystem) -> String {
        self.get(style).render(value, dates)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.formats.len()
    }
}

fn num_fmt_id(e: &BytesStart<'_>) -> Option<u32> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"numFmtId")
        .and_then(|a| a.unescape_value().ok().and_then(|s| s.parse().ok()))
}

pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<CellFormats> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut custom: HashMap<u32, String> = HashMap::new();
    let mut xf_ids: Vec<u32> = Vec::new();
    let mut in_cell_xfs = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"numFmt" => {
                    let mut code = None;
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"formatCode" {
                            code = attr.unescape_value().ok().map(|s| s.to_string());
                        }
                    }
                    if let (Some(id), Some(code)) = (num_fmt_id(&e), code) {
                        custom.insert(id, code);
                    }
                }
                b"cellXfs" => in_cell_xfs = true,
                b"xf" if in_cell_xfs => xf_ids.push(num_fmt_id(&e).unwrap_or(0)),
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"cellXfs" => {
                in_cell_xfs = false;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let formats = xf_ids
        .into_iter()
        .map(|id| NumberFormat::resolve(id, custom.get(&id).map(String::as_str)))
        .collect();
    Ok(CellFormats { formats })
}
