//! XLSX workbook session and sheet selection

mod rows;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use sheet_stream_core::DateSystem;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::decode_excel_escapes;
use crate::styles::{read_styles_xml, CellFormats};

pub use rows::SheetRows;

/// A worksheet as listed in `xl/workbook.xml`, resolved to its part path.
#[derive(Debug, Clone)]
struct SheetEntry {
    name: String,
    path: String,
}

/// An open XLSX package.
///
/// Opening loads the workbook-level parts only. Worksheet content is decoded
/// on demand by [`XlsxWorkbook::sheet_rows`], one sheet at a time.
pub struct XlsxWorkbook<R> {
    archive: zip::ZipArchive<R>,
    shared_strings: Vec<String>,
    formats: CellFormats,
    dates: DateSystem,
    sheets: Vec<SheetEntry>,
}

impl XlsxWorkbook<BufReader<File>> {
    /// Open a package from a file path
    pub fn open_path<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let file = File::open(path)?;
        Self::open(BufReader::new(file))
    }
}

impl<R: Read + Seek> XlsxWorkbook<R> {
    /// Open a package from a reader
    pub fn open(reader: R) -> XlsxResult<Self> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let formats = Self::read_styles(&mut archive)?;
        let (listed, date_1904) = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        // Chartsheets and dialog sheets have no worksheet relationship and are not counted
        let sheets = listed
            .into_iter()
            .filter_map(|(name, r_id)| {
                sheet_paths
                    .get(&r_id)
                    .map(|path| SheetEntry { name, path: path.clone() })
            })
            .collect();

        Ok(Self {
            archive,
            shared_strings,
            formats,
            dates: DateSystem::from_1904_flag(date_1904),
            sheets,
        })
    }

    /// Number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Worksheet names in document order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Date system declared by `<workbookPr date1904>`
    pub fn date_system(&self) -> DateSystem {
        self.dates
    }

    /// Decode the rows of the worksheet at `index` (0-based, document order).
    ///
    /// Sheets before the target are passed over without opening their parts.
    /// Returns `Ok(None)` when the workbook has no sheet at `index`.
    pub fn sheet_rows(&mut self, index: usize) -> XlsxResult<Option<SheetRows<'_, impl BufRead + '_>>> {
        let Self {
            archive,
            shared_strings,
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

        log::debug!("decoding sheet {} '{}' from {}", index, sheet.name, sheet.path);
        let part = archive
            .by_name(&sheet.path)
            .map_err(|_| XlsxError::MissingPart(sheet.path.clone()))?;

        Ok(Some(SheetRows::new(
            BufReader::new(part),
            shared_strings,
            formats,
            *dates,
        )))
    }

    /// Read the shared strings table
    fn read_shared_strings(archive: &mut zip::ZipArchive<R>) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        // Whitespace inside <t> is content, so text is not trimmed
        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current).into_owned());
                        current.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    let text = e.unescape().map_err(XlsxError::Xml)?;
                    current.push_str(&text);
                }
                Ok(Event::CData(e)) if in_t => {
                    current.push_str(&String::from_utf8_lossy(&e));
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    fn read_styles(archive: &mut zip::ZipArchive<R>) -> XlsxResult<CellFormats> {
        match archive.by_name("xl/styles.xml") {
            Ok(file) => read_styles_xml(file),
            Err(_) => Ok(CellFormats::default()),
        }
    }

    /// Read workbook.xml to get sheet names, rIds and the date system
    fn read_workbook_xml(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<(Vec<(String, String)>, bool)> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();
        let mut date_1904 = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"sheet" => {
                        let mut name = None;
                        let mut r_id = None;

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"name" => {
                                    name = attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                // The relationships namespace prefix is not always "r"
                                key if key.ends_with(b":id") => {
                                    r_id = attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                _ => {}
                            }
                        }

                        if let (Some(name), Some(r_id)) = (name, r_id) {
                            sheets.push((name, r_id));
                        }
                    }
                    b"workbookPr" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"date1904" {
                                date_1904 = attr
                                    .unescape_value()
                                    .ok()
                                    .map_or(false, |s| s.as_ref() == "1" || s.as_ref() == "true");
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, date_1904))
    }

    /// Read workbook.xml.rels to get worksheet part paths
    fn read_workbook_rels(archive: &mut zip::ZipArchive<R>) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;

                    for attr in e.attributes().flatten() {
                        let value = attr.unescape_value().ok().map(|s| s.to_string());
                        match attr.key.as_ref() {
                            b"Id" => id = value,
                            b"Target" => target = value,
                            b"Type" => rel_type = value,
                            _ => {}
                        }
                    }

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            rels.insert(id, part_path(&target));
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }
}

/// Resolve a relationship target against the `xl/` folder.
fn part_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target.trim_start_matches("./")),
    }
}

impl<R> std::fmt::Debug for XlsxWorkbook<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxWorkbook")
            .field("sheets", &self.sheets)
            .field("shared_strings", &self.shared_strings.len())
            .field("dates", &self.dates)
            .finish_non_exhaustive()
    }
}
