//! Common utilities for E2E tests.

use std::io::{Cursor, Write};

use sheet_stream_core::RawRow;
use sheet_stream_xlsx::{XlsxResult, XlsxWorkbook};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#;

/// In-memory XLSX package builder.
///
/// ```rust,ignore
/// let bytes = XlsxFixture::new()
///     .sheet("People", r#"<row r="1"><c r="A1" t="inlineStr"><is><t>Alice</t></is></c></row>"#)
///     .build();
/// ```
#[derive(Default)]
pub struct XlsxFixture {
    sheets: Vec<(String, String)>,
    shared_strings: Vec<String>,
    styles: Option<String>,
    date_1904: bool,
}

impl XlsxFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worksheet whose `<sheetData>` contains `rows`.
    pub fn sheet(mut self, name: &str, rows: &str) -> Self {
        self.sheets.push((name.to_string(), rows.to_string()));
        self
    }

    /// Set the shared strings table.
    pub fn shared_strings(mut self, strings: &[&str]) -> Self {
        self.shared_strings = strings.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Set `xl/styles.xml`.
    pub fn styles(mut self, xml: &str) -> Self {
        self.styles = Some(xml.to_string());
        self
    }

    pub fn date_1904(mut self) -> Self {
        self.date_1904 = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();
            let mut part = |name: &str, content: &str| {
                zip.start_file(name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            };

            part("[Content_Types].xml", CONTENT_TYPES);
            part("_rels/.rels", r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#);

            let mut sheets = String::new();
            let mut rels = String::new();
            for (i, (name, _)) in self.sheets.iter().enumerate() {
                sheets.push_str(&format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    name,
                    i + 1,
                    i + 1
                ));
                rels.push_str(&format!(
                    r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                    i + 1,
                    i + 1
                ));
            }
            let workbook_pr = if self.date_1904 {
                r#"<workbookPr date1904="1"/>"#
            } else {
                ""
            };
            part(
                "xl/workbook.xml",
                &format!(
                    r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">{}<sheets>{}</sheets></workbook>"#,
                    workbook_pr, sheets
                ),
            );
            part(
                "xl/_rels/workbook.xml.rels",
                &format!(
                    r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
                    rels
                ),
            );

            if !self.shared_strings.is_empty() {
                let items: String = self
                    .shared_strings
                    .iter()
                    .map(|s| format!("<si><t xml:space=\"preserve\">{}</t></si>", s))
                    .collect();
                part(
                    "xl/sharedStrings.xml",
                    &format!(
                        r#"<?xml version="1.0"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{}</sst>"#,
                        items
                    ),
                );
            }
            if let Some(styles) = &self.styles {
                part("xl/styles.xml", styles);
            }

            for (i, (_, rows)) in self.sheets.iter().enumerate() {
                part(
                    &format!("xl/worksheets/sheet{}.xml", i + 1),
                    &format!(
                        r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                        rows
                    ),
                );
            }
            zip.finish().unwrap();
        }
        buf
    }
}

/// Decode every row of one sheet.
pub fn read_rows(bytes: Vec<u8>, sheet: usize) -> XlsxResult<Vec<RawRow>> {
    let mut workbook = XlsxWorkbook::open(Cursor::new(bytes))?;
    let rows = workbook.sheet_rows(sheet)?;
    let decoded = match rows {
        Some(rows) => rows.collect(),
        None => Ok(Vec::new()),
    };
    decoded
}

/// `(column, text)` pairs of a row.
pub fn cells(row: &RawRow) -> Vec<(u16, String)> {
    row.cells().map(|(c, t)| (c, t.to_string())).collect()
}
