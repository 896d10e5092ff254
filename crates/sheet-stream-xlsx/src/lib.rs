//! # sheet-stream-xlsx
//!
//! Streaming XLSX (Office Open XML) row decoder for sheet-stream.
//!
//! [`XlsxWorkbook`] opens the package and loads the workbook-level parts
//! (shared strings, number formats, sheet list). [`XlsxWorkbook::sheet_rows`]
//! then decodes a single worksheet lazily, one [`RawRow`](sheet_stream_core::RawRow)
//! per `<row>` element.

pub mod error;
pub mod reader;

mod escape;
mod styles;

pub use error::{XlsxError, XlsxResult};
pub use reader::{SheetRows, XlsxWorkbook};
