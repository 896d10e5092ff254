//! # sheet-stream-xls
//!
//! Streaming XLS (BIFF8) row decoder for sheet-stream.
//!
//! This crate handles the legacy Excel binary format (.xls): a BIFF8
//! `Workbook` stream inside an OLE2 compound file. [`XlsWorkbook`] reads the
//! workbook globals (shared strings, formats, sheet list) and seeks straight
//! to the selected sheet's substream when its rows are requested.

pub mod biff;
pub mod error;
pub mod reader;

mod formats;

pub use error::{XlsError, XlsResult};
pub use reader::{XlsRows, XlsWorkbook};
