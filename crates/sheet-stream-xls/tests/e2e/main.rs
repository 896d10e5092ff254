//! End-to-end tests for sheet-stream-xls.
//!
//! Each test assembles a BIFF8 `Workbook` stream record by record, wraps it
//! in a compound file with `cfb`, opens it with `XlsWorkbook` and asserts on
//! the decoded rows.


// Re-export common utilities for submodules
pub use common::*;
