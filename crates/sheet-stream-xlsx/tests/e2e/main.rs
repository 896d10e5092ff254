//! End-to-end tests for sheet-stream-xlsx.
//!
//! Each test builds the package it needs in memory (or in a temp file) with
//! `zip::ZipWriter`, opens it with `XlsxWorkbook` and asserts on the decoded
//! rows.

mod common;
mod reading;

// Re-export common utilities for submodules
pub use common::*;
