//! End-to-end tests for the sheet-stream read API.
//!
//! Workbooks are built in memory: XLSX packages with `zip::ZipWriter`, XLS
//! compound files with `cfb` around hand-assembled BIFF8 records. The same
//! grid can be built in both containers so results can be compared.


// Re-export common utilities for submodules
pub use common::*;
