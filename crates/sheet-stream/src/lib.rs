//! # sheet-stream
//!
//! Stream one sheet of an Excel workbook into typed records, row by row,
//! without loading the document into memory.
//!
//! ## Features
//!
//! - XLSX (Office Open XML) and legacy XLS (BIFF8) input, detected from the
//!   first bytes of the source
//! - Column-to-field binding by index or column letters
//! - Row-level and record-level filters
//! - Collect all records, or hand each one to a callback as it is decoded
//!
//! ## Example
//!
//! ```rust,no_run
//! use sheet_stream::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! impl SheetRecord for Person {
//!     fn bindings() -> BindingResult<FieldBindings<Self>> {
//!         Ok(FieldBindings::<Self>::new()
//!             .bind(0, "name", |p: &mut Person, v: String| p.name = v)
//!             .bind(1, "age", |p: &mut Person, v: u32| p.age = v))
//!     }
//! }
//!
//! // Skip the header row and print everyone else as they are decoded
//! SheetReader::<Person>::new()
//!     .row_filter(|row| row.index() > 0)
//!     .read_path_then("people.xls", |p| println!("{} is {}", p.name, p.age))
//!     .unwrap();
//! ```

pub mod dispatcher;
pub mod error;
pub mod prelude;
pub mod reader;

mod engine;

pub use dispatcher::ContainerKind;
pub use error::{Error, Result};
pub use reader::SheetReader;

// Re-export core types
pub use sheet_stream_core::{
    BoxError, CoerceError, DateSystem, Error as BindingError, FieldBindings, FromCell, RawRow,
    Result as BindingResult, SheetRecord,
};

// Re-export the container decoders
pub use sheet_stream_xls::{XlsError, XlsWorkbook};
pub use sheet_stream_xlsx::{XlsxError, XlsxWorkbook};
