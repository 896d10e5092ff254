//! # sheet-stream-core
//!
//! Format-independent pieces of the sheet-stream decoding engine.
//!
//! - [`RawRow`] - One physical row as sparse `(column, text)` pairs
//! - [`FieldBindings`] and [`RecordMapper`] - Column-to-field binding of rows onto records
//! - [`FilterPipeline`] - Row- and record-level predicates
//! - [`ConsumptionSink`] - Collect records or forward them to a handler
//! - [`NumberFormat`] - Best-effort rendering of numeric cells to display text
//!
//! ## Example
//!
//! ```rust
//! use sheet_stream_core::{FieldBindings, RawRow, RecordMapper, SheetRecord};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! impl SheetRecord for Person {
//!     fn bindings() -> sheet_stream_core::Result<FieldBindings<Self>> {
//!         FieldBindings::<Self>::new()
//!             .bind(0, "name", |p: &mut Person, v: String| p.name = v)
//!             .bind_letters("B", "age", |p: &mut Person, v: u32| p.age = v)
//!     }
//! }
//!
//! let bindings = Person::bindings().unwrap();
//! let mapper = RecordMapper::new(&bindings);
//!
//! let mut row = RawRow::new(1);
//! row.push(0, "Alice");
//! row.push(1, "42");
//!
//! let person = mapper.map(&row);
//! assert_eq!(person, Person { name: "Alice".into(), age: 42 });
//! ```

pub mod address;
pub mod binding;
pub mod cell;
pub mod error;
pub mod filter;
pub mod format;
pub mod mapper;
pub mod row;
pub mod sink;

pub use binding::{FieldBinding, FieldBindings, SheetRecord};
pub use cell::{CoerceError, FromCell};
pub use error::{BoxError, Error, Result};
pub use filter::{FilterPipeline, RecordPredicate, RowPredicate};
pub use format::{DateSystem, NumberFormat};
pub use mapper::RecordMapper;
pub use row::RawRow;
pub use sink::ConsumptionSink;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
