//! Prelude module - common imports for sheet-stream users
//!
//! ```rust
//! use sheet_stream::prelude::*;
//! ```

pub use crate::{
    BindingResult, BoxError, Error, FieldBindings, FromCell, RawRow, Result, SheetReader,
    SheetRecord,
};
