//! Mapping of decoded rows onto typed records.

use crate::binding::FieldBindings;
use crate::row::RawRow;

/// Applies a [`FieldBindings`] table to rows.
///
/// A cell whose text cannot be converted for its field is skipped: the field
/// keeps its default and the remaining cells are still applied. Unbound
/// columns are ignored.
#[derive(Debug)]
pub struct RecordMapper<'b, T> {
    bindings: &'b FieldBindings<T>,
}

impl<'b, T: Default> RecordMapper<'b, T> {
    pub fn new(bindings: &'b FieldBindings<T>) -> Self {
        Self { bindings }
    }

    /// Build a record from one row.
    pub fn map(&self, row: &RawRow) -> T {
        let mut record = T::default();
        for (col, text) in row.cells() {
            let Some(binding) = self.bindings.get(col) else {
                continue;
            };
            if let Err(e) = binding.apply(&mut record, text) {
                log::debug!(
                    "row {} column {}: field '{}' left at default: {}",
                    row.index() + 1,
                    col,
                    binding.name(),
                    e
                );
            }
        }
        record
    }
}
