//! Column-to-field binding tables.
//!
//! A record shape declares, once, which column feeds which field and how the
//! cell text is converted. The resulting [`FieldBindings`] is immutable and is
//! shared read-only by every row of a read call.

use ahash::AHashMap;

use crate::address::letters_to_column;
use crate::cell::{CoerceError, FromCell};
use crate::error::{Error, Result};

/// A record shape that rows can be decoded into.
///
/// Fields without a bound column (or whose column is absent from a row) keep
/// the value from [`Default`].
pub trait SheetRecord: Default + 'static {
    /// Build the binding table for this shape.
    fn bindings() -> Result<FieldBindings<Self>>;
}

type Setter<T> = Box<dyn Fn(&mut T, &str) -> std::result::Result<(), CoerceError> + Send + Sync>;

/// One column's binding: the target field's name and its typed setter.
pub struct FieldBinding<T> {
    column: u16,
    name: &'static str,
    setter: Setter<T>,
}

impl<T> FieldBinding<T> {
    /// 0-based column index this binding reads from
    pub fn column(&self) -> u16 {
        self.column
    }

    /// Name of the target field
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Convert `text` and assign it to the field.
    ///
    /// On error the record is left unchanged.
    pub fn apply(&self, record: &mut T, text: &str) -> std::result::Result<(), CoerceError> {
        (self.setter)(record, text)
    }
}

impl<T> std::fmt::Debug for FieldBinding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinding")
            .field("column", &self.column)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Immutable column index → field binding table for one record shape.
pub struct FieldBindings<T> {
    by_column: AHashMap<u16, FieldBinding<T>>,
}

impl<T: 'static> FieldBindings<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            by_column: AHashMap::new(),
        }
    }

    /// Bind a 0-based column index to a field.
    ///
    /// Binding the same column twice replaces the earlier binding.
    pub fn bind<V, F>(mut self, column: u16, name: &'static str, set: F) -> Self
    where
        V: FromCell + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let setter: Setter<T> = Box::new(move |record: &mut T, text: &str| {
            let value = V::from_cell(text)?;
            set(record, value);
            Ok(())
        });
        self.by_column.insert(
            column,
            FieldBinding {
                column,
                name,
                setter,
            },
        );
        self
    }

    /// Bind a column given by its letters (`"A"`, `"AB"`) to a field.
    pub fn bind_letters<V, F>(self, letters: &str, name: &'static str, set: F) -> Result<Self>
    where
        V: FromCell + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let column = letters_to_column(letters).map_err(|e| Error::InvalidBinding {
            field: name,
            reason: e.to_string(),
        })?;
        Ok(self.bind(column, name, set))
    }
}

impl<T> FieldBindings<T> {
    /// Look up the binding for a column
    pub fn get(&self, column: u16) -> Option<&FieldBinding<T>> {
        self.by_column.get(&column)
    }

    /// Bound columns in ascending order
    pub fn columns(&self) -> Vec<u16> {
        let mut cols: Vec<u16> = self.by_column.keys().copied().collect();
        cols.sort_unstable();
        cols
    }

    /// Number of bound columns
    pub fn len(&self) -> usize {
        self.by_column.len()
    }

    /// Check if no column is bound
    pub fn is_empty(&self) -> bool {
        self.by_column.is_empty()
    }
}

impl<T: 'static> Default for FieldBindings<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for FieldBindings<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields: Vec<&FieldBinding<T>> = self.by_column.values().collect();
        fields.sort_unstable_by_key(|b| b.column);
        f.debug_list().entries(fields).finish()
    }
}
