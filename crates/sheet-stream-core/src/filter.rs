//! Caller-supplied predicates applied before and after mapping.

use crate::error::BoxError;
use crate::row::RawRow;

type RowFn = dyn Fn(&RawRow) -> Result<bool, BoxError> + Send + Sync;
type RecordFn<T> = dyn Fn(&T) -> Result<bool, BoxError> + Send + Sync;

/// Predicate on an undecoded row. Returning `false` drops the row before mapping.
pub struct RowPredicate(Box<RowFn>);

impl RowPredicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&RawRow) -> bool + Send + Sync + 'static,
    {
        Self(Box::new(move |row| Ok(f(row))))
    }

    /// A predicate that may fail; the error aborts the read.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(&RawRow) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        Self(Box::new(f))
    }

    pub fn test(&self, row: &RawRow) -> Result<bool, BoxError> {
        (self.0)(row)
    }
}

impl std::fmt::Debug for RowPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RowPredicate(..)")
    }
}

/// Predicate on a mapped record. Returning `false` drops the record before it
/// reaches the sink.
pub struct RecordPredicate<T>(Box<RecordFn<T>>);

impl<T: 'static> RecordPredicate<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self(Box::new(move |record: &T| Ok(f(record))))
    }

    /// A predicate that may fail; the error aborts the read.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(&T) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        Self(Box::new(f))
    }
}

impl<T> RecordPredicate<T> {
    pub fn test(&self, record: &T) -> Result<bool, BoxError> {
        (self.0)(record)
    }
}

impl<T> std::fmt::Debug for RecordPredicate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RecordPredicate(..)")
    }
}

/// The pair of optional predicates for one read call. An absent predicate
/// accepts everything.
#[derive(Debug)]
pub struct FilterPipeline<'p, T> {
    row: Option<&'p RowPredicate>,
    record: Option<&'p RecordPredicate<T>>,
}

impl<'p, T> FilterPipeline<'p, T> {
    pub fn new(row: Option<&'p RowPredicate>, record: Option<&'p RecordPredicate<T>>) -> Self {
        Self { row, record }
    }

    /// Pipeline with no predicates
    pub fn accept_all() -> Self {
        Self {
            row: None,
            record: None,
        }
    }

    pub fn accept_row(&self, row: &RawRow) -> Result<bool, BoxError> {
        match self.row {
            Some(p) => p.test(row),
            None => Ok(true),
        }
    }

    pub fn accept_record(&self, record: &T) -> Result<bool, BoxError> {
        match self.record {
            Some(p) => p.test(record),
            None => Ok(true),
        }
    }
}
