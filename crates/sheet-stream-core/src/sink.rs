//! Destination of accepted records.

use crate::error::BoxError;

/// Where accepted records go: an in-order collection or a caller handler.
///
/// A handler error stops the read; records already forwarded stay delivered.
pub enum ConsumptionSink<'h, T> {
    /// Accumulate records in emission order
    Collect(Vec<T>),
    /// Hand each record to the caller as it is produced
    Forward(&'h mut dyn FnMut(T) -> Result<(), BoxError>),
}

impl<'h, T> ConsumptionSink<'h, T> {
    pub fn collect() -> Self {
        ConsumptionSink::Collect(Vec::new())
    }

    pub fn forward(handler: &'h mut dyn FnMut(T) -> Result<(), BoxError>) -> Self {
        ConsumptionSink::Forward(handler)
    }

    /// Deliver one record
    pub fn accept(&mut self, record: T) -> Result<(), BoxError> {
        match self {
            ConsumptionSink::Collect(records) => {
                records.push(record);
                Ok(())
            }
            ConsumptionSink::Forward(handler) => (*handler)(record),
        }
    }

    /// Collected records; always empty for a forwarding sink.
    pub fn into_records(self) -> Vec<T> {
        match self {
            ConsumptionSink::Collect(records) => records,
            ConsumptionSink::Forward(_) => Vec::new(),
        }
    }
}

impl<T> std::fmt::Debug for ConsumptionSink<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsumptionSink::Collect(records) => {
                f.debug_tuple("Collect").field(&records.len()).finish()
            }
            ConsumptionSink::Forward(_) => f.write_str("Forward(..)"),
        }
    }
}
