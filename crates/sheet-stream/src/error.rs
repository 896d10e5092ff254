//! Error types for sheet-stream

use sheet_stream_core::BoxError;
use sheet_stream_xls::XlsError;
use sheet_stream_xlsx::XlsxError;
use thiserror::Error;

/// Result type for read calls
pub type Result<T> = std::result::Result<T, Error>;

/// The single failure surfaced by a read call
#[derive(Debug, Error)]
pub enum Error {
    /// The XLSX container could not be opened or its rows could not be decoded
    #[error(transparent)]
    Xlsx(#[from] XlsxError),

    /// The XLS container could not be opened or its rows could not be decoded
    #[error(transparent)]
    Xls(#[from] XlsError),

    /// IO error while opening or sniffing the source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The record shape's binding table could not be built
    #[error("Invalid record bindings: {0}")]
    Binding(#[from] sheet_stream_core::Error),

    /// A row or record predicate returned an error
    #[error("Filter predicate failed: {0}")]
    Predicate(#[source] BoxError),

    /// A fallible record handler returned an error
    #[error("Record handler failed: {0}")]
    Handler(#[source] BoxError),

    /// The source is not a spreadsheet container we can read
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
