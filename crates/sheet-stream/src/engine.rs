//! The decode loop shared by both containers.

use sheet_stream_core::{ConsumptionSink, FilterPipeline, RawRow, RecordMapper};

use crate::error::{Error, Result};

/// Counters reported in the per-read summary line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReadStats {
    /// Rows produced by the decoder
    pub rows: usize,
    /// Records handed to the sink
    pub delivered: usize,
}

/// Pull rows until the decoder is exhausted, filtering, mapping and sinking
/// each one before the next is decoded.
pub(crate) fn drive<T, I, E>(
    rows: I,
    filters: &FilterPipeline<'_, T>,
    mapper: &RecordMapper<'_, T>,
    sink: &mut ConsumptionSink<'_, T>,
) -> Result<ReadStats>
where
    T: Default,
    I: Iterator<Item = std::result::Result<RawRow, E>>,
    Error: From<E>,
{
    let mut stats = ReadStats::default();
    for row in rows {
        let row = row?;
        stats.rows += 1;

        if !filters.accept_row(&row).map_err(Error::Predicate)? {
            continue;
        }
        let record = mapper.map(&row);
        if !filters.accept_record(&record).map_err(Error::Predicate)? {
            continue;
        }
        sink.accept(record).map_err(Error::Handler)?;
        stats.delivered += 1;
    }
    Ok(stats)
}
