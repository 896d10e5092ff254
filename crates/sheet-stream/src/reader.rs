//! The configurable entry point for reading one sheet into records.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::time::Instant;

use sheet_stream_core::{
    BoxError, ConsumptionSink, FilterPipeline, RawRow, RecordMapper, RecordPredicate, RowPredicate,
    SheetRecord,
};
use sheet_stream_xls::XlsWorkbook;
use sheet_stream_xlsx::XlsxWorkbook;

use crate::dispatcher::ContainerKind;
use crate::engine::{self, ReadStats};
use crate::error::Result;

/// Reads one sheet of a workbook into records of type `T`.
///
/// A reader is plain configuration: each read call opens its own workbook
/// session, so one reader can serve many reads, including from several
/// threads at once.
///
/// ```rust,no_run
/// use sheet_stream::{FieldBindings, SheetReader, SheetRecord};
///
/// #[derive(Debug, Default)]
/// struct Order {
///     id: u32,
///     customer: String,
///     total: f64,
/// }
///
/// impl SheetRecord for Order {
///     fn bindings() -> sheet_stream::BindingResult<FieldBindings<Self>> {
///         FieldBindings::<Self>::new()
///             .bind_letters("A", "id", |o: &mut Order, v: u32| o.id = v)?
///             .bind_letters("B", "customer", |o: &mut Order, v: String| o.customer = v)?
///             .bind_letters("D", "total", |o: &mut Order, v: f64| o.total = v)
///     }
/// }
///
/// # fn main() -> sheet_stream::Result<()> {
/// let orders = SheetReader::<Order>::new()
///     .sheet(1)
///     .row_filter(|row| row.index() > 0)
///     .record_filter(|o| o.total > 0.0)
///     .read_path("orders.xlsx")?;
/// println!("{} orders", orders.len());
/// # Ok(())
/// # }
/// ```
pub struct SheetReader<T> {
    sheet: usize,
    row_filter: Option<RowPredicate>,
    record_filter: Option<RecordPredicate<T>>,
}

impl<T: SheetRecord> SheetReader<T> {
    /// A reader for the first sheet with no filters.
    pub fn new() -> Self {
        Self {
            sheet: 0,
            row_filter: None,
            record_filter: None,
        }
    }

    /// Select the worksheet by 0-based position.
    pub fn sheet(mut self, index: usize) -> Self {
        self.sheet = index;
        self
    }

    /// Keep only rows for which `f` returns `true`. Runs before mapping.
    pub fn row_filter<F>(mut self, f: F) -> Self
    where
        F: Fn(&RawRow) -> bool + Send + Sync + 'static,
    {
        self.row_filter = Some(RowPredicate::new(f));
        self
    }

    /// Like [`row_filter`](Self::row_filter); an `Err` aborts the read.
    pub fn try_row_filter<F, E>(mut self, f: F) -> Self
    where
        F: Fn(&RawRow) -> std::result::Result<bool, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.row_filter = Some(RowPredicate::fallible(move |row| f(row).map_err(Into::into)));
        self
    }

    /// Keep only records for which `f` returns `true`. Runs after mapping.
    pub fn record_filter<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.record_filter = Some(RecordPredicate::new(f));
        self
    }

    /// Like [`record_filter`](Self::record_filter); an `Err` aborts the read.
    pub fn try_record_filter<F, E>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<bool, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.record_filter = Some(RecordPredicate::fallible(move |record: &T| {
            f(record).map_err(Into::into)
        }));
        self
    }

    /// Read every surviving record of the selected sheet, in row order.
    ///
    /// The container is detected from the first bytes of `source`.
    pub fn read<R: Read + Seek>(&self, mut source: R) -> Result<Vec<T>> {
        let kind = ContainerKind::sniff(&mut source)?;
        self.collect(source, kind)
    }

    /// Read from a source known to be an XLSX package.
    pub fn read_xlsx<R: Read + Seek>(&self, source: R) -> Result<Vec<T>> {
        self.collect(source, ContainerKind::Xlsx)
    }

    /// Read from a source known to be an XLS compound file.
    pub fn read_xls<R: Read + Seek>(&self, source: R) -> Result<Vec<T>> {
        self.collect(source, ContainerKind::Xls)
    }

    /// Hand each surviving record to `handler` as soon as its row is decoded.
    ///
    /// Nothing is retained. On failure the records already handed over stay
    /// handed over.
    pub fn read_then<R, F>(&self, mut source: R, mut handler: F) -> Result<()>
    where
        R: Read + Seek,
        F: FnMut(T),
    {
        let kind = ContainerKind::sniff(&mut source)?;
        let mut forward = |record: T| -> std::result::Result<(), BoxError> {
            handler(record);
            Ok(())
        };
        self.forward(source, kind, &mut forward)
    }

    /// Like [`read_then`](Self::read_then); a handler `Err` aborts the read.
    pub fn try_read_then<R, F, E>(&self, mut source: R, mut handler: F) -> Result<()>
    where
        R: Read + Seek,
        F: FnMut(T) -> std::result::Result<(), E>,
        E: Into<BoxError>,
    {
        let kind = ContainerKind::sniff(&mut source)?;
        let mut forward = |record: T| -> std::result::Result<(), BoxError> {
            handler(record).map_err(Into::into)
        };
        self.forward(source, kind, &mut forward)
    }

    /// Read a file. A `.xls` name goes straight to the XLS decoder; every
    /// other name, `.xlsx` included, is sniffed.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<T>> {
        let (file, kind) = open_path(path.as_ref())?;
        self.collect(file, kind)
    }

    /// Streaming variant of [`read_path`](Self::read_path).
    pub fn read_path_then<P, F>(&self, path: P, mut handler: F) -> Result<()>
    where
        P: AsRef<Path>,
        F: FnMut(T),
    {
        let (file, kind) = open_path(path.as_ref())?;
        let mut forward = |record: T| -> std::result::Result<(), BoxError> {
            handler(record);
            Ok(())
        };
        self.forward(file, kind, &mut forward)
    }

    fn collect<R: Read + Seek>(&self, source: R, kind: ContainerKind) -> Result<Vec<T>> {
        let mut sink = ConsumptionSink::collect();
        self.run(source, kind, &mut sink)?;
        Ok(sink.into_records())
    }

    fn forward<R: Read + Seek>(
        &self,
        source: R,
        kind: ContainerKind,
        handler: &mut dyn FnMut(T) -> std::result::Result<(), BoxError>,
    ) -> Result<()> {
        let mut sink = ConsumptionSink::forward(handler);
        self.run(source, kind, &mut sink)
    }

    fn run<R: Read + Seek>(
        &self,
        source: R,
        kind: ContainerKind,
        sink: &mut ConsumptionSink<'_, T>,
    ) -> Result<()> {
        let started = Instant::now();

        let bindings = T::bindings()?;
        let mapper = RecordMapper::new(&bindings);
        let filters = FilterPipeline::new(self.row_filter.as_ref(), self.record_filter.as_ref());

        let stats = match kind {
            ContainerKind::Xlsx => {
                let mut workbook = XlsxWorkbook::open(source)?;
                let rows = workbook.sheet_rows(self.sheet)?;
                let stats = match rows {
                    Some(rows) => engine::drive(rows, &filters, &mapper, sink)?,
                    None => ReadStats::default(),
                };
                stats
            }
            ContainerKind::Xls => {
                let mut workbook = XlsWorkbook::open(source)?;
                let rows = workbook.sheet_rows(self.sheet)?;
                let stats = match rows {
                    Some(rows) => engine::drive(rows, &filters, &mapper, sink)?,
                    None => ReadStats::default(),
                };
                stats
            }
        };

        log::info!(
            "{:?} sheet {} read in {} ms: {} rows decoded, {} records delivered",
            kind,
            self.sheet,
            started.elapsed().as_millis(),
            stats.rows,
            stats.delivered
        );
        Ok(())
    }
}

fn open_path(path: &Path) -> Result<(BufReader<File>, ContainerKind)> {
    let mut file = BufReader::new(File::open(path)?);
    let kind = match ContainerKind::for_path(path) {
        Some(kind) => kind,
        None => ContainerKind::sniff(&mut file)?,
    };
    Ok((file, kind))
}

impl<T: SheetRecord> Default for SheetReader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SheetReader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetReader")
            .field("sheet", &self.sheet)
            .field("row_filter", &self.row_filter)
            .field("record_filter", &self.record_filter)
            .finish()
    }
}
