//! Read rows out of delimited text sources whose first line names the columns.

use crate::core::Row;
use crate::{ProcessError, ProcessResult};

/// The CSV reader configuration used for every input source.
///
/// Rows may hold fewer or more cells than the header, checking for required columns is left to
/// the consumer of each [Row].
pub fn configured_csv_reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers);
    builder
}

/// An iterator of [Row] read from a CSV source.
///
/// Records are paired with the header by hand rather than through `into_deserialize`: trailing
/// cells missing from a short row are simply absent from its [Row], cells past the last column
/// are dropped, and cell text is kept untrimmed.
pub struct CsvSource<R> {
    headers: csv::StringRecord,
    records: csv::StringRecordsIntoIter<R>,
}

impl CsvSource<std::fs::File> {
    /// Open the CSV file at `path`, reporting a missing file as [ProcessError::SourceNotFound].
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> ProcessResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => ProcessError::SourceNotFound(path.to_path_buf()),
            _ => ProcessError::Io(err),
        })?;
        Self::from_reader(file)
    }
}

impl<R: std::io::Read> CsvSource<R> {
    pub fn from_reader(reader: R) -> ProcessResult<Self> {
        let mut reader = configured_csv_reader_builder().from_reader(reader);
        let headers = reader.headers()?.clone();
        Ok(Self {
            headers,
            records: reader.into_records(),
        })
    }

    /// Column names, as given by the header line.
    pub fn headers(&self) -> &csv::StringRecord {
        &self.headers
    }
}

impl<R: std::io::Read> Iterator for CsvSource<R> {
    type Item = ProcessResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.records.next()?.map_err(ProcessError::from).map(|record| {
            self.headers
                .iter()
                .zip(record.iter())
                .map(|(column, cell)| (column.to_owned(), cell.to_owned()))
                .collect()
        });
        Some(row)
    }
}
