use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::cmi5::tools::error::{Result, ToolError};
use crate::cmi5::tools::model::Row;

/// Lazy, single-pass stream of rows from a CSV document whose first line is
/// the header row.
///
/// Records are yielded in file order. The first malformed record ends the
/// stream with an error; nothing is yielded after it.
pub struct RowSource<R: Read> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    record: StringRecord,
    finished: bool,
}

impl RowSource<File> {
    /// Opens the CSV file at `path` and reads its header row.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read> RowSource<R> {
    /// Wraps an arbitrary reader and reads its header row.
    pub fn from_reader(input: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut seen = HashSet::new();
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(ToolError::InvalidCsv {
                    line: 1,
                    message: format!("duplicate header '{header}'"),
                });
            }
        }
        debug!(column_count = headers.len(), "read CSV header row");

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
            finished: false,
        })
    }

    /// Header names in column order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn current_row(&self) -> Result<Row> {
        if self.record.len() > self.headers.len() {
            let line = self
                .record
                .position()
                .map(|position| position.line())
                .unwrap_or_default();
            return Err(ToolError::InvalidCsv {
                line,
                message: format!(
                    "expected {} columns but found {}",
                    self.headers.len(),
                    self.record.len()
                ),
            });
        }

        Ok(self
            .headers
            .iter()
            .zip(self.record.iter())
            .map(|(header, value)| (header.as_str(), value))
            .collect())
    }
}

impl<R: Read> Iterator for RowSource<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = match self.reader.read_record(&mut self.record) {
            Ok(true) => self.current_row(),
            Ok(false) => {
                self.finished = true;
                return None;
            }
            Err(error) => Err(ToolError::from(error)),
        };

        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}
