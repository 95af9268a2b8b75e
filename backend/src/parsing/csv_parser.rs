use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{AnalyticsError, AnalyticsResult, ErrorContext};

/// Delimited text parsed into header names and string rows.
///
/// Every row has exactly `headers.len()` fields: short rows are padded with
/// empty strings and surplus fields are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut fields: Vec<String>) {
        fields.resize(self.headers.len(), String::new());
        self.rows.push(fields);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a header, matched verbatim.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Value of `column` in row `row`; `None` if either does not exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Overwrite a cell. Unknown columns are appended to the header.
    pub fn set(&mut self, row: usize, column: &str, value: impl Into<String>) {
        let idx = match self.column_index(column) {
            Some(idx) => idx,
            None => {
                self.headers.push(column.to_string());
                for r in &mut self.rows {
                    r.push(String::new());
                }
                self.headers.len() - 1
            }
        };
        if let Some(r) = self.rows.get_mut(row) {
            r[idx] = value.into();
        }
    }

    /// Row as a column-name → value map.
    pub fn row_map(&self, row: usize) -> Option<HashMap<&str, &str>> {
        let fields = self.rows.get(row)?;
        Some(
            self.headers
                .iter()
                .map(String::as_str)
                .zip(fields.iter().map(String::as_str))
                .collect(),
        )
    }

    /// Serialize back to CSV, header first, quoting as needed.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
        writer
            .write_record(&self.headers)
            .context("Failed to write CSV header")?;
        for (i, row) in self.rows.iter().enumerate() {
            writer
                .write_record(row)
                .with_context(|| format!("Failed to write CSV row {}", i))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e))?;
        String::from_utf8(bytes).context("CSV output is not valid UTF-8")
    }

    /// Write the table as CSV to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> AnalyticsResult<()> {
        let context = || ErrorContext::new("write_table").with_entity(path.display().to_string());
        let csv = self
            .to_csv()
            .map_err(|e| AnalyticsError::write_with_context(format!("{:#}", e), context()))?;
        fs::write(path, csv)
            .map_err(|e| AnalyticsError::write_with_context(e.to_string(), context()))?;
        log::debug!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }
}

/// Parse delimited text with a header line.
///
/// Quoted fields may contain the delimiter, newlines and doubled quotes.
/// Empty input, or input without a header line, yields an empty table and a
/// warning. Rows the reader cannot decode are skipped; everything else is
/// mapped best-effort.
pub fn parse_rows(text: &str) -> RawTable {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();

    let headers: Vec<String> = match records.next() {
        Some(Ok(header)) => header.iter().map(str::to_string).collect(),
        Some(Err(e)) => {
            log::warn!("Dataset header line could not be read: {}", e);
            return RawTable::default();
        }
        None => {
            log::warn!("Dataset is empty: no header line");
            return RawTable::default();
        }
    };

    if headers.iter().all(|h| h.trim().is_empty()) {
        log::warn!("Dataset header line is blank");
        return RawTable::default();
    }

    let mut table = RawTable::new(headers);
    for (line, result) in records.enumerate() {
        match result {
            Ok(record) => table.push_row(record.iter().map(str::to_string).collect()),
            Err(e) => log::debug!("Skipping unreadable row {}: {}", line + 1, e),
        }
    }

    log::debug!(
        "Parsed {} rows with {} columns",
        table.len(),
        table.headers().len()
    );
    table
}

#[cfg(test)]
#[path = "csv_parser_tests.rs"]
mod csv_parser_tests;
