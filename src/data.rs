use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::StringRecord;
use log::debug;
use tempfile::NamedTempFile;

use crate::data::error::DataError;

pub mod error;

/// In-memory copy of a CSV file: trimmed header names plus every row padded
/// to the header width.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Pandas-style null check: an empty or whitespace-only field carries no value.
pub fn is_absent(value: &str) -> bool {
    value.trim().is_empty()
}

/// Reads a coordinate cell. Anything that is not a finite number is treated as
/// missing so the row gets looked up again.
pub fn parse_coordinate(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

pub fn normalize_headers(record: &StringRecord) -> Vec<String> {
    record.iter().map(|h| h.trim().to_owned()).collect()
}

/// Directory a file lives in, `.` for bare file names. Temporary files are
/// created there so the final rename stays on one filesystem.
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Pads a short record with empty fields. A record wider than the header is
/// rejected since there is no column to put the extra fields in.
pub fn pad_record(
    record: &StringRecord,
    width: usize,
) -> Result<Vec<String>, DataError> {
    if record.len() > width {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        return Err(DataError::RaggedRow { line, expected: width, found: record.len() });
    }
    let mut fields: Vec<String> = record.iter().map(str::to_owned).collect();
    fields.resize(width, String::new());
    Ok(fields)
}

impl Dataset {
    #[cfg(test)]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Dataset {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Dataset { headers, rows }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset, DataError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Dataset::from_reader(file)?;
        debug!(
            "Loaded {} rows and {} columns from {}",
            dataset.len(),
            dataset.headers.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Dataset, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = normalize_headers(reader.headers()?);
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(pad_record(&record?, headers.len())?);
        }
        Ok(Dataset { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> &[String] {
        &self.rows[index]
    }

    /// Index of a column, comparing trimmed names.
    pub fn column(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h == name)
    }

    /// Returns the index of `name`, appending it as an all-empty column first
    /// if the dataset doesn't have it yet.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.column(name) {
            return index;
        }
        self.headers.push(name.trim().to_owned());
        for row in self.rows.iter_mut() {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.rows[row]
            .get(column)
            .map(String::as_str)
            .filter(|v| !is_absent(v))
    }

    pub fn set_value(&mut self, row: usize, column: usize, value: Option<String>) {
        self.rows[row][column] = value.unwrap_or_default();
    }

    /// Writes the header and the first `count` rows.
    pub fn write_prefix<W: Write>(
        &self,
        writer: &mut csv::Writer<W>,
        count: usize,
    ) -> Result<(), DataError> {
        writer.write_record(&self.headers)?;
        for row in self.rows.iter().take(count) {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Overwrites `path` with the header and the first `count` rows. The rows
    /// go to a temporary file in the same directory which is then renamed over
    /// `path`, so readers never see a half-written file.
    pub fn save_prefix<P: AsRef<Path>>(&self, path: P, count: usize) -> Result<(), DataError> {
        let path = path.as_ref();
        let mut file = NamedTempFile::new_in(parent_dir(path))?;
        {
            let mut writer = csv::Writer::from_writer(file.as_file_mut());
            self.write_prefix(&mut writer, count)?;
        }
        file.persist(path)?;
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DataError> {
        self.save_prefix(path, self.rows.len())
    }
}
