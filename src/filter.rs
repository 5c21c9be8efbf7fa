use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use regex::{Regex, RegexBuilder};
use tempfile::NamedTempFile;

use crate::config::FilterConfig;
use crate::data::{is_absent, normalize_headers, pad_record, parent_dir};
use crate::filter::error::FilterError;

pub mod error;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSummary {
    pub rows_read: u64,
    pub rows_matched: u64,
    pub chunks: u64,
    /// Set only when at least one row matched and the file was written.
    pub output: Option<PathBuf>,
}

/// Case-insensitive substring match over a fixed set of address columns.
#[derive(Debug)]
pub struct AddressMatcher {
    pattern: Regex,
    columns: Vec<String>,
}

impl AddressMatcher {
    pub fn new(needle: &str, columns: &[String]) -> Result<AddressMatcher, FilterError> {
        if needle.is_empty() {
            return Err(FilterError::InvalidConfig("needle must not be empty".into()));
        }
        let pattern = RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(true)
            .build()
            .map_err(|err| FilterError::InvalidConfig(err.to_string()))?;

        Ok(AddressMatcher {
            pattern,
            columns: columns.iter().map(|c| c.trim().to_owned()).collect(),
        })
    }

    /// Positions of the candidate columns that are present in `headers`.
    pub fn available_columns(&self, headers: &[String]) -> Vec<usize> {
        self.columns
            .iter()
            .filter_map(|name| headers.iter().position(|h| h == name))
            .collect()
    }

    pub fn matches(&self, row: &[String], available: &[usize]) -> bool {
        available.iter().any(|&index| {
            row.get(index)
                .map(String::as_str)
                .filter(|value| !is_absent(value))
                .map_or(false, |value| self.pattern.is_match(value))
        })
    }
}

/// Copies the rows of `config.input` whose address columns contain
/// `config.needle` into `config.output`. Nothing is written when no row
/// matches.
pub fn filter_companies(
    config: &FilterConfig,
    progress_bar: &ProgressBar,
) -> Result<FilterSummary, FilterError> {
    if config.chunk_size == 0 {
        return Err(FilterError::InvalidConfig("chunk size must be positive".into()));
    }
    let matcher = AddressMatcher::new(&config.needle, &config.columns)?;

    let file = File::open(&config.input)?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = normalize_headers(reader.headers()?);
    let available = matcher.available_columns(&headers);
    if available.is_empty() {
        warn!("No address columns found in {}", config.input.display());
    }

    let mut summary = FilterSummary {
        rows_read: 0,
        rows_matched: 0,
        chunks: 0,
        output: None,
    };
    let mut writer: Option<csv::Writer<NamedTempFile>> = None;
    let mut records = reader.records();

    loop {
        let chunk = records
            .by_ref()
            .take(config.chunk_size)
            .collect::<Result<Vec<StringRecord>, csv::Error>>()?;
        if chunk.is_empty() {
            break;
        }
        summary.chunks += 1;
        summary.rows_read += chunk.len() as u64;
        debug!("Columns available in chunk {}: {:?}", summary.chunks, headers);

        if available.is_empty() {
            progress_bar.inc(chunk.len() as u64);
            continue;
        }

        for record in &chunk {
            let row = pad_record(record, headers.len())?;
            if !matcher.matches(&row, &available) {
                continue;
            }
            if writer.is_none() {
                writer = Some(open_output(&config.output, &headers)?);
            }
            if let Some(out) = writer.as_mut() {
                out.write_record(&row)?;
                summary.rows_matched += 1;
            }
        }
        progress_bar.inc(chunk.len() as u64);
    }

    match writer {
        Some(out) => {
            let file = out.into_inner().map_err(|err| err.into_error())?;
            file.persist(&config.output)?;
            info!(
                "Filtered {} of {} rows into {}",
                summary.rows_matched,
                summary.rows_read,
                config.output.display()
            );
            summary.output = Some(config.output.clone());
        }
        None => info!("No matching data found in {}", config.input.display()),
    }

    Ok(summary)
}

fn open_output(
    output: &Path,
    headers: &[String],
) -> Result<csv::Writer<NamedTempFile>, FilterError> {
    let mut writer = csv::Writer::from_writer(NamedTempFile::new_in(parent_dir(output))?);
    writer.write_record(headers)?;
    Ok(writer)
}
