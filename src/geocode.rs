use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::ProgressBar;
use log::{error, info, warn};

use crate::config::GeocodeConfig;
use crate::data::{parse_coordinate, Dataset};
use crate::geocode::error::GeocodeError;
use crate::geocode::lookup::PostcodeLookup;
use crate::geocode::wait::Wait;

pub mod error;
pub mod lookup;
pub mod wait;

/// Terminal state of a row for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// Both coordinates were already there.
    Skipped,
    Geocoded,
    NoResult,
    /// The lookup failed; treated like `NoResult` and retried on the next run.
    Failed,
    NoPostcode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub handled: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.handled as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeocodeSummary {
    pub total: usize,
    pub skipped: usize,
    pub geocoded: usize,
    pub no_result: usize,
    pub failed: usize,
    pub no_postcode: usize,
    /// Rows whose coordinates came from a previous run's output.
    pub resumed: usize,
    pub output: PathBuf,
}

impl GeocodeSummary {
    fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Skipped => self.skipped += 1,
            RowOutcome::Geocoded => self.geocoded += 1,
            RowOutcome::NoResult => self.no_result += 1,
            RowOutcome::Failed => self.failed += 1,
            RowOutcome::NoPostcode => self.no_postcode += 1,
        }
    }

    /// Number of requests sent to the geocoding service.
    pub fn lookups(&self) -> usize {
        self.geocoded + self.no_result + self.failed
    }
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    postcode: usize,
    latitude: usize,
    longitude: usize,
}

pub struct Geocoder<L, W> {
    client: L,
    wait: W,
    progress: Progress,
    progress_bar: ProgressBar,
}

impl<L: PostcodeLookup, W: Wait> Geocoder<L, W> {
    pub fn new(client: L, wait: W) -> Geocoder<L, W> {
        Geocoder {
            client,
            wait,
            progress: Progress::default(),
            progress_bar: ProgressBar::hidden(),
        }
    }

    pub fn with_progress_bar(mut self, progress_bar: ProgressBar) -> Geocoder<L, W> {
        self.progress_bar = progress_bar;
        self
    }

    pub fn client(&self) -> &L {
        &self.client
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Adds coordinates to every row of `config.input`, rewriting
    /// `config.output` after each row. Rows that already have both
    /// coordinates, either in the input or at the same position in an
    /// earlier output, are not looked up again.
    pub fn run(&mut self, config: &GeocodeConfig) -> Result<GeocodeSummary, GeocodeError> {
        let mut dataset = Dataset::load(&config.input).map_err(GeocodeError::Input)?;
        let postcode = dataset
            .column(&config.postcode_column)
            .ok_or_else(|| GeocodeError::MissingColumn(config.postcode_column.clone()))?;
        let columns = Columns {
            postcode,
            latitude: dataset.ensure_column(&config.latitude_column),
            longitude: dataset.ensure_column(&config.longitude_column),
        };

        let mut summary = GeocodeSummary {
            total: dataset.len(),
            output: config.output.clone(),
            ..GeocodeSummary::default()
        };
        if config.output.exists() && !is_same_file(&config.input, &config.output) {
            summary.resumed = resume_from(&mut dataset, &config.output, columns);
        }

        self.progress = Progress { handled: 0, total: dataset.len() };
        self.progress_bar.set_length(dataset.len() as u64);
        self.progress_bar.set_position(0);

        if dataset.is_empty() {
            dataset.save(&config.output).map_err(GeocodeError::Output)?;
        }

        for index in 0..dataset.len() {
            let outcome = self.process_row(&mut dataset, index, columns, config.delay);
            summary.record(outcome);

            dataset
                .save_prefix(&config.output, index + 1)
                .map_err(GeocodeError::Output)?;

            self.progress.handled = index + 1;
            self.progress_bar.set_position(self.progress.handled as u64);
        }
        self.progress_bar.finish();

        info!("Geocoding complete. Data saved to {}.", config.output.display());
        Ok(summary)
    }

    fn process_row(
        &self,
        dataset: &mut Dataset,
        index: usize,
        columns: Columns,
        delay: Duration,
    ) -> RowOutcome {
        let lat = parse_coordinate(dataset.value(index, columns.latitude));
        let lng = parse_coordinate(dataset.value(index, columns.longitude));
        if lat.is_some() && lng.is_some() {
            return RowOutcome::Skipped;
        }

        let postcode = match dataset.value(index, columns.postcode) {
            Some(postcode) => postcode.trim().to_owned(),
            None => return RowOutcome::NoPostcode,
        };

        let (outcome, coordinates) = match self.client.lookup(&postcode) {
            Ok(Some(coordinates)) => {
                info!(
                    "Geocoded postal code '{}' to ({}, {}).",
                    postcode, coordinates.lat, coordinates.lng
                );
                (RowOutcome::Geocoded, Some(coordinates))
            }
            Ok(None) => {
                warn!("No geocode results for postal code: {}.", postcode);
                (RowOutcome::NoResult, None)
            }
            Err(err) => {
                error!("Error geocoding postal code '{}': {}", postcode, err);
                (RowOutcome::Failed, None)
            }
        };

        dataset.set_value(index, columns.latitude, coordinates.map(|c| c.lat.to_string()));
        dataset.set_value(index, columns.longitude, coordinates.map(|c| c.lng.to_string()));
        self.wait.wait(delay);
        outcome
    }
}

/// Copies coordinates from an earlier output into rows of `dataset` that
/// lack them. A row is only taken over when every other field is identical
/// at the same position. Returns the number of rows filled in.
fn resume_from(dataset: &mut Dataset, output: &Path, columns: Columns) -> usize {
    let previous = match Dataset::load(output) {
        Ok(previous) => previous,
        Err(err) => {
            warn!("Ignoring existing output {}: {}", output.display(), err);
            return 0;
        }
    };

    let lat_name = dataset.headers()[columns.latitude].clone();
    let lng_name = dataset.headers()[columns.longitude].clone();
    let (prev_lat, prev_lng) = match (previous.column(&lat_name), previous.column(&lng_name)) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => return 0,
    };

    // (position in dataset, position in previous) for every other column
    let mut shared = Vec::new();
    for (index, name) in dataset.headers().iter().enumerate() {
        if index == columns.latitude || index == columns.longitude {
            continue;
        }
        match previous.column(name) {
            Some(prev_index) => shared.push((index, prev_index)),
            None => return 0,
        }
    }

    let mut resumed = 0;
    for row in 0..dataset.len().min(previous.len()) {
        let has_coordinates = parse_coordinate(dataset.value(row, columns.latitude)).is_some()
            && parse_coordinate(dataset.value(row, columns.longitude)).is_some();
        if has_coordinates {
            continue;
        }
        let same_row = shared
            .iter()
            .all(|&(index, prev_index)| dataset.row(row)[index] == previous.row(row)[prev_index]);
        if !same_row {
            continue;
        }
        let lat = previous.value(row, prev_lat);
        let lng = previous.value(row, prev_lng);
        if parse_coordinate(lat).is_some() && parse_coordinate(lng).is_some() {
            dataset.set_value(row, columns.latitude, lat.map(str::to_owned));
            dataset.set_value(row, columns.longitude, lng.map(str::to_owned));
            resumed += 1;
        }
    }

    if resumed > 0 {
        info!("Resuming with {} rows already geocoded in {}", resumed, output.display());
    }
    resumed
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
