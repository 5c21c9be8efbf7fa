extern crate dotenv;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use log::{error, info};

use crate::config::{
    FilterConfig, GeoNamesConfig, GeocodeConfig, DEFAULT_ADDRESS_COLUMNS, DEFAULT_CHUNK_SIZE,
    DEFAULT_COUNTRY, DEFAULT_DELAY_MS, DEFAULT_FILTERED_FILE, DEFAULT_GEOCODED_FILE,
    DEFAULT_LATITUDE_COLUMN, DEFAULT_LONGITUDE_COLUMN, DEFAULT_NEEDLE,
    DEFAULT_POSTCODE_COLUMN, DEFAULT_TIMEOUT_SECS, GEONAMES_POSTAL_URL,
};
use crate::filter::filter_companies;
use crate::geocode::lookup::GeoNamesClient;
use crate::geocode::wait::ThreadSleep;
use crate::geocode::Geocoder;

mod config;
mod data;
mod filter;
mod geocode;
mod logging;
mod utils;

mod filter_tests;
#[cfg(test)]
mod test_logger;

/// Filter and geocode Companies House company data exports.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Append log records to this file instead of stderr
    #[arg(long, env = "LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Keep the rows whose address columns contain a substring
    Filter(FilterArgs),
    /// Add latitude/longitude to every row using GeoNames
    Geocode(GeocodeArgs),
}

#[derive(Debug, Args)]
struct FilterArgs {
    #[arg(long, env = "FILTER_INPUT")]
    input: PathBuf,

    #[arg(long, env = "FILTER_OUTPUT", default_value = DEFAULT_FILTERED_FILE)]
    output: PathBuf,

    /// Case-insensitive text to look for, e.g. a postal district
    #[arg(long, env = "FILTER_NEEDLE", default_value = DEFAULT_NEEDLE)]
    needle: String,

    /// Address columns to search, comma separated
    #[arg(long, env = "FILTER_COLUMNS", value_delimiter = ',', default_values = DEFAULT_ADDRESS_COLUMNS)]
    columns: Vec<String>,

    #[arg(long, env = "FILTER_CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,
}

#[derive(Debug, Args)]
struct GeocodeArgs {
    #[arg(long, env = "GEOCODE_INPUT", default_value = DEFAULT_FILTERED_FILE)]
    input: PathBuf,

    #[arg(long, env = "GEOCODE_OUTPUT", default_value = DEFAULT_GEOCODED_FILE)]
    output: PathBuf,

    /// GeoNames account name
    #[arg(long, env = "GEONAMES_USERNAME")]
    username: String,

    #[arg(long, env = "GEONAMES_COUNTRY", default_value = DEFAULT_COUNTRY)]
    country: String,

    #[arg(long, env = "GEONAMES_ENDPOINT", default_value = GEONAMES_POSTAL_URL)]
    endpoint: String,

    /// Pause after every request, in milliseconds
    #[arg(long, env = "GEOCODE_DELAY_MS", default_value_t = DEFAULT_DELAY_MS)]
    delay_ms: u64,

    #[arg(long, env = "GEOCODE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[arg(long, env = "GEOCODE_POSTCODE_COLUMN", default_value = DEFAULT_POSTCODE_COLUMN)]
    postcode_column: String,

    #[arg(long, env = "GEOCODE_LATITUDE_COLUMN", default_value = DEFAULT_LATITUDE_COLUMN)]
    latitude_column: String,

    #[arg(long, env = "GEOCODE_LONGITUDE_COLUMN", default_value = DEFAULT_LONGITUDE_COLUMN)]
    longitude_column: String,
}

impl From<FilterArgs> for FilterConfig {
    fn from(args: FilterArgs) -> Self {
        FilterConfig {
            needle: args.needle,
            columns: args.columns,
            chunk_size: args.chunk_size,
            ..FilterConfig::new(args.input, args.output)
        }
    }
}

impl GeocodeArgs {
    fn geonames_config(&self) -> GeoNamesConfig {
        GeoNamesConfig {
            endpoint: self.endpoint.clone(),
            country: self.country.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..GeoNamesConfig::new(self.username.as_str())
        }
    }

    fn geocode_config(&self) -> GeocodeConfig {
        GeocodeConfig {
            postcode_column: self.postcode_column.clone(),
            latitude_column: self.latitude_column.clone(),
            longitude_column: self.longitude_column.clone(),
            delay: Duration::from_millis(self.delay_ms),
            ..GeocodeConfig::new(self.input.clone(), self.output.clone())
        }
    }
}

fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.log_file.as_deref()) {
        eprintln!("Could not open log file: {}", err);
        return ExitCode::FAILURE;
    }

    match cli.command {
        Command::Filter(args) => run_filter(args.into()),
        Command::Geocode(args) => run_geocode(&args),
    }
}

fn run_filter(config: FilterConfig) -> ExitCode {
    info!(
        "Filtering {} for '{}' in {:?}",
        config.input.display(),
        config.needle,
        config.columns
    );
    let progress_bar = utils::scan_progress_bar();
    let result = filter_companies(&config, &progress_bar);
    progress_bar.finish_and_clear();

    match result {
        Ok(summary) => {
            match summary.output {
                Some(output) => println!("Filtered data saved to {}", output.display()),
                None => println!("No matching data found."),
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Critical error while filtering CSV: {}", err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_geocode(args: &GeocodeArgs) -> ExitCode {
    let client = match GeoNamesClient::new(args.geonames_config()) {
        Ok(client) => client,
        Err(err) => {
            error!("Could not create GeoNames client: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let config = args.geocode_config();
    let progress_bar = utils::row_progress_bar(0).with_message("Geocoding Postal Codes");
    let mut geocoder = Geocoder::new(client, ThreadSleep).with_progress_bar(progress_bar);
    info!(
        "Geocoding {} into {} using {} (country {})",
        config.input.display(),
        config.output.display(),
        geocoder.client().config().endpoint,
        geocoder.client().config().country
    );

    match geocoder.run(&config) {
        Ok(summary) => {
            println!(
                "Geocoded {} rows ({} looked up, {} already done, {} resumed from previous output, {} without result, {} failed, {} without postal code). Saved to {}",
                summary.total,
                summary.lookups(),
                summary.skipped,
                summary.resumed,
                summary.no_result,
                summary.failed,
                summary.no_postcode,
                summary.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            let progress = geocoder.progress();
            error!(
                "Critical error while processing CSV after {} of {} rows ({:.1}%): {}",
                progress.handled,
                progress.total,
                progress.fraction() * 100.0,
                err
            );
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
