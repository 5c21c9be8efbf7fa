use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ADDRESS_COLUMNS: [&str; 4] = [
    "RegAddress.AddressLine1",
    "RegAddress.AddressLine2",
    "RegAddress.PostTown",
    "RegAddress.PostCode",
];
pub const DEFAULT_NEEDLE: &str = "NW4";
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;
pub const DEFAULT_FILTERED_FILE: &str = "nw4_companies_filtered.csv";
pub const DEFAULT_GEOCODED_FILE: &str = "nw4_geocoded_companies.csv";

pub const GEONAMES_POSTAL_URL: &str = "http://api.geonames.org/postalCodeSearchJSON";
pub const DEFAULT_COUNTRY: &str = "GB";
pub const DEFAULT_MAX_ROWS: u32 = 1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_POSTCODE_COLUMN: &str = "RegAddress.PostCode";
pub const DEFAULT_LATITUDE_COLUMN: &str = "Latitude";
pub const DEFAULT_LONGITUDE_COLUMN: &str = "Longitude";
/// GeoNames free accounts are limited per hour; one request a second stays well under.
pub const DEFAULT_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub needle: String,
    pub columns: Vec<String>,
    pub chunk_size: usize,
}

impl FilterConfig {
    pub fn new<I: Into<PathBuf>, O: Into<PathBuf>>(input: I, output: O) -> FilterConfig {
        FilterConfig {
            input: input.into(),
            output: output.into(),
            ..FilterConfig::default()
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            input: PathBuf::from("BasicCompanyDataAsOneFile.csv"),
            output: PathBuf::from(DEFAULT_FILTERED_FILE),
            needle: DEFAULT_NEEDLE.to_owned(),
            columns: DEFAULT_ADDRESS_COLUMNS.iter().map(|c| c.to_string()).collect(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeoNamesConfig {
    pub endpoint: String,
    pub username: String,
    pub country: String,
    pub max_rows: u32,
    pub timeout: Duration,
}

impl GeoNamesConfig {
    pub fn new<S: Into<String>>(username: S) -> GeoNamesConfig {
        GeoNamesConfig {
            endpoint: GEONAMES_POSTAL_URL.to_owned(),
            username: username.into(),
            country: DEFAULT_COUNTRY.to_owned(),
            max_rows: DEFAULT_MAX_ROWS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub postcode_column: String,
    pub latitude_column: String,
    pub longitude_column: String,
    pub delay: Duration,
}

impl GeocodeConfig {
    pub fn new<I: Into<PathBuf>, O: Into<PathBuf>>(input: I, output: O) -> GeocodeConfig {
        GeocodeConfig {
            input: input.into(),
            output: output.into(),
            ..GeocodeConfig::default()
        }
    }
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        GeocodeConfig {
            input: PathBuf::from(DEFAULT_FILTERED_FILE),
            output: PathBuf::from(DEFAULT_GEOCODED_FILE),
            postcode_column: DEFAULT_POSTCODE_COLUMN.to_owned(),
            latitude_column: DEFAULT_LATITUDE_COLUMN.to_owned(),
            longitude_column: DEFAULT_LONGITUDE_COLUMN.to_owned(),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}
