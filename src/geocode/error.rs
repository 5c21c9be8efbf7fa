use std::fmt::Formatter;

use crate::data::error::DataError;

/// Run-level failure: nothing more gets written once one of these is returned.
#[derive(Debug)]
pub enum GeocodeError {
    Input(DataError),
    Output(DataError),
    MissingColumn(String),
}

impl std::fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            GeocodeError::Input(inner) => write!(f, "Could not read input: {}", inner),
            GeocodeError::Output(inner) => write!(f, "Could not write output: {}", inner),
            GeocodeError::MissingColumn(column) => {
                write!(f, "Column '{}' not found in the CSV", column)
            }
        }
    }
}

impl std::error::Error for GeocodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeocodeError::Input(inner) | GeocodeError::Output(inner) => Some(inner),
            GeocodeError::MissingColumn(_) => None,
        }
    }
}

/// Row-level failure of a single lookup. Logged, never fatal.
#[derive(Debug)]
pub enum LookupError {
    Http(reqwest::Error),
    Status(reqwest::StatusCode),
    Malformed(String),
    Service { message: String, code: Option<i64> },
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            LookupError::Http(inner) => write!(f, "HTTP: {}", inner),
            LookupError::Status(status) => write!(f, "Unexpected status {}", status),
            LookupError::Malformed(reason) => write!(f, "Malformed response: {}", reason),
            LookupError::Service { message, code: Some(code) } => {
                write!(f, "Service error {}: {}", code, message)
            }
            LookupError::Service { message, code: None } => {
                write!(f, "Service error: {}", message)
            }
        }
    }
}

impl std::error::Error for LookupError {}

impl From<reqwest::Error> for LookupError {
    fn from(error: reqwest::Error) -> Self {
        LookupError::Http(error)
    }
}
