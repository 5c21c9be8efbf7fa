use std::fmt::Formatter;

use crate::data::error::DataError;

#[derive(Debug)]
pub enum FilterError {
    IO(std::io::Error),
    InvalidCsv(csv::Error),
    InvalidData(DataError),
    InvalidConfig(String),
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let msg = match self {
            FilterError::IO(inner) => format!("IO: {}", inner),
            FilterError::InvalidCsv(inner) => format!("Invalid csv data: {}", inner),
            FilterError::InvalidData(inner) => format!("{}", inner),
            FilterError::InvalidConfig(reason) => format!("Invalid configuration: {}", reason),
        };
        write!(f, "Filter error: {}", msg)
    }
}

impl std::error::Error for FilterError {}

impl From<std::io::Error> for FilterError {
    fn from(error: std::io::Error) -> Self {
        FilterError::IO(error)
    }
}

impl From<csv::Error> for FilterError {
    fn from(error: csv::Error) -> Self {
        FilterError::InvalidCsv(error)
    }
}

impl From<DataError> for FilterError {
    fn from(error: DataError) -> Self {
        FilterError::InvalidData(error)
    }
}

impl From<tempfile::PersistError> for FilterError {
    fn from(error: tempfile::PersistError) -> Self {
        FilterError::IO(error.error)
    }
}
