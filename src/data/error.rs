use std::fmt::Formatter;

#[derive(Debug)]
pub enum DataError {
    IO(std::io::Error),
    InvalidCsv(csv::Error),
    RaggedRow { line: u64, expected: usize, found: usize },
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            DataError::IO(inner) => write!(f, "IO: {}", inner),
            DataError::InvalidCsv(inner) => write!(f, "Invalid csv data: {}", inner),
            DataError::RaggedRow { line, expected, found } => write!(
                f,
                "Row on line {} has {} fields, header has {}",
                line, found, expected
            ),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::IO(inner) => Some(inner),
            DataError::InvalidCsv(inner) => Some(inner),
            DataError::RaggedRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(error: std::io::Error) -> Self {
        DataError::IO(error)
    }
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        DataError::InvalidCsv(error)
    }
}

impl From<tempfile::PersistError> for DataError {
    fn from(error: tempfile::PersistError) -> Self {
        DataError::IO(error.error)
    }
}
