use std::error::Error as StdError;
use std::fmt;
use std::io::Error as IoError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use csv::Error as CsvError;
use serde_json::Error as JsonError;

pub type Result<T> = StdResult<T, Error>;

#[derive(Debug)]
pub enum Error {
    IoError(IoError),
    CsvError(CsvError),
    JsonError(JsonError),

    /// input file does not exist
    FileNotFound(PathBuf),

    /// input is not a well-formed table
    Parse(String),

    /// a configured column is absent from the table
    ColumnNotFound(String),

    /// a feature column contains values that are not numbers
    NonNumericColumn(String),

    /// a feature column has no variability in the training data
    ZeroVariance { column: String },

    /// not enough rows for the requested split or number of folds
    InsufficientSamples { required: usize, available: usize },

    InvalidParameter(String),

    /// row/column counts of two inputs disagree
    ShapeMismatch { expected: usize, found: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::IoError(ref e) => write!(f, "I/O error: {}", e),
            Error::CsvError(ref e) => write!(f, "CSV error: {}", e),
            Error::JsonError(ref e) => write!(f, "JSON error: {}", e),
            Error::FileNotFound(ref p) => write!(f, "file not found: {}", p.display()),
            Error::Parse(ref msg) => write!(f, "parse error: {}", msg),
            Error::ColumnNotFound(ref c) => write!(f, "column not found: '{}'", c),
            Error::NonNumericColumn(ref c) => {
                write!(f, "column '{}' is not numeric and cannot be used as a feature", c)
            }
            Error::ZeroVariance { ref column } => {
                write!(f, "column '{}' has zero variance in the training data", column)
            }
            Error::InsufficientSamples {
                required,
                available,
            } => write!(
                f,
                "insufficient samples: need at least {}, have {}",
                required, available
            ),
            Error::InvalidParameter(ref msg) => write!(f, "invalid parameter: {}", msg),
            Error::ShapeMismatch { expected, found } => {
                write!(f, "shape mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match *self {
            Error::IoError(ref e) => Some(e),
            Error::CsvError(ref e) => Some(e),
            Error::JsonError(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::IoError(e)
    }
}

impl From<CsvError> for Error {
    fn from(e: CsvError) -> Self {
        Error::CsvError(e)
    }
}

impl From<JsonError> for Error {
    fn from(e: JsonError) -> Self {
        Error::JsonError(e)
    }
}

#[test]
fn display_names_the_column() {
    let e = Error::ColumnNotFound("genres".to_owned());
    assert_eq!(e.to_string(), "column not found: 'genres'");

    let e = Error::InsufficientSamples {
        required: 10,
        available: 3,
    };
    assert!(e.to_string().contains("need at least 10"));
}
