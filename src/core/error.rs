use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid vertex/array index handed to a container. Caller bug, never retried.
    IndexOutOfRange,
    /// Pop/top on an empty heap. Callers must check `is_empty()` first.
    EmptyContainer,
    /// Regression inputs of mismatched length.
    DimensionMismatch,
    /// Degenerate regression design (zero variance in the predictor).
    SingularMatrix,
    NotFound,
    Io,
    Parse,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Io,
            context: err.to_string(),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error {
            kind: ErrorKind::Parse,
            context: format!("CSV error: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
