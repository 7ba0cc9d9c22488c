use std::fmt;

#[derive(Debug)]
pub enum Error {
    BoundaryError(String),
    NoNounFound(String),
    ParserError(String),
    TrainingError(String),
    IoError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BoundaryError(msg) => write!(f, "Boundary Error: {}", msg),
            Error::NoNounFound(phrase) => write!(f, "No noun found in phrase: {:?}", phrase),
            Error::ParserError(msg) => write!(f, "Parser Error: {}", msg),
            Error::TrainingError(msg) => write!(f, "Training Error: {}", msg),
            Error::IoError(err) => write!(f, "IO Error: {}", err),
        }
    }
}

// `std::io::Error` is not `Clone`; copies keep its kind and message.
impl Clone for Error {
    fn clone(&self) -> Self {
        match self {
            Error::BoundaryError(msg) => Error::BoundaryError(msg.clone()),
            Error::NoNounFound(phrase) => Error::NoNounFound(phrase.clone()),
            Error::ParserError(msg) => Error::ParserError(msg.clone()),
            Error::TrainingError(msg) => Error::TrainingError(msg.clone()),
            Error::IoError(err) => Error::IoError(std::io::Error::new(err.kind(), err.to_string())),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Error {
        Error::ParserError(format!("Failed to read CSV: {}", err))
    }
}
