use std::fmt;

/// Errors surfaced by the engine. Nothing is retried or swallowed; every
/// failure propagates to the caller.
#[derive(Debug)]
pub enum Error {
    /// Declared sizes or counts disagree with the data actually present.
    Configuration(String),
    /// An operation required an attached `NetFile` and none was present.
    NotConfigured(&'static str),
    /// An index or mask did not fit the dimensions it was used against.
    Bounds(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(msg) => write!(f, "configuration mismatch: {msg}"),
            Error::NotConfigured(what) => write!(f, "not configured: {what}"),
            Error::Bounds(msg) => write!(f, "out of bounds: {msg}"),
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}
