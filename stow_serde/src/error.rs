//! Error type

use std::fmt::{self, Display, Formatter};

/// Result specialization for stow errors
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while saving or loading values
#[derive(Debug)]
pub enum Error {
    /// Occurs when a file cannot be created, written, opened or read
    Io(std::io::Error),
    /// Occurs when a value cannot be represented in the binary format
    Encoding(bincode::Error),
    /// Occurs when bytes are truncated, corrupted or not in the binary format
    Decoding(bincode::Error),
    /// Occurs when a text form is not valid base64
    Base64(base64::DecodeError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "i/o failure: {}", e),
            Error::Encoding(e) => write!(f, "encoding failure: {}", e),
            Error::Decoding(e) => write!(f, "decoding failure: {}", e),
            Error::Base64(e) => write!(f, "invalid base64: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Encoding(e) | Error::Decoding(e) => Some(&**e),
            Error::Base64(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::Base64(e)
    }
}

impl From<Error> for std::fmt::Error {
    fn from(_: Error) -> Self {
        std::fmt::Error
    }
}
