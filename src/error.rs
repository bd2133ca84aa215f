//! Error type shared by every decoder and the recording facade.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SeisError>;

#[derive(Error, Debug)]
pub enum SeisError {
    /// Empty path, unregistered extension or unknown dispatch target.
    #[error("BadFilePath: {0}")]
    BadFilePath(String),
    /// A header field failed validation.
    #[error("BadHeaderData: {0}")]
    BadHeaderData(String),
    #[error("InvalidResampleFrequency: {0}")]
    InvalidResampleFrequency(String),
    /// A window boundary lies outside the recording span.
    #[error("InvalidDatetimeValue: {0}")]
    InvalidDatetimeValue(String),
    #[error("UnknownComponentName: {0}")]
    UnknownComponentName(String),
    /// Missing, unreadable or truncated file. Never retried.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl SeisError {
    pub fn bad_path<S: Into<String>>(s: S) -> Self {
        Self::BadFilePath(s.into())
    }

    pub fn bad_header<S: Into<String>>(s: S) -> Self {
        Self::BadHeaderData(s.into())
    }

    pub fn bad_resample<S: Into<String>>(s: S) -> Self {
        Self::InvalidResampleFrequency(s.into())
    }

    pub fn bad_datetime<S: Into<String>>(s: S) -> Self {
        Self::InvalidDatetimeValue(s.into())
    }
}
