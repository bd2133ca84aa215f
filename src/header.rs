use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::coordinate::Coordinate;
use crate::error::{Result, SeisError};

/// Channel count every supported recorder writes.
pub const CHANNELS_COUNT: u16 = 3;

/// Normalised header shared by every recorder family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileHeader {
    /// Native sampling frequency, Hz.  Always non-zero.
    pub frequency:  u16,
    /// Recording start as written by the device (no clock-bias correction).
    pub start_time: DateTime<Utc>,
    pub coordinate: Coordinate,
}

/// Reject any channel count other than [`CHANNELS_COUNT`].
pub fn check_channels(count: u16) -> Result<()> {
    if count != CHANNELS_COUNT {
        return Err(SeisError::bad_header(format!(
            "invalid channels count: {count} (expected {CHANNELS_COUNT})"
        )));
    }
    Ok(())
}

pub fn check_frequency(frequency: u16) -> Result<u16> {
    if frequency == 0 {
        return Err(SeisError::bad_header("sampling frequency is zero"));
    }
    Ok(frequency)
}
