//! Sigma (`.bin`) header.
//!
//! | Offset | Type     | Field                              |
//! |--------|----------|------------------------------------|
//! | 12     | u16      | channels count (must be 3)         |
//! | 24     | u16      | sampling frequency, Hz             |
//! | 40     | char × 8 | latitude, `DDMM.mmH`               |
//! | 48     | char × 9 | longitude, `DDDMM.mmH`             |
//! | 60     | u32 × 2  | packed date `YYMMDD`, time `HHMMSS` |
//!
//! The device clock runs [`SIGMA_SECONDS_OFFSET`] seconds behind; the
//! decoder reports the raw value and the recording facade applies the fix.

use crate::coordinate::{parse_degrees_minutes, Axis, Coordinate, LATITUDE_TEXT_LEN, LONGITUDE_TEXT_LEN};
use crate::error::Result;
use crate::field::FieldReader;
use crate::format::{FormatId, HeaderDecoder};
use crate::header::{check_channels, check_frequency, FileHeader};
use crate::timestamp::sigma_start;

/// Clock-bias correction added to every Sigma start time.
pub const SIGMA_SECONDS_OFFSET: i64 = 2;

const CHANNELS_OFFSET:  u64 = 12;
const FREQUENCY_OFFSET: u64 = 24;
const LATITUDE_OFFSET:  u64 = 40;
const LONGITUDE_OFFSET: u64 = 48;
const DATETIME_OFFSET:  u64 = 60;

pub struct SigmaDecoder;

impl HeaderDecoder for SigmaDecoder {
    fn format_id(&self) -> FormatId { FormatId::Sigma }

    fn decode(&self, fields: &mut FieldReader<'_>) -> Result<FileHeader> {
        check_channels(fields.u16_at(CHANNELS_OFFSET)?)?;
        let frequency = check_frequency(fields.u16_at(FREQUENCY_OFFSET)?)?;

        let latitude_text = fields.chars(LATITUDE_OFFSET, LATITUDE_TEXT_LEN)?;
        let longitude_text = fields.chars(LONGITUDE_OFFSET, LONGITUDE_TEXT_LEN)?;
        let packed = fields.u32s(DATETIME_OFFSET, 2)?;

        let start_time = sigma_start(packed[0], packed[1])?;
        let longitude = parse_degrees_minutes(&longitude_text, Axis::Longitude)?;
        let latitude = parse_degrees_minutes(&latitude_text, Axis::Latitude)?;

        Ok(FileHeader {
            frequency,
            start_time,
            coordinate: Coordinate { longitude, latitude },
        })
    }
}
