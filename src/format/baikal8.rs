//! Baikal-8 (`.xx`) header.
//!
//! | Offset | Type     | Field                                     |
//! |--------|----------|-------------------------------------------|
//! | 0      | u16      | channels count (must be 3)                |
//! | 6      | u16 × 3  | day, month, year                          |
//! | 48     | f64 × 2  | sampling interval (s), start seconds      |
//! | 72     | f64 × 2  | longitude, latitude                       |
//!
//! The frequency is not stored directly: it is `round(1 / interval)`.

use crate::coordinate::Coordinate;
use crate::error::{Result, SeisError};
use crate::field::FieldReader;
use crate::format::{FormatId, HeaderDecoder};
use crate::header::{check_channels, check_frequency, FileHeader};
use crate::timestamp::baikal8_start;

const CHANNELS_OFFSET:    u64 = 0;
const DATE_OFFSET:        u64 = 6;
const TIMING_OFFSET:      u64 = 48;
const COORDINATES_OFFSET: u64 = 72;

fn frequency_from_interval(interval: f64) -> Result<u16> {
    let frequency = (1.0 / interval).round();
    if !interval.is_finite() || interval <= 0.0 || !(1.0..=f64::from(u16::MAX)).contains(&frequency) {
        return Err(SeisError::bad_header(format!("invalid sampling interval: {interval}")));
    }
    check_frequency(frequency as u16)
}

pub struct Baikal8Decoder;

impl HeaderDecoder for Baikal8Decoder {
    fn format_id(&self) -> FormatId { FormatId::Baikal8 }

    fn decode(&self, fields: &mut FieldReader<'_>) -> Result<FileHeader> {
        check_channels(fields.u16_at(CHANNELS_OFFSET)?)?;

        let date = fields.u16s(DATE_OFFSET, 3)?;
        let timing = fields.f64s(TIMING_OFFSET, 2)?;
        let frequency = frequency_from_interval(timing[0])?;
        let start_time = baikal8_start(date[0], date[1], date[2], timing[1])?;

        // Longitude first on disk, unlike Baikal-7.
        let coords = fields.f64s(COORDINATES_OFFSET, 2)?;
        let coordinate = Coordinate::new(coords[0], coords[1]);

        Ok(FileHeader { frequency, start_time, coordinate })
    }
}
