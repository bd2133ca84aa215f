//! Baikal-7 (`.00`) header.
//!
//! | Offset | Type     | Field                         |
//! |--------|----------|-------------------------------|
//! | 0      | u16      | channels count (must be 3)    |
//! | 22     | u16      | sampling frequency, Hz        |
//! | 72     | f64 × 2  | latitude, longitude           |
//! | 104    | u64      | start ticks since 1980-01-01  |

use crate::coordinate::Coordinate;
use crate::error::Result;
use crate::field::FieldReader;
use crate::format::{FormatId, HeaderDecoder};
use crate::header::{check_channels, check_frequency, FileHeader};
use crate::timestamp::baikal7_start;

const CHANNELS_OFFSET:    u64 = 0;
const FREQUENCY_OFFSET:   u64 = 22;
const COORDINATES_OFFSET: u64 = 72;
const TICKS_OFFSET:       u64 = 104;

pub struct Baikal7Decoder;

impl HeaderDecoder for Baikal7Decoder {
    fn format_id(&self) -> FormatId { FormatId::Baikal7 }

    fn decode(&self, fields: &mut FieldReader<'_>) -> Result<FileHeader> {
        check_channels(fields.u16_at(CHANNELS_OFFSET)?)?;
        let frequency = check_frequency(fields.u16_at(FREQUENCY_OFFSET)?)?;

        // Latitude first on disk.
        let coords = fields.f64s(COORDINATES_OFFSET, 2)?;
        let coordinate = Coordinate::new(coords[1], coords[0]);

        let start_time = baikal7_start(fields.u64_at(TICKS_OFFSET)?)?;
        Ok(FileHeader { frequency, start_time, coordinate })
    }
}
