//! Start-time encodings used by the three recorder families.
//!
//! | Family  | Encoding                                                 |
//! |---------|----------------------------------------------------------|
//! | Baikal7 | u64 tick counter since 1980-01-01, 256 000 000 ticks/s   |
//! | Baikal8 | day / month / year fields plus f64 seconds after midnight |
//! | Sigma   | packed decimal `YYMMDD` and `HHMMSS` u32 values          |

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::error::{Result, SeisError};

/// Baikal-7 tick rate.
pub const BAIKAL7_TICKS_PER_SECOND: u64 = 256_000_000;
/// Added to two-digit Sigma years.
pub const SIGMA_CENTURY: i32 = 2000;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

fn baikal7_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1980, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn add_offset(base: DateTime<Utc>, seconds: u64, nanos: u64) -> Result<DateTime<Utc>> {
    let seconds = i64::try_from(seconds)
        .map_err(|_| SeisError::bad_header(format!("start offset of {seconds} s is out of range")))?;
    let offset = Duration::try_seconds(seconds)
        .and_then(|d| d.checked_add(&Duration::nanoseconds(nanos as i64)))
        .ok_or_else(|| SeisError::bad_header(format!("start offset of {seconds} s is out of range")))?;
    base.checked_add_signed(offset)
        .ok_or_else(|| SeisError::bad_header(format!("start offset of {seconds} s is out of range")))
}

/// Decode a Baikal-7 tick counter.
///
/// Whole seconds come from integer division; the leftover ticks are scaled
/// to nanoseconds exactly (`ticks * 10^9 / 256e6`, i.e. `* 125 / 32`).
pub fn baikal7_start(ticks: u64) -> Result<DateTime<Utc>> {
    let seconds = ticks / BAIKAL7_TICKS_PER_SECOND;
    let remainder = ticks % BAIKAL7_TICKS_PER_SECOND;
    let nanos = remainder * NANOS_PER_SECOND / BAIKAL7_TICKS_PER_SECOND;
    add_offset(baikal7_epoch(), seconds, nanos)
}

/// Decode a Baikal-8 calendar date plus fractional seconds after midnight.
pub fn baikal8_start(day: u16, month: u16, year: u16, seconds: f64) -> Result<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
        .ok_or_else(|| {
            SeisError::bad_header(format!("invalid date: day={day} month={month} year={year}"))
        })?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(SeisError::bad_header(format!("invalid start seconds: {seconds}")));
    }

    let mut whole = seconds.trunc() as u64;
    let mut nanos = ((seconds - seconds.trunc()) * NANOS_PER_SECOND as f64).round() as u64;
    if nanos >= NANOS_PER_SECOND {
        whole += 1;
        nanos -= NANOS_PER_SECOND;
    }
    let midnight = date.and_hms_opt(0, 0, 0)
        .ok_or_else(|| SeisError::bad_header("invalid midnight"))?
        .and_utc();
    add_offset(midnight, whole, nanos)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(this), Some(next)) => (next - this).num_days() as u32,
        _ => 0,
    }
}

fn two_digits(text: &str, at: usize) -> u32 {
    text[at..at + 2].parse().unwrap_or(u32::MAX)
}

/// Decode Sigma packed decimal date (`YYMMDD`) and time (`HHMMSS`).
///
/// Checks run in a fixed order and the first failure wins: six-digit date,
/// month range, day count of that month, six-digit time, hour, minute,
/// second.
pub fn sigma_start(packed_date: u32, packed_time: u32) -> Result<DateTime<Utc>> {
    let date_line = packed_date.to_string();
    if date_line.len() != 6 {
        return Err(SeisError::bad_header(format!("invalid date: {date_line}")));
    }

    let year = SIGMA_CENTURY + two_digits(&date_line, 0) as i32;
    let month = two_digits(&date_line, 2);
    let day = two_digits(&date_line, 4);

    if !(1..=12).contains(&month) {
        return Err(SeisError::bad_header(format!("invalid month: {month} ({date_line})")));
    }
    let max_day = days_in_month(year, month);
    if day == 0 || day > max_day {
        return Err(SeisError::bad_header(format!(
            "invalid day: {day} (month {month} of {year} has {max_day} days)"
        )));
    }

    let time_line = format!("{packed_time:06}");
    if time_line.len() != 6 {
        return Err(SeisError::bad_header(format!("invalid time: {time_line}")));
    }
    let hours = two_digits(&time_line, 0);
    let minutes = two_digits(&time_line, 2);
    let seconds = two_digits(&time_line, 4);

    if hours > 23 {
        return Err(SeisError::bad_header(format!("invalid hours: {hours} ({time_line})")));
    }
    if minutes > 59 {
        return Err(SeisError::bad_header(format!("invalid minutes: {minutes} ({time_line})")));
    }
    if seconds > 59 {
        return Err(SeisError::bad_header(format!("invalid seconds: {seconds} ({time_line})")));
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hours, minutes, seconds))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| SeisError::bad_header(format!("invalid datetime: {date_line} {time_line}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn baikal7_zero_ticks_is_epoch() {
        let t = baikal7_start(0).unwrap();
        assert_eq!(t.to_rfc3339(), "1980-01-01T00:00:00+00:00");
    }

    #[test]
    fn baikal7_keeps_sub_second_ticks() {
        // 1.5 s worth of ticks plus one tick (3.90625 ns, floored).
        let t = baikal7_start(BAIKAL7_TICKS_PER_SECOND * 3 / 2 + 1).unwrap();
        assert_eq!(t.second(), 1);
        assert_eq!(t.nanosecond(), 500_000_003);
    }

    #[test]
    fn baikal8_adds_fractional_seconds_to_midnight() {
        let t = baikal8_start(20, 1, 2022, 30_305.25).unwrap();
        assert_eq!(t.to_rfc3339(), "2022-01-20T08:25:05.250+00:00");
    }

    #[test]
    fn baikal8_fraction_rounding_up_carries_a_second() {
        let t = baikal8_start(20, 1, 2022, 59.9999999999).unwrap();
        assert_eq!(t.to_rfc3339(), "2022-01-20T00:01:00+00:00");
    }

    #[test]
    fn baikal8_rejects_impossible_date() {
        assert!(matches!(baikal8_start(30, 2, 2022, 0.0), Err(SeisError::BadHeaderData(_))));
        assert!(matches!(baikal8_start(1, 1, 2022, f64::NAN), Err(SeisError::BadHeaderData(_))));
    }

    #[test]
    fn sigma_decodes_packed_fields() {
        let t = sigma_start(220119, 100611).unwrap();
        assert_eq!(t.to_rfc3339(), "2022-01-19T10:06:11+00:00");
        let t = sigma_start(220119, 611).unwrap();
        assert_eq!(t.to_rfc3339(), "2022-01-19T00:06:11+00:00");
    }

    #[test]
    fn sigma_calendar_checks() {
        assert!(sigma_start(220231, 0).is_err(), "February never has 31 days");
        assert!(sigma_start(220229, 0).is_err(), "2022 is not a leap year");
        assert!(sigma_start(240229, 0).is_ok(), "2024 is a leap year");
        assert!(sigma_start(221301, 0).is_err());
        assert!(sigma_start(220001, 0).is_err());
        assert!(sigma_start(220100, 0).is_err());
        assert!(sigma_start(50131, 0).is_err(), "date must be six digits");
    }

    #[test]
    fn sigma_clock_checks() {
        assert!(sigma_start(220119, 236000).is_err());
        assert!(sigma_start(220119, 240000).is_err());
        assert!(sigma_start(220119, 235960).is_err());
        assert!(sigma_start(220119, 1_000_000).is_err());
        assert!(sigma_start(220119, 235959).is_ok());
    }
}
