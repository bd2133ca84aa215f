//! Recording facade: span, windowing and resampling queries over one file.
//!
//! ```no_run
//! use seiscore::recording::{Recording, RecordingOptions};
//!
//! let rec = Recording::with_options(
//!     "HF_0019_2019-08-16_08-31-08_90041_527.00",
//!     RecordingOptions { resample_frequency: 100, ..Default::default() },
//! );
//! let info = rec.file_info()?;
//! let range = rec.sample_index_range(info.start_time, info.stop_time)?;
//! println!("{} samples", range.len());
//! # Ok::<(), seiscore::SeisError>(())
//! ```
//!
//! Every query opens the file, performs positioned reads and closes it
//! again; no handle outlives a call.  With [`RecordingOptions::cache_header`]
//! set, the last decoded header is kept in a [`HeaderCache`] and reused
//! while the file's length and modification time are unchanged.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use serde::Serialize;

use crate::component::Component;
use crate::coordinate::Coordinate;
use crate::error::{Result, SeisError};
use crate::field::FieldReader;
use crate::format::sigma::SIGMA_SECONDS_OFFSET;
use crate::format::{read_header, FormatId};
use crate::header::{FileHeader, CHANNELS_COUNT};

/// Header size assumed for sample-count arithmetic, for every format.
pub const HEADER_SIZE: u64 = 120 + 72 * CHANNELS_COUNT as u64;
/// Bytes per sample of one channel.
pub const SAMPLE_SIZE: u64 = 4;
/// Bytes per interleaved Z, X, Y frame.
pub const FRAME_SIZE: u64 = SAMPLE_SIZE * CHANNELS_COUNT as u64;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

// ── RecordingOptions ──────────────────────────────────────────────────────────

/// Configuration for [`Recording::with_options`].
#[derive(Debug, Clone, Default)]
pub struct RecordingOptions {
    /// Target frequency in Hz; `0` keeps the native frequency.
    pub resample_frequency: u16,
    /// Whether downstream decimation averages blocks instead of picking
    /// every n-th sample.  Carried, not interpreted, by this crate.
    pub use_averaging:      bool,
    /// Keep the last decoded header between queries.
    pub cache_header:       bool,
}

// ── Value types ───────────────────────────────────────────────────────────────

/// Which end of a window a timestamp is checked as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowBoundary {
    /// Valid iff `start <= t < stop`.
    Start,
    /// Valid iff `start < t <= stop`.
    Stop,
}

/// Half-open native-rate sample index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleRange {
    pub start_index: u64,
    pub stop_index:  u64,
}

impl SampleRange {
    /// Zero for an inverted range.
    pub fn len(&self) -> u64 {
        self.stop_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Externally consumable summary of one recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    pub path:        PathBuf,
    pub format_type: FormatId,
    pub frequency:   u16,
    pub start_time:  DateTime<Utc>,
    pub stop_time:   DateTime<Utc>,
    pub coordinate:  Coordinate,
}

impl FileInfo {
    /// Final path component.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn duration_seconds(&self) -> f64 {
        let span = self.stop_time - self.start_time;
        span.num_nanoseconds()
            .map(|ns| ns as f64 / 1e9)
            .unwrap_or_else(|| span.num_seconds() as f64)
    }

    /// `HH:MM:SS`, prefixed with `"<n> days "` for spans of a day or more.
    pub fn formatted_duration(&self) -> String {
        let total = (self.stop_time - self.start_time).num_seconds();
        let days = total / 86_400;
        let hours = total % 86_400 / 3_600;
        let minutes = total % 3_600 / 60;
        let seconds = total % 60;
        let clock = format!("{hours:02}:{minutes:02}:{seconds:02}");
        if days > 0 {
            format!("{days} days {clock}")
        } else {
            clock
        }
    }
}

// ── HeaderCache ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct FileStamp {
    len:      u64,
    modified: Option<SystemTime>,
}

impl FileStamp {
    fn of(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path)?;
        Ok(Self { len: meta.len(), modified: meta.modified().ok() })
    }
}

#[derive(Debug)]
struct CachedHeader {
    path:   PathBuf,
    stamp:  FileStamp,
    format: FormatId,
    header: FileHeader,
}

/// Single-entry header cache keyed by path.
///
/// An entry is reused only while the path matches and the file's length
/// and modification time are unchanged; otherwise the header is decoded
/// again and replaces the entry.
#[derive(Debug, Default)]
pub struct HeaderCache {
    slot: Mutex<Option<CachedHeader>>,
}

impl HeaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_decode(&self, path: &Path) -> Result<(FormatId, FileHeader)> {
        // Path errors must not depend on whether the file exists.
        FormatId::detect(path)?;
        let stamp = FileStamp::of(path)?;
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = slot.as_ref() {
            if entry.path == path && entry.stamp == stamp {
                debug!("header cache hit for {}", path.display());
                return Ok((entry.format, entry.header.clone()));
            }
            if entry.path == path {
                warn!("{} changed on disk; dropping cached header", path.display());
            }
        }
        let (format, header) = read_header(path)?;
        *slot = Some(CachedHeader {
            path: path.to_owned(),
            stamp,
            format,
            header: header.clone(),
        });
        Ok((format, header))
    }

    pub fn invalidate(&self) {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

// ── Recording ─────────────────────────────────────────────────────────────────

/// Everything derived from one header read plus the file size.
struct Span {
    format:       FormatId,
    header:       FileHeader,
    start:        DateTime<Utc>,
    stop:         DateTime<Utc>,
    sample_count: u64,
}

pub struct Recording {
    path:    PathBuf,
    options: RecordingOptions,
    cache:   Option<HeaderCache>,
}

impl Recording {
    // ── Constructors ─────────────────────────────────────────────────────────

    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_options(path, RecordingOptions::default())
    }

    /// No I/O happens here; the file is read on the first query.
    pub fn with_options<P: AsRef<Path>>(path: P, options: RecordingOptions) -> Self {
        let cache = options.cache_header.then(HeaderCache::new);
        Self { path: path.as_ref().to_owned(), options, cache }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn options(&self) -> &RecordingOptions { &self.options }

    pub fn use_averaging(&self) -> bool { self.options.use_averaging }

    /// Drop the cached header, if caching is enabled.
    pub fn invalidate_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate();
        }
    }

    // ── Header ───────────────────────────────────────────────────────────────

    pub fn format_type(&self) -> Result<FormatId> {
        FormatId::detect(&self.path)
    }

    fn decoded(&self) -> Result<(FormatId, FileHeader)> {
        match &self.cache {
            Some(cache) => cache.get_or_decode(&self.path),
            None        => read_header(&self.path),
        }
    }

    pub fn header(&self) -> Result<FileHeader> {
        self.decoded().map(|(_, header)| header)
    }

    /// Native sampling frequency from the header.
    pub fn origin_frequency(&self) -> Result<u16> {
        self.header().map(|h| h.frequency)
    }

    // ── Resampling ───────────────────────────────────────────────────────────

    /// The configured target frequency, or the native one for `0`.
    pub fn resample_frequency(&self) -> Result<u16> {
        validate_resample(self.options.resample_frequency, self.origin_frequency()?)
    }

    /// Number of native samples folded into one resampled sample.
    pub fn resample_factor(&self) -> Result<u16> {
        let native = self.origin_frequency()?;
        let target = validate_resample(self.options.resample_frequency, native)?;
        Ok(native / target)
    }

    // ── Span ─────────────────────────────────────────────────────────────────

    pub fn discrete_sample_count(&self) -> Result<u64> {
        let size = fs::metadata(&self.path)?.len();
        Ok(sample_count_for_size(size))
    }

    fn span(&self) -> Result<Span> {
        let (format, header) = self.decoded()?;
        let sample_count = self.discrete_sample_count()?;

        let mut start = header.start_time;
        if format == FormatId::Sigma {
            start += Duration::seconds(SIGMA_SECONDS_OFFSET);
        }
        let duration = recording_duration(sample_count, header.frequency);
        if duration <= Duration::zero() {
            return Err(SeisError::bad_header(format!(
                "{}: {sample_count} samples at {} Hz cover no measurable time",
                self.path.display(),
                header.frequency,
            )));
        }
        let stop = start
            .checked_add_signed(duration)
            .ok_or_else(|| SeisError::bad_header("recording stop time is out of range"))?;

        Ok(Span { format, header, start, stop, sample_count })
    }

    /// Start time, including the Sigma clock-bias correction.
    pub fn start_time(&self) -> Result<DateTime<Utc>> {
        self.span().map(|s| s.start)
    }

    pub fn stop_time(&self) -> Result<DateTime<Utc>> {
        self.span().map(|s| s.stop)
    }

    pub fn file_info(&self) -> Result<FileInfo> {
        let span = self.span()?;
        Ok(FileInfo {
            path:        self.path.clone(),
            format_type: span.format,
            frequency:   span.header.frequency,
            start_time:  span.start,
            stop_time:   span.stop,
            coordinate:  span.header.coordinate,
        })
    }

    // ── Windowing ────────────────────────────────────────────────────────────

    pub fn is_time_in_window(&self, candidate: DateTime<Utc>, boundary: WindowBoundary) -> Result<bool> {
        let span = self.span()?;
        Ok(in_window(candidate, boundary, span.start, span.stop))
    }

    /// Map a wall-clock window onto native-rate sample indices.
    ///
    /// Each boundary becomes `round(offset_seconds * frequency)`; the stop
    /// index is then pulled back until the range length is a multiple of
    /// the resample factor.  The leading edge is never moved.
    pub fn sample_index_range(&self, window_start: DateTime<Utc>, window_stop: DateTime<Utc>) -> Result<SampleRange> {
        let span = self.span()?;

        if !in_window(window_start, WindowBoundary::Start, span.start, span.stop) {
            return Err(SeisError::bad_datetime(format!(
                "window start {window_start} is outside [{}, {})",
                span.start, span.stop
            )));
        }
        if !in_window(window_stop, WindowBoundary::Stop, span.start, span.stop) {
            return Err(SeisError::bad_datetime(format!(
                "window stop {window_stop} is outside ({}, {}]",
                span.start, span.stop
            )));
        }
        if window_start >= window_stop {
            return Err(SeisError::bad_datetime(format!(
                "window start {window_start} is not before window stop {window_stop}"
            )));
        }

        let frequency = span.header.frequency;
        let target = validate_resample(self.options.resample_frequency, frequency)?;
        let factor = u64::from(frequency / target);

        let start_index = offset_to_index(window_start - span.start, frequency)?;
        let stop_index = offset_to_index(window_stop - span.start, frequency)?
            .min(span.sample_count)
            .max(start_index);
        let stop_index = stop_index - (stop_index - start_index) % factor;

        debug!(
            "{}: window {window_start}..{window_stop} -> samples {start_index}..{stop_index} (factor {factor})",
            self.path.display()
        );
        Ok(SampleRange { start_index, stop_index })
    }

    // ── Samples ──────────────────────────────────────────────────────────────

    /// Raw native-rate samples of one channel over `range`.
    ///
    /// An inverted range is `InvalidInput`; a range reaching past the
    /// payload is `UnexpectedEof`.  Both are checked before any allocation.
    pub fn read_component(&self, component: Component, range: SampleRange) -> Result<Vec<i32>> {
        if range.stop_index < range.start_index {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, format!(
                "inverted sample range {}..{}", range.start_index, range.stop_index
            )).into());
        }
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let available = self.discrete_sample_count()?;
        if range.stop_index > available {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, format!(
                "sample range {}..{} exceeds the {available} samples in {}",
                range.start_index, range.stop_index, self.path.display()
            )).into());
        }

        let channels = usize::from(CHANNELS_COUNT);
        let values = usize::try_from(range.len())
            .ok()
            .and_then(|frames| frames.checked_mul(channels))
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, format!(
                "sample range of {} frames does not fit in memory", range.len()
            )))?;
        let offset = range.start_index
            .checked_mul(FRAME_SIZE)
            .and_then(|bytes| bytes.checked_add(HEADER_SIZE))
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, format!(
                "sample index {} is out of range", range.start_index
            )))?;

        let mut file = File::open(&self.path)?;
        let mut fields = FieldReader::new(&mut file);
        let interleaved = fields.i32s(offset, values)?;

        Ok(interleaved
            .chunks_exact(channels)
            .map(|frame| frame[component.index()])
            .collect())
    }
}

// ── helpers ──────────────────────────────────────────────────────────────────

/// `(size - HEADER_SIZE) / FRAME_SIZE`, zero for files shorter than a header.
pub fn sample_count_for_size(file_size: u64) -> u64 {
    file_size.saturating_sub(HEADER_SIZE) / FRAME_SIZE
}

/// Accept `0` (native) or any exact divisor of `native`.
pub fn validate_resample(requested: u16, native: u16) -> Result<u16> {
    if requested == 0 {
        return Ok(native);
    }
    if native == 0 || native % requested != 0 {
        return Err(SeisError::bad_resample(format!(
            "{requested} Hz does not evenly divide the native {native} Hz"
        )));
    }
    Ok(requested)
}

/// Decimal places kept in a duration: `floor(log10(frequency))`.
fn duration_precision(frequency: u16) -> u32 {
    frequency.checked_ilog10().unwrap_or(0)
}

/// `sample_count / frequency` seconds, truncated to
/// [`duration_precision`] decimal places.
pub fn recording_duration(sample_count: u64, frequency: u16) -> Duration {
    if frequency == 0 {
        return Duration::zero();
    }
    let exact = u128::from(sample_count) * NANOS_PER_SECOND / u128::from(frequency);
    let unit = 10u128.pow(9 - duration_precision(frequency));
    let truncated = exact - exact % unit;
    Duration::nanoseconds(i64::try_from(truncated).unwrap_or(i64::MAX))
}

fn in_window(candidate: DateTime<Utc>, boundary: WindowBoundary, start: DateTime<Utc>, stop: DateTime<Utc>) -> bool {
    match boundary {
        WindowBoundary::Start => start <= candidate && candidate < stop,
        WindowBoundary::Stop  => start < candidate && candidate <= stop,
    }
}

/// `round(offset_seconds * frequency)`, computed in integer nanoseconds.
fn offset_to_index(offset: Duration, frequency: u16) -> Result<u64> {
    let nanos = offset
        .num_nanoseconds()
        .and_then(|ns| u128::try_from(ns).ok())
        .ok_or_else(|| SeisError::bad_datetime(format!("offset {offset} is out of range")))?;
    let index = (nanos * u128::from(frequency) + NANOS_PER_SECOND / 2) / NANOS_PER_SECOND;
    u64::try_from(index).map_err(|_| SeisError::bad_datetime(format!("offset {offset} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_size_matches_three_channel_layout() {
        assert_eq!(HEADER_SIZE, 336);
        assert_eq!(sample_count_for_size(336 + 12 * 1000 + 5), 1000);
        assert_eq!(sample_count_for_size(100), 0);
    }

    #[test]
    fn duration_is_truncated_by_frequency_magnitude() {
        // 1001 / 250 = 4.004 s; 250 Hz keeps two decimals.
        assert_eq!(recording_duration(1001, 250), Duration::milliseconds(4000));
        // 1001 / 100 = 10.01 s; exact at two decimals.
        assert_eq!(recording_duration(1001, 100), Duration::milliseconds(10_010));
        // 7 / 3 Hz keeps zero decimals.
        assert_eq!(recording_duration(7, 3), Duration::seconds(2));
        assert_eq!(recording_duration(12_345, 1000), Duration::milliseconds(12_345));
    }

    #[test]
    fn resample_zero_means_native() {
        assert_eq!(validate_resample(0, 250).unwrap(), 250);
        assert_eq!(validate_resample(50, 250).unwrap(), 50);
        assert!(matches!(validate_resample(7, 100), Err(SeisError::InvalidResampleFrequency(_))));
        assert!(validate_resample(300, 250).is_err());
    }

    #[test]
    fn offsets_round_to_nearest_sample() {
        assert_eq!(offset_to_index(Duration::milliseconds(15), 100).unwrap(), 2);
        assert_eq!(offset_to_index(Duration::milliseconds(14), 100).unwrap(), 1);
        assert_eq!(offset_to_index(Duration::zero(), 100).unwrap(), 0);
    }

    #[test]
    fn inverted_range_has_zero_length() {
        let range = SampleRange { start_index: 5, stop_index: 3 };
        assert_eq!(range.len(), 0);
        assert!(range.is_empty());
    }

    #[test]
    fn window_bounds_are_asymmetric() {
        let start = DateTime::from_timestamp(0, 0).unwrap();
        let stop = start + Duration::seconds(10);
        assert!(in_window(start, WindowBoundary::Start, start, stop));
        assert!(!in_window(stop, WindowBoundary::Start, start, stop));
        assert!(!in_window(start, WindowBoundary::Stop, start, stop));
        assert!(in_window(stop, WindowBoundary::Stop, start, stop));
    }

    #[test]
    fn formatted_duration_includes_days() {
        let start = DateTime::from_timestamp(0, 0).unwrap();
        let info = FileInfo {
            path:        PathBuf::from("/data/K07_2022-01-20.xx"),
            format_type: FormatId::Baikal8,
            frequency:   1000,
            start_time:  start,
            stop_time:   start + Duration::seconds(2 * 86_400 + 3_723),
            coordinate:  Coordinate::new(0.0, 0.0),
        };
        assert_eq!(info.name(), "K07_2022-01-20.xx");
        assert_eq!(info.formatted_duration(), "2 days 01:02:03");
        assert_eq!(info.duration_seconds(), 176_523.0);
    }
}
