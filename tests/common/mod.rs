#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{Cursor, Seek, SeekFrom, Write};
use tempfile::{Builder, NamedTempFile};

pub const HEADER_SIZE: usize = 336;

/// Zero-filled header followed by `frames` interleaved Z, X, Y samples
/// where frame `i` holds `(i, 1000 + i, -(i as i32))`.
fn blank(frames: usize) -> Cursor<Vec<u8>> {
    let mut cur = Cursor::new(vec![0u8; HEADER_SIZE]);
    cur.seek(SeekFrom::End(0)).unwrap();
    for i in 0..frames as i32 {
        cur.write_i32::<LittleEndian>(i).unwrap();
        cur.write_i32::<LittleEndian>(1000 + i).unwrap();
        cur.write_i32::<LittleEndian>(-i).unwrap();
    }
    cur
}

pub struct Baikal7 {
    pub channels:  u16,
    pub frequency: u16,
    pub latitude:  f64,
    pub longitude: f64,
    pub ticks:     u64,
    pub frames:    usize,
}

impl Default for Baikal7 {
    fn default() -> Self {
        Self { channels: 3, frequency: 100, latitude: 50.12345, longitude: 30.54321, ticks: 0, frames: 1000 }
    }
}

impl Baikal7 {
    pub fn bytes(&self) -> Vec<u8> {
        let mut cur = blank(self.frames);
        cur.seek(SeekFrom::Start(0)).unwrap();
        cur.write_u16::<LittleEndian>(self.channels).unwrap();
        cur.seek(SeekFrom::Start(22)).unwrap();
        cur.write_u16::<LittleEndian>(self.frequency).unwrap();
        cur.seek(SeekFrom::Start(72)).unwrap();
        cur.write_f64::<LittleEndian>(self.latitude).unwrap();
        cur.write_f64::<LittleEndian>(self.longitude).unwrap();
        cur.seek(SeekFrom::Start(104)).unwrap();
        cur.write_u64::<LittleEndian>(self.ticks).unwrap();
        cur.into_inner()
    }
}

pub struct Baikal8 {
    pub channels: u16,
    pub day:      u16,
    pub month:    u16,
    pub year:     u16,
    pub interval: f64,
    pub seconds:  f64,
    pub longitude: f64,
    pub latitude: f64,
    pub frames:   usize,
}

impl Default for Baikal8 {
    fn default() -> Self {
        Self {
            channels: 3, day: 20, month: 1, year: 2022,
            interval: 0.002, seconds: 30_065.5,
            longitude: 37.618423, latitude: 55.751244,
            frames: 1000,
        }
    }
}

impl Baikal8 {
    pub fn bytes(&self) -> Vec<u8> {
        let mut cur = blank(self.frames);
        cur.seek(SeekFrom::Start(0)).unwrap();
        cur.write_u16::<LittleEndian>(self.channels).unwrap();
        cur.seek(SeekFrom::Start(6)).unwrap();
        cur.write_u16::<LittleEndian>(self.day).unwrap();
        cur.write_u16::<LittleEndian>(self.month).unwrap();
        cur.write_u16::<LittleEndian>(self.year).unwrap();
        cur.seek(SeekFrom::Start(48)).unwrap();
        cur.write_f64::<LittleEndian>(self.interval).unwrap();
        cur.write_f64::<LittleEndian>(self.seconds).unwrap();
        cur.seek(SeekFrom::Start(72)).unwrap();
        cur.write_f64::<LittleEndian>(self.longitude).unwrap();
        cur.write_f64::<LittleEndian>(self.latitude).unwrap();
        cur.into_inner()
    }
}

pub struct Sigma {
    pub channels:  u16,
    pub frequency: u16,
    pub latitude:  &'static [u8; 8],
    pub longitude: &'static [u8; 9],
    pub date:      u32,
    pub time:      u32,
    pub frames:    usize,
}

impl Default for Sigma {
    fn default() -> Self {
        Self {
            channels: 3, frequency: 1000,
            latitude: b"5545.00N", longitude: b"03730.00E",
            date: 220119, time: 100611,
            frames: 2000,
        }
    }
}

impl Sigma {
    pub fn bytes(&self) -> Vec<u8> {
        let mut cur = blank(self.frames);
        cur.seek(SeekFrom::Start(12)).unwrap();
        cur.write_u16::<LittleEndian>(self.channels).unwrap();
        cur.seek(SeekFrom::Start(24)).unwrap();
        cur.write_u16::<LittleEndian>(self.frequency).unwrap();
        cur.seek(SeekFrom::Start(40)).unwrap();
        cur.write_all(self.latitude).unwrap();
        cur.write_all(self.longitude).unwrap();
        cur.seek(SeekFrom::Start(60)).unwrap();
        cur.write_u32::<LittleEndian>(self.date).unwrap();
        cur.write_u32::<LittleEndian>(self.time).unwrap();
        cur.into_inner()
    }
}

/// Write `bytes` to a temp file ending in `.{extension}`.
pub fn recording_file(extension: &str, bytes: &[u8]) -> NamedTempFile {
    let mut file = Builder::new()
        .prefix("recording_")
        .suffix(&format!(".{extension}"))
        .tempfile()
        .unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}
