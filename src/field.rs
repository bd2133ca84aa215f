//! Positioned little-endian field access.
//!
//! [`FieldReader`] knows nothing about any recording layout: every call
//! seeks to an absolute byte offset and reads `count` consecutive values
//! of one width.  No alignment is assumed.
//!
//! # Widths
//!
//! | Call        | Element            | Bytes |
//! |-------------|--------------------|-------|
//! | `chars`     | raw character      | 1     |
//! | `u16s`      | unsigned integer   | 2     |
//! | `u32s`      | unsigned integer   | 4     |
//! | `u64s`      | unsigned integer   | 8     |
//! | `f64s`      | IEEE-754 double    | 8     |
//!
//! A read that would cross end-of-file fails with
//! `io::ErrorKind::UnexpectedEof`; nothing is ever zero-filled.

use byteorder::{LittleEndian, ReadBytesExt};
use log::trace;
use std::io::{self, Read, Seek, SeekFrom};

/// Anything the field reader can pull bytes from.
pub trait ByteSource: Read + Seek {}

impl<T: Read + Seek> ByteSource for T {}

pub struct FieldReader<'a> {
    source: &'a mut dyn ByteSource,
}

impl<'a> FieldReader<'a> {
    pub fn new(source: &'a mut dyn ByteSource) -> Self {
        Self { source }
    }

    fn seek(&mut self, offset: u64, width: usize, count: usize) -> io::Result<()> {
        trace!("field read: offset={offset} width={width} count={count}");
        self.source.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// `count` raw single-byte characters.
    pub fn chars(&mut self, offset: u64, count: usize) -> io::Result<Vec<u8>> {
        self.seek(offset, 1, count)?;
        let mut out = vec![0u8; count];
        self.source.read_exact(&mut out)?;
        Ok(out)
    }

    pub fn u16s(&mut self, offset: u64, count: usize) -> io::Result<Vec<u16>> {
        self.seek(offset, 2, count)?;
        let mut out = vec![0u16; count];
        self.source.read_u16_into::<LittleEndian>(&mut out)?;
        Ok(out)
    }

    pub fn u32s(&mut self, offset: u64, count: usize) -> io::Result<Vec<u32>> {
        self.seek(offset, 4, count)?;
        let mut out = vec![0u32; count];
        self.source.read_u32_into::<LittleEndian>(&mut out)?;
        Ok(out)
    }

    pub fn u64s(&mut self, offset: u64, count: usize) -> io::Result<Vec<u64>> {
        self.seek(offset, 8, count)?;
        let mut out = vec![0u64; count];
        self.source.read_u64_into::<LittleEndian>(&mut out)?;
        Ok(out)
    }

    pub fn f64s(&mut self, offset: u64, count: usize) -> io::Result<Vec<f64>> {
        self.seek(offset, 8, count)?;
        let mut out = vec![0f64; count];
        self.source.read_f64_into::<LittleEndian>(&mut out)?;
        Ok(out)
    }

    /// Signed 4-byte samples, used for the interleaved signal payload.
    pub fn i32s(&mut self, offset: u64, count: usize) -> io::Result<Vec<i32>> {
        self.seek(offset, 4, count)?;
        let mut out = vec![0i32; count];
        self.source.read_i32_into::<LittleEndian>(&mut out)?;
        Ok(out)
    }

    // ── Single-value shorthands ──────────────────────────────────────────────

    pub fn u16_at(&mut self, offset: u64) -> io::Result<u16> {
        self.seek(offset, 2, 1)?;
        self.source.read_u16::<LittleEndian>()
    }

    pub fn u64_at(&mut self, offset: u64) -> io::Result<u64> {
        self.seek(offset, 8, 1)?;
        self.source.read_u64::<LittleEndian>()
    }
}
