//! Format registry: the three frozen recorder layouts and their decoders.
//!
//! # Identity rules
//! A recording's format is decided by its file-name extension alone.  The
//! extension table is closed: it is a compile-time constant and is never
//! extended at runtime.  An unknown extension is a hard `BadFilePath`
//! failure; there is no content sniffing and no fallback format.
//!
//! # Endianness
//! Every numeric header field of every format is little-endian.  See the
//! per-format modules for byte offsets.

use std::fs::File;
use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::error::{Result, SeisError};
use crate::field::{ByteSource, FieldReader};
use crate::header::FileHeader;

pub mod baikal7;
pub mod baikal8;
pub mod sigma;

pub use baikal7::Baikal7Decoder;
pub use baikal8::Baikal8Decoder;
pub use sigma::SigmaDecoder;

// ── Frozen extension table ──────────────────────────────────────────────────

pub const BAIKAL7_EXTENSION: &str = "00";
pub const BAIKAL8_EXTENSION: &str = "xx";
pub const SIGMA_EXTENSION:   &str = "bin";

/// Extension → format.  Never mutated.
pub const FORMAT_EXTENSIONS: [(&str, FormatId); 3] = [
    (BAIKAL7_EXTENSION, FormatId::Baikal7),
    (BAIKAL8_EXTENSION, FormatId::Baikal8),
    (SIGMA_EXTENSION,   FormatId::Sigma),
];

// ── FormatId ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatId {
    Baikal7,
    Baikal8,
    Sigma,
}

impl FormatId {
    pub fn extension(self) -> &'static str {
        match self {
            FormatId::Baikal7 => BAIKAL7_EXTENSION,
            FormatId::Baikal8 => BAIKAL8_EXTENSION,
            FormatId::Sigma   => SIGMA_EXTENSION,
        }
    }

    /// Human-readable name (diagnostics and CLI output).
    pub fn name(self) -> &'static str {
        match self {
            FormatId::Baikal7 => "Baikal7",
            FormatId::Baikal8 => "Baikal8",
            FormatId::Sigma   => "Sigma",
        }
    }

    /// Resolve an extension (without the dot).  Case-sensitive.
    pub fn from_extension(extension: &str) -> Option<Self> {
        FORMAT_EXTENSIONS
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, id)| *id)
    }

    /// Detect the format of `path` from its final extension.
    pub fn detect(path: &Path) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(SeisError::bad_path("empty file path"));
        }
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| SeisError::bad_path(format!("no extension: {}", path.display())))?;
        Self::from_extension(extension).ok_or_else(|| {
            SeisError::bad_path(format!("unknown extension {extension:?}: {}", path.display()))
        })
    }

    /// The decoder implementing this layout.
    pub fn decoder(self) -> &'static dyn HeaderDecoder {
        match self {
            FormatId::Baikal7 => &Baikal7Decoder,
            FormatId::Baikal8 => &Baikal8Decoder,
            FormatId::Sigma   => &SigmaDecoder,
        }
    }
}

impl std::fmt::Display for FormatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── Decoder trait ───────────────────────────────────────────────────────────

pub trait HeaderDecoder: Send + Sync {
    fn format_id(&self) -> FormatId;

    /// Whether a file with this extension belongs to the layout.
    fn accepts(&self, extension: &str) -> bool {
        extension == self.format_id().extension()
    }

    /// Decode and validate the header.  Fails with `BadHeaderData` on any
    /// invalid field and with `Io` if the source is too short.
    fn decode(&self, fields: &mut FieldReader<'_>) -> Result<FileHeader>;
}

/// Decode a header from any seekable byte source.
pub fn decode_from(format: FormatId, source: &mut dyn ByteSource) -> Result<FileHeader> {
    let decoder = format.decoder();
    let mut fields = FieldReader::new(source);
    decoder.decode(&mut fields)
}

/// Open `path`, detect its format and decode its header.
///
/// The file is opened, read and closed within this call.
pub fn read_header(path: &Path) -> Result<(FormatId, FileHeader)> {
    let format = FormatId::detect(path)?;
    let mut file = File::open(path)?;
    let header = decode_from(format, &mut file)?;
    debug!(
        "decoded {format} header from {}: {} Hz, start {}",
        path.display(),
        header.frequency,
        header.start_time,
    );
    Ok((format, header))
}

/// True when `path` exists and carries a registered extension.
pub fn is_binary_file_path(path: &Path) -> bool {
    path.is_file() && FormatId::detect(path).is_ok()
}
