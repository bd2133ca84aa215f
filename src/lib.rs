pub mod error;
pub mod field;
pub mod coordinate;
pub mod timestamp;
pub mod header;
pub mod format;
pub mod component;
pub mod recording;

pub use error::{Result, SeisError};
pub use coordinate::Coordinate;
pub use header::FileHeader;
pub use format::{FormatId, HeaderDecoder, read_header};
pub use component::Component;
pub use recording::{FileInfo, Recording, RecordingOptions, SampleRange, WindowBoundary};
