//! Everything between raw export files and the engine:
//! archive decoding, JSON shape detection, intake state, export payloads.

pub mod archive;
pub mod error;
pub mod export;
pub mod intake;
pub mod parse;

pub use error::{ExportError, IntakeError};
pub use export::ExportFormat;
pub use intake::{IntakeSource, MemorySource, PathSource, Processor, Progress, Status};
pub use parse::{parse_export_json, ParsedFile};
