//! ZIP entry metadata.
//!
//! This module models the per-entry fields a ZIP archive stores and keeps
//! them within the ranges the format can represent.
//!
//! ## Architecture
//!
//! - [`entry`]: [`ZipEntry`], the validated metadata record
//! - [`dostime`]: conversion between epoch milliseconds and the packed DOS date/time
//! - [`text`]: encoded byte length checks for names and comments
//! - [`header`]: the local file header of a single entry
//! - [`structures`]: compression methods, field limits and header constants
//!
//! ## Field limits
//!
//! | field | limit |
//! |---|---|
//! | name, comment | 65535 UTF-8 bytes |
//! | extra | 65535 bytes |
//! | crc, size, compressed size | unsigned 32-bit |
//! | method | stored (0) or deflated (8) |
//!
//! ## Limitations
//!
//! - No central directory or end-of-central-directory records
//! - No ZIP64 extensions
//! - No compression: the method is recorded, never applied

pub mod dostime;
pub mod entry;
pub mod header;
pub mod structures;
pub mod text;

pub use dostime::{Calendar, DosDateTime, TimeCodec};
pub use entry::ZipEntry;
pub use header::{read_local_header, write_local_header};
pub use structures::*;
pub use text::TextLengthValidator;
