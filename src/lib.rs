//! # zipentry
//!
//! Validated metadata for a single ZIP archive entry.
//!
//! A [`ZipEntry`] holds the fields an archive embeds per entry: name,
//! modification time, CRC-32, compressed and uncompressed sizes, compression
//! method, extra field data and comment. Every mutator checks its input
//! against the field widths of the format and fails with
//! [`Error::InvalidArgument`] instead of storing a value the archive could
//! not represent.
//!
//! Modification times are kept in the packed DOS date/time form the format
//! stores, at 2-second resolution. [`TimeCodec`] converts to and from epoch
//! milliseconds under a local or UTC [`Calendar`].
//!
//! ## Features
//!
//! - Unset fields are `None`, never a reserved number
//! - Name and comment limits measured in encoded UTF-8 bytes
//! - Lossless DOS date/time packing, clamped to 1980..=2107
//! - Reading and writing an entry's local file header
//!
//! ## Example
//!
//! ```
//! use zipentry::{Calendar, CompressionMethod, ZipEntry};
//!
//! fn main() -> zipentry::Result<()> {
//!     let mut entry = ZipEntry::new("docs/readme.txt")?;
//!     entry.set_calendar(Calendar::Utc);
//!     entry.set_mod_time(1_700_000_001_500);
//!     entry.set_size(1024)?;
//!     entry.set_method(CompressionMethod::Deflate);
//!
//!     assert_eq!(entry.mod_time(), Some(1_700_000_000_000));
//!     assert!(entry.set_size(-1).is_err());
//!     assert!(!entry.is_directory());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod zip;

pub use cli::Cli;
pub use error::{Error, Result};
pub use zip::{Calendar, CompressionMethod, DosDateTime, TextLengthValidator, TimeCodec, ZipEntry};
