//! Error types for entry metadata operations.
//!
//! Every mutator on [`ZipEntry`](crate::ZipEntry) reports a rejected value as
//! [`Error::InvalidArgument`] at the call that supplied it. The remaining
//! variants only come out of the local header codec.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A field value outside the format's representable range, or an
    /// unknown compression method code.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Header bytes that do not describe a valid entry.
    #[error("invalid local file header: {0}")]
    InvalidHeader(&'static str),

    /// A field the header writer needs was never set on the entry.
    #[error("missing entry field: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` for errors raised by entry validation.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}
