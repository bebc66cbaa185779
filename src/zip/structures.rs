use crate::error::{Error, Result};

/// Largest value a 16-bit length field can hold; bounds name, extra and comment.
pub const MAX_FIELD_LEN: usize = 0xFFFF;

/// Separator that marks a directory entry when it ends the name.
pub const DIRECTORY_SEPARATOR: char = '/';

/// ZIP compression methods an entry may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionMethod {
    Stored,
    Deflate,
}

impl CompressionMethod {
    pub const STORED_CODE: u16 = 0;
    pub const DEFLATE_CODE: u16 = 8;

    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            Self::STORED_CODE => Some(CompressionMethod::Stored),
            Self::DEFLATE_CODE => Some(CompressionMethod::Deflate),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => Self::STORED_CODE,
            CompressionMethod::Deflate => Self::DEFLATE_CODE,
        }
    }

    /// Minimum "version needed to extract" for this method (1.0 or 2.0).
    pub fn version_needed(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 10,
            CompressionMethod::Deflate => 20,
        }
    }
}

impl TryFrom<i64> for CompressionMethod {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        u16::try_from(value)
            .ok()
            .and_then(Self::from_u16)
            .ok_or(Error::InvalidArgument("invalid compression method"))
    }
}

impl std::fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompressionMethod::Stored => write!(f, "stored"),
            CompressionMethod::Deflate => write!(f, "deflated"),
        }
    }
}

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// General purpose flag: crc and sizes follow the data in a descriptor
pub const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;
/// General purpose flag: name and comment are UTF-8
pub const FLAG_UTF8: u16 = 1 << 11;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_codes() {
        assert_eq!(CompressionMethod::from_u16(0), Some(CompressionMethod::Stored));
        assert_eq!(CompressionMethod::from_u16(8), Some(CompressionMethod::Deflate));
        assert_eq!(CompressionMethod::from_u16(12), None);
        assert_eq!(CompressionMethod::Deflate.as_u16(), 8);
    }

    #[test]
    fn method_try_from_rejects_unknown() {
        assert!(CompressionMethod::try_from(8i64).is_ok());
        for code in [-1i64, 1, 7, 9, 0x1_0000] {
            let err = CompressionMethod::try_from(code).unwrap_err();
            assert!(err.is_invalid_argument());
        }
    }
}
