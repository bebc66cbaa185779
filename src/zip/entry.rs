use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

use super::dostime::{Calendar, DosDateTime, TimeCodec};
use super::structures::{CompressionMethod, DIRECTORY_SEPARATOR, MAX_FIELD_LEN};
use super::text::TextLengthValidator;

const FIELD_VALIDATOR: TextLengthValidator = TextLengthValidator::new(MAX_FIELD_LEN);

/// Metadata for one entry of a ZIP archive.
///
/// Every optional field starts unset (`None`), which is distinct from zero.
/// Mutators validate their input against the format's field widths and
/// reject out-of-range values with [`Error::InvalidArgument`]; getters
/// never validate.
///
/// Entries compare equal only to themselves. Hashing uses the name alone.
#[derive(Debug, Clone)]
pub struct ZipEntry {
    name: String,
    mod_time: Option<DosDateTime>,
    crc: Option<u32>,
    size: Option<u32>,
    compressed_size: Option<u32>,
    method: Option<CompressionMethod>,
    extra: Option<Vec<u8>>,
    comment: Option<String>,
    codec: TimeCodec,
}

/// Field values decoded from header bytes, trusted as-is.
#[derive(Debug, Default)]
pub(crate) struct RawEntry {
    pub name: String,
    pub mod_time: Option<DosDateTime>,
    pub crc: Option<u32>,
    pub size: Option<u32>,
    pub compressed_size: Option<u32>,
    pub method: Option<CompressionMethod>,
    pub extra: Option<Vec<u8>>,
}

impl ZipEntry {
    /// Create an entry with the given name and every other field unset.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the UTF-8 encoded name is longer than
    /// 65535 bytes.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !FIELD_VALIDATOR.fits(&name) {
            return Err(Error::InvalidArgument("entry name too long"));
        }
        Ok(Self::from_raw(RawEntry {
            name,
            ..RawEntry::default()
        }))
    }

    /// Build an entry from decoded header fields without validating them.
    pub(crate) fn from_raw(raw: RawEntry) -> Self {
        Self {
            name: raw.name,
            mod_time: raw.mod_time,
            crc: raw.crc,
            size: raw.size,
            compressed_size: raw.compressed_size,
            method: raw.method,
            extra: raw.extra,
            comment: None,
            codec: TimeCodec::default(),
        }
    }

    /// Snapshot another entry. The extra field buffer is copied, so later
    /// changes to either entry's buffer do not show up in the other.
    pub fn from_entry(other: &ZipEntry) -> Self {
        other.clone()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calendar used to convert modification times.
    pub fn calendar(&self) -> Calendar {
        self.codec.calendar()
    }

    /// Switch the calendar used by [`set_mod_time`](Self::set_mod_time) and
    /// [`mod_time`](Self::mod_time). The stored packed value is unchanged.
    pub fn set_calendar(&mut self, calendar: Calendar) {
        self.codec = TimeCodec::new(calendar);
    }

    /// Set the modification time from milliseconds since the Unix epoch.
    ///
    /// The value is stored packed, at 2-second resolution. Times before 1980
    /// are stored as 1980-01-01 00:00:00.
    pub fn set_mod_time(&mut self, epoch_millis: i64) {
        self.mod_time = Some(self.codec.encode(epoch_millis));
    }

    /// The modification time in milliseconds since the Unix epoch.
    pub fn mod_time(&self) -> Option<i64> {
        self.mod_time.map(|packed| self.codec.decode(packed))
    }

    /// The modification time as stored in the header. Only
    /// [`set_mod_time`](Self::set_mod_time) and the header reader produce it.
    pub fn dos_time(&self) -> Option<DosDateTime> {
        self.mod_time
    }

    /// Set the uncompressed size.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] unless `0 <= size <= 0xFFFFFFFF`.
    pub fn set_size(&mut self, size: i64) -> Result<()> {
        self.size = Some(checked_u32(size, "invalid entry size")?);
        Ok(())
    }

    pub fn size(&self) -> Option<u32> {
        self.size
    }

    /// Set the compressed size. Same bounds as [`set_size`](Self::set_size).
    pub fn set_compressed_size(&mut self, compressed_size: i64) -> Result<()> {
        self.compressed_size = Some(checked_u32(compressed_size, "invalid entry compressed size")?);
        Ok(())
    }

    pub fn compressed_size(&self) -> Option<u32> {
        self.compressed_size
    }

    /// Set the CRC-32 of the uncompressed data.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] unless `0 <= crc <= 0xFFFFFFFF`.
    pub fn set_crc(&mut self, crc: i64) -> Result<()> {
        self.crc = Some(checked_u32(crc, "invalid entry crc-32")?);
        Ok(())
    }

    pub fn crc(&self) -> Option<u32> {
        self.crc
    }

    pub fn set_method(&mut self, method: CompressionMethod) {
        self.method = Some(method);
    }

    /// Set the compression method from its header code.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for any code other than 0 (stored) or
    /// 8 (deflated).
    pub fn set_method_code(&mut self, code: i64) -> Result<()> {
        self.method = Some(CompressionMethod::try_from(code)?);
        Ok(())
    }

    pub fn method(&self) -> Option<CompressionMethod> {
        self.method
    }

    /// Set or clear the extra field data.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the data is longer than 65535 bytes.
    pub fn set_extra(&mut self, extra: Option<Vec<u8>>) -> Result<()> {
        if extra.as_ref().is_some_and(|data| data.len() > MAX_FIELD_LEN) {
            return Err(Error::InvalidArgument("invalid extra field length"));
        }
        self.extra = extra;
        Ok(())
    }

    pub fn extra(&self) -> Option<&[u8]> {
        self.extra.as_deref()
    }

    /// Mutable access to the stored extra field bytes. The length is fixed;
    /// resize through [`set_extra`](Self::set_extra).
    pub fn extra_mut(&mut self) -> Option<&mut [u8]> {
        self.extra.as_deref_mut()
    }

    /// Set or clear the entry comment.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the UTF-8 encoded comment is longer than
    /// 65535 bytes.
    pub fn set_comment(&mut self, comment: Option<String>) -> Result<()> {
        if comment.as_deref().is_some_and(|text| !FIELD_VALIDATOR.fits(text)) {
            return Err(Error::InvalidArgument("invalid entry comment length"));
        }
        self.comment = comment;
        Ok(())
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Directory entries are those whose name ends with `/`.
    pub fn is_directory(&self) -> bool {
        self.name.ends_with(DIRECTORY_SEPARATOR)
    }
}

/// Size and CRC fields are unsigned 32-bit on disk.
fn checked_u32(value: i64, message: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::InvalidArgument(message))
}

impl PartialEq for ZipEntry {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for ZipEntry {}

impl Hash for ZipEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Display for ZipEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
