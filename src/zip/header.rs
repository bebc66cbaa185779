//! Local file header codec for a single entry.
//!
//! The local file header carries exactly the fields of one [`ZipEntry`]
//! except the comment:
//!
//! ```text
//! offset  size  field
//!      0     4  signature (PK\x03\x04)
//!      4     2  version needed to extract
//!      6     2  general purpose flags
//!      8     2  compression method
//!     10     2  last mod time
//!     12     2  last mod date
//!     14     4  crc-32
//!     18     4  compressed size
//!     22     4  uncompressed size
//!     26     2  file name length (n)
//!     28     2  extra field length (m)
//!     30     n  file name
//!   30+n     m  extra field
//! ```
//!
//! All integers are little-endian.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;
use std::io::{Read, Write};

use crate::error::{Error, Result};

use super::dostime::DosDateTime;
use super::entry::{RawEntry, ZipEntry};
use super::structures::*;

/// Write the local file header describing `entry`.
///
/// A deflated entry whose CRC or sizes are still unknown is written with
/// the data-descriptor flag and zeros in those fields. A stored entry must
/// have its CRC and size set; its compressed size defaults to the size.
/// An unset modification time is written as [`DosDateTime::MIN`].
///
/// # Returns
///
/// The number of bytes written.
///
/// # Errors
///
/// [`Error::MissingField`] if the method, or a stored entry's CRC or size,
/// is unset. [`Error::InvalidArgument`] if a stored entry's compressed size
/// differs from its size, or a field outgrew its 16-bit length.
pub fn write_local_header<W: Write>(entry: &ZipEntry, out: &mut W) -> Result<usize> {
    let method = entry
        .method()
        .ok_or(Error::MissingField("compression method"))?;

    let known = match method {
        CompressionMethod::Stored => {
            let size = entry.size().ok_or(Error::MissingField("size"))?;
            let crc = entry.crc().ok_or(Error::MissingField("crc-32"))?;
            let compressed_size = entry.compressed_size().unwrap_or(size);
            if compressed_size != size {
                return Err(Error::InvalidArgument(
                    "stored entry compressed size differs from size",
                ));
            }
            Some((crc, compressed_size, size))
        }
        CompressionMethod::Deflate => match (entry.crc(), entry.compressed_size(), entry.size()) {
            (Some(crc), Some(compressed_size), Some(size)) => Some((crc, compressed_size, size)),
            _ => None,
        },
    };

    let mut flags = 0u16;
    let (crc, compressed_size, size) = match known {
        Some(fields) => fields,
        None => {
            flags |= FLAG_DATA_DESCRIPTOR;
            (0, 0, 0)
        }
    };

    let name = entry.name().as_bytes();
    if !name.is_ascii() {
        flags |= FLAG_UTF8;
    }
    let extra = entry.extra().unwrap_or_default();

    let name_len =
        u16::try_from(name.len()).map_err(|_| Error::InvalidArgument("entry name too long"))?;
    let extra_len = u16::try_from(extra.len())
        .map_err(|_| Error::InvalidArgument("invalid extra field length"))?;
    let mod_time = entry.dos_time().unwrap_or(DosDateTime::MIN);

    out.write_all(LFH_SIGNATURE)?;
    out.write_u16::<LittleEndian>(method.version_needed())?;
    out.write_u16::<LittleEndian>(flags)?;
    out.write_u16::<LittleEndian>(method.as_u16())?;
    out.write_u16::<LittleEndian>(mod_time.time())?;
    out.write_u16::<LittleEndian>(mod_time.date())?;
    out.write_u32::<LittleEndian>(crc)?;
    out.write_u32::<LittleEndian>(compressed_size)?;
    out.write_u32::<LittleEndian>(size)?;
    out.write_u16::<LittleEndian>(name_len)?;
    out.write_u16::<LittleEndian>(extra_len)?;
    out.write_all(name)?;
    out.write_all(extra)?;

    debug!(
        "wrote local header for {} ({} bytes, flags {:#06x})",
        entry.name(),
        LFH_SIZE + name.len() + extra.len(),
        flags
    );

    Ok(LFH_SIZE + name.len() + extra.len())
}

/// Read a local file header and build the entry it describes.
///
/// The entry is taken as-is from the header bytes. When the data-descriptor
/// flag is set, zero CRC and size fields are read as unknown. An empty extra
/// field is read as `None`, so `Some(vec![])` does not survive a round trip.
///
/// # Errors
///
/// [`Error::InvalidHeader`] for a bad signature or a compression method
/// other than stored or deflated; [`Error::Io`] if the input ends early.
pub fn read_local_header<R: Read>(input: &mut R) -> Result<ZipEntry> {
    // Read and verify the signature (PK\x03\x04)
    let mut sig = [0u8; 4];
    input.read_exact(&mut sig)?;
    if &sig[..] != LFH_SIGNATURE {
        return Err(Error::InvalidHeader("bad signature"));
    }

    let _version_needed = input.read_u16::<LittleEndian>()?;
    let flags = input.read_u16::<LittleEndian>()?;
    let method = CompressionMethod::from_u16(input.read_u16::<LittleEndian>()?)
        .ok_or(Error::InvalidHeader("unsupported compression method"))?;
    let time = input.read_u16::<LittleEndian>()?;
    let date = input.read_u16::<LittleEndian>()?;
    let crc = input.read_u32::<LittleEndian>()?;
    let compressed_size = input.read_u32::<LittleEndian>()?;
    let size = input.read_u32::<LittleEndian>()?;
    let name_len = input.read_u16::<LittleEndian>()?;
    let extra_len = input.read_u16::<LittleEndian>()?;

    let mut name_bytes = vec![0u8; usize::from(name_len)];
    input.read_exact(&mut name_bytes)?;
    // Use lossy conversion to handle non-UTF8 filenames gracefully
    let name = String::from_utf8_lossy(&name_bytes).into_owned();

    // A zero-length extra field reads back as unset, even if it was written
    // from an empty buffer.
    let extra = if extra_len > 0 {
        let mut extra = vec![0u8; usize::from(extra_len)];
        input.read_exact(&mut extra)?;
        Some(extra)
    } else {
        None
    };

    let deferred = flags & FLAG_DATA_DESCRIPTOR != 0;
    let field = |value: u32| (!deferred || value != 0).then_some(value);

    debug!("read local header for {} ({}, flags {:#06x})", name, method, flags);

    Ok(ZipEntry::from_raw(RawEntry {
        name,
        mod_time: Some(DosDateTime::from_parts(date, time)),
        crc: field(crc),
        size: field(size),
        compressed_size: field(compressed_size),
        method: Some(method),
        extra,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_header_layout() {
        let mut entry = ZipEntry::from_raw(RawEntry {
            name: "a.txt".to_string(),
            mod_time: Some(DosDateTime::from_parts(0x5870, 0x6D4D)),
            ..RawEntry::default()
        });
        entry.set_method(CompressionMethod::Stored);
        entry.set_crc(0x1234_5678).unwrap();
        entry.set_size(3).unwrap();

        let mut buf = Vec::new();
        let written = write_local_header(&entry, &mut buf).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"PK\x03\x04");
        expected.extend_from_slice(&[10, 0]); // version needed
        expected.extend_from_slice(&[0, 0]); // flags
        expected.extend_from_slice(&[0, 0]); // stored
        expected.extend_from_slice(&[0x4D, 0x6D]); // time
        expected.extend_from_slice(&[0x70, 0x58]); // date
        expected.extend_from_slice(&[0x78, 0x56, 0x34, 0x12]);
        expected.extend_from_slice(&[3, 0, 0, 0]);
        expected.extend_from_slice(&[3, 0, 0, 0]);
        expected.extend_from_slice(&[5, 0]);
        expected.extend_from_slice(&[0, 0]);
        expected.extend_from_slice(b"a.txt");
        assert_eq!(written, expected.len());
        assert_eq!(buf, expected);
    }

    #[test]
    fn empty_extra_reads_back_unset() {
        let mut entry = ZipEntry::new("e").unwrap();
        entry.set_method(CompressionMethod::Deflate);
        entry.set_extra(Some(Vec::new())).unwrap();

        let mut buf = Vec::new();
        write_local_header(&entry, &mut buf).unwrap();
        assert_eq!(&buf[28..30], &[0, 0]);

        let read = read_local_header(&mut std::io::Cursor::new(buf)).unwrap();
        assert_eq!(read.extra(), None);
    }

    #[test]
    fn requires_method() {
        let entry = ZipEntry::new("no-method").unwrap();
        let err = write_local_header(&entry, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::MissingField("compression method")));
    }
}
