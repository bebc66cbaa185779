//! Main entry point for the zipentry CLI application.
//!
//! This binary builds and inspects ZIP entry metadata: it converts between
//! epoch milliseconds and packed DOS date/time values, describes local files
//! as entries, and reads or writes an entry's local file header.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};
use std::io::{Cursor, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

use zipentry::cli::Command;
use zipentry::zip::{read_local_header, write_local_header};
use zipentry::{Cli, CompressionMethod, DosDateTime, TimeCodec, ZipEntry};

/// Application entry point.
///
/// Parses command-line arguments and dispatches to the subcommand handler.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Encode { millis } => encode(&cli, *millis),
        Command::Decode { packed } => decode(&cli, *packed),
        Command::Stat {
            file,
            name,
            comment,
            deflate,
            header_out,
        } => {
            let entry = stat(&cli, file, name.as_deref(), comment.clone(), *deflate).await?;
            print_entry(&entry);

            if let Some(out) = header_out {
                let mut buf = Vec::new();
                let written = write_local_header(&entry, &mut buf)?;
                fs::write(out, &buf)
                    .await
                    .with_context(|| format!("failed to write {}", out))?;
                if !cli.is_quiet() {
                    eprintln!("  wrote: {} ({} bytes)", out, written);
                }
            }
            Ok(())
        }
        Command::Inspect { file } => {
            let data = fs::read(file)
                .await
                .with_context(|| format!("failed to read {}", file))?;
            let mut entry = read_local_header(&mut Cursor::new(data))
                .with_context(|| format!("{} is not a local file header", file))?;
            entry.set_calendar(cli.calendar());
            print_entry(&entry);
            Ok(())
        }
    }
}

fn encode(cli: &Cli, millis: i64) -> Result<()> {
    let packed = TimeCodec::new(cli.calendar()).encode(millis);
    println!(
        "{:#010x}  date={:#06x} time={:#06x}  {}",
        packed.bits(),
        packed.date(),
        packed.time(),
        packed
    );
    Ok(())
}

fn decode(cli: &Cli, packed: u32) -> Result<()> {
    let packed = DosDateTime::from_bits(packed);
    let millis = TimeCodec::new(cli.calendar()).decode(packed);
    println!("{}  {}", millis, packed);
    Ok(())
}

/// Build the entry describing a local file or directory.
///
/// Size and CRC-32 come from the file contents. With `deflate`, the
/// compressed size is measured by running the data through a raw deflate
/// stream, as it would be stored in an archive.
async fn stat(
    cli: &Cli,
    file: &str,
    name: Option<&str>,
    comment: Option<String>,
    deflate: bool,
) -> Result<ZipEntry> {
    let path = Path::new(file);
    let metadata = fs::metadata(path)
        .await
        .with_context(|| format!("failed to stat {}", file))?;

    let mut name = match name {
        Some(name) => name.to_string(),
        None => path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("{} has no file name", file))?,
    };
    // Directory entries are marked by a trailing separator
    if metadata.is_dir() && !name.ends_with('/') {
        name.push('/');
    }

    let mut entry = ZipEntry::new(name)?;
    entry.set_calendar(cli.calendar());
    if let Ok(modified) = metadata.modified() {
        entry.set_mod_time(epoch_millis(modified));
    }
    entry.set_comment(comment)?;

    if metadata.is_dir() {
        entry.set_method(CompressionMethod::Stored);
        entry.set_size(0)?;
        entry.set_compressed_size(0)?;
        entry.set_crc(0)?;
        return Ok(entry);
    }

    let data = fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", file))?;

    let size = i64::try_from(data.len())?;
    entry
        .set_size(size)
        .with_context(|| format!("{} is too large for a 32-bit size field", file))?;

    let mut crc = Crc::new();
    crc.update(&data);
    entry.set_crc(i64::from(crc.sum()))?;

    if deflate {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&data)?;
        let compressed = encoder.finish()?;
        entry.set_method(CompressionMethod::Deflate);
        entry.set_compressed_size(i64::try_from(compressed.len())?)?;
    } else {
        entry.set_method(CompressionMethod::Stored);
        entry.set_compressed_size(size)?;
    }

    Ok(entry)
}

/// Milliseconds since the Unix epoch, negative before it.
fn epoch_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_millis()).map_or(i64::MIN, |ms| -ms),
    }
}

/// Print the entry fields, one per line. Unset fields print as `-`.
fn print_entry(entry: &ZipEntry) {
    fn or_unset<T: ToString>(value: Option<T>) -> String {
        value.map_or_else(|| "-".to_string(), |v| v.to_string())
    }

    let modified = entry.dos_time().map(|packed| {
        format!(
            "{} ({} ms, packed {:#010x})",
            packed,
            entry.mod_time().unwrap_or_default(),
            packed.bits()
        )
    });

    println!("{:<12}{}", "name:", entry.name());
    println!("{:<12}{}", "directory:", if entry.is_directory() { "yes" } else { "no" });
    println!("{:<12}{}", "modified:", or_unset(modified));
    println!("{:<12}{}", "method:", or_unset(entry.method()));
    println!("{:<12}{}", "crc-32:", or_unset(entry.crc().map(|crc| format!("{:08x}", crc))));
    println!("{:<12}{}", "size:", or_unset(entry.size()));
    println!("{:<12}{}", "compressed:", or_unset(entry.compressed_size()));
    println!(
        "{:<12}{}",
        "extra:",
        or_unset(entry.extra().map(|extra| format!("{} bytes", extra.len())))
    );
    println!("{:<12}{}", "comment:", or_unset(entry.comment()));
}
