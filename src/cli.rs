use clap::{Parser, Subcommand};

use crate::zip::Calendar;

#[derive(Parser, Debug)]
#[command(name = "zipentry")]
#[command(version)]
#[command(about = "Inspect and build ZIP entry metadata", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipentry encode 1700000000000            pack a timestamp as DOS date/time\n  \
  zipentry --utc decode 0x576E5CDA         unpack a DOS date/time as UTC\n  \
  zipentry stat --deflate -o a.hdr a.txt   describe a.txt and write its local header")]
pub struct Cli {
    /// Interpret DOS date/time values as UTC instead of local time
    #[arg(long, global = true)]
    pub utc: bool,

    /// Quiet mode
    #[arg(short = 'q', global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pack milliseconds since the Unix epoch into a DOS date/time
    Encode {
        #[arg(value_name = "MILLIS", allow_negative_numbers = true)]
        millis: i64,
    },

    /// Unpack a DOS date/time (decimal or 0x-prefixed hex)
    Decode {
        #[arg(value_name = "PACKED", value_parser = parse_packed)]
        packed: u32,
    },

    /// Describe a local file as a ZIP entry
    Stat {
        #[arg(value_name = "FILE")]
        file: String,

        /// Entry name (default: the file name)
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Entry comment
        #[arg(long, value_name = "TEXT")]
        comment: Option<String>,

        /// Record the entry as deflated and measure its compressed size
        #[arg(long)]
        deflate: bool,

        /// Write the entry's local file header to this path
        #[arg(short = 'o', long, value_name = "PATH")]
        header_out: Option<String>,
    },

    /// Print the entry stored in a local file header
    Inspect {
        #[arg(value_name = "HEADER")]
        file: String,
    },
}

impl Cli {
    pub fn calendar(&self) -> Calendar {
        if self.utc { Calendar::Utc } else { Calendar::Local }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }
}

/// Accepts `0x`-prefixed hex or plain decimal.
fn parse_packed(value: &str) -> Result<u32, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("invalid packed date/time {value:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_values_accept_hex_and_decimal() {
        assert_eq!(parse_packed("0x00210000"), Ok(0x0021_0000));
        assert_eq!(parse_packed("2162688"), Ok(0x0021_0000));
        assert!(parse_packed("0xZZ").is_err());
        assert!(parse_packed("-1").is_err());
    }
}
