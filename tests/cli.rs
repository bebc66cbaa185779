//! Command-line parsing.

use clap::Parser;
use zipentry::cli::Command;
use zipentry::{Calendar, Cli};

#[test]
fn encode_accepts_negative_millis() {
    let cli = Cli::try_parse_from(["zipentry", "encode", "-1000"]).unwrap();
    assert!(matches!(cli.command, Command::Encode { millis: -1000 }));
    assert_eq!(cli.calendar(), Calendar::Local);
}

#[test]
fn utc_and_quiet_are_global() {
    let cli = Cli::try_parse_from(["zipentry", "decode", "0x00210000", "--utc", "-q"]).unwrap();
    assert!(matches!(cli.command, Command::Decode { packed: 0x0021_0000 }));
    assert_eq!(cli.calendar(), Calendar::Utc);
    assert!(cli.is_quiet());
}

#[test]
fn stat_options() {
    let cli = Cli::try_parse_from([
        "zipentry", "stat", "--deflate", "--name", "docs/a.txt", "--comment", "hello", "-o",
        "a.hdr", "a.txt",
    ])
    .unwrap();
    match cli.command {
        Command::Stat {
            file,
            name,
            comment,
            deflate,
            header_out,
        } => {
            assert_eq!(file, "a.txt");
            assert_eq!(name.as_deref(), Some("docs/a.txt"));
            assert_eq!(comment.as_deref(), Some("hello"));
            assert!(deflate);
            assert_eq!(header_out.as_deref(), Some("a.hdr"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rejects_malformed_packed_value() {
    assert!(Cli::try_parse_from(["zipentry", "decode", "0xnothex"]).is_err());
    assert!(Cli::try_parse_from(["zipentry", "decode", "4294967296"]).is_err());
}
