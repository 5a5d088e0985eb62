//! Integration tests for argument handling and the conversion pipeline,
//! without spawning a subprocess.

use clap::Parser;
use nbt::print::{Layout, PrintOptions};
use nbt_cli::cli::{Cli, ColorMode, LayoutArg};
use nbt_cli::{Conversion, convert, report};

/// Attempt to parse a command line, returning Ok(Cli) or the clap error string.
fn try_parse(args: &[&str]) -> Result<Cli, String> {
    Cli::try_parse_from(args).map_err(|e| e.to_string())
}

fn must_parse(args: &[&str]) -> Cli {
    try_parse(args).unwrap_or_else(|e| panic!("expected parse to succeed, got:\n{e}"))
}

fn plain(parse: bool, compress: bool) -> Conversion {
    Conversion {
        parse,
        compress,
        print: PrintOptions {
            layout: Layout::Spaced,
            color: false,
        },
    }
}

#[test]
fn short_and_long_flags() {
    let cli = must_parse(&["nbt", "-p", "-c"]);
    assert!(cli.parse && cli.compress);
    let cli = must_parse(&["nbt", "--parse", "--compress", "--color", "never", "--layout", "indented"]);
    assert!(cli.parse && cli.compress);
    assert_eq!(cli.color, ColorMode::Never);
    assert_eq!(cli.layout, Some(LayoutArg::Indented));
}

#[test]
fn unknown_color_rejected() {
    let err = try_parse(&["nbt", "--color", "sometimes"]).unwrap_err();
    assert!(err.contains("sometimes"), "{err}");
}

#[test]
fn debug_and_quiet_conflict() {
    assert!(try_parse(&["nbt", "--debug", "--quiet"]).is_err());
}

#[test]
fn text_to_text() {
    let out = convert(b"{foo:42}", &plain(true, false)).unwrap();
    assert_eq!(out, b"{foo: 42}\n");
}

#[test]
fn text_to_binary_to_text() {
    let gz = convert(b"{foo: 5b, bar: [1,2,3]}", &plain(true, true)).unwrap();
    assert_eq!(&gz[..2], [0x1F, 0x8B]);
    let out = convert(&gz, &plain(false, false)).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "{foo: 5b, bar: [1, 2, 3]}\n");
}

#[test]
fn parse_failure_reports_cause_chain() {
    let input = b"{foo: }";
    let err = convert(input, &plain(true, false)).unwrap_err();
    let text = report(&err, input, false);
    assert!(text.starts_with("Error! Couldn't parse tag value.\n"), "{text}");
    assert!(text.contains("Which caused: Error! Expected a valid tag or closing braces."));
}

#[test]
fn binary_failure_reports_error() {
    let err = convert(b"not gzip", &plain(false, false)).unwrap_err();
    let text = report(&err, b"not gzip", false);
    assert!(text.starts_with("Error! gzip error"), "{text}");
}
