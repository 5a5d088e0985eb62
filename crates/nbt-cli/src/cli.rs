//! Command-line definition.
//!
//! Kept separate from `main` so argument handling can be tested with
//! [`Cli::try_parse_from`] without spawning a process.

use std::io::IsTerminal;

use clap::{Parser, ValueEnum};
use nbt::print::{Layout, PrintOptions};

/// Convert NBT between gzip binary and text form.
///
/// Reads all of stdin and writes all of stdout. By default the input is
/// gzip-compressed binary NBT and the output is text.
#[derive(Parser, Debug)]
#[command(name = "nbt")]
#[command(version)]
#[command(about = "Convert NBT between gzip binary and text form", long_about = None)]
#[command(after_help = "EXAMPLES:
  nbt < level.dat                      Print a binary document as text
  nbt -p -c < level.snbt > level.dat   Compile text into a binary document
  nbt -p --layout spaced < in.snbt     Reformat text on one line")]
pub struct Cli {
    /// Parse the input as text NBT instead of binary.
    #[arg(short, long)]
    pub parse: bool,

    /// Write gzip-compressed binary NBT instead of text.
    #[arg(short, long)]
    pub compress: bool,

    /// When to use ANSI color in text output and diagnostics.
    ///
    /// auto: enable when the stream is a terminal and NO_COLOR is unset (default).
    /// always: force color even when piped.
    /// never: disable color unconditionally.
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorMode,

    /// Text output layout [default: indented when coloring, compact otherwise].
    #[arg(long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub debug: bool,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,
}

/// Controls when ANSI color codes are emitted.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Detect automatically per stream.
    #[default]
    Auto,
    /// Always emit ANSI color codes, even when piped.
    Always,
    /// Never emit ANSI color codes.
    Never,
}

impl ColorMode {
    /// Resolve the mode for a stream.
    #[must_use]
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                if let Ok(val) = std::env::var("FORCE_COLOR") {
                    if !val.is_empty() && val != "0" {
                        return true;
                    }
                }
                if std::env::var_os("NO_COLOR").is_some() {
                    return false;
                }
                is_terminal
            }
        }
    }
}

/// Text output layout.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LayoutArg {
    /// No whitespace.
    Compact,
    /// One line with spaces after separators.
    Spaced,
    /// One entry per line, two-space indent.
    Indented,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Compact => Layout::Compact,
            LayoutArg::Spaced => Layout::Spaced,
            LayoutArg::Indented => Layout::Indented,
        }
    }
}

impl Cli {
    /// Whether stdout gets color.
    #[must_use]
    pub fn stdout_color(&self) -> bool {
        self.color.enabled(std::io::stdout().is_terminal())
    }

    /// Whether stderr gets color.
    #[must_use]
    pub fn stderr_color(&self) -> bool {
        self.color.enabled(std::io::stderr().is_terminal())
    }

    /// Printer settings for the given stdout color decision.
    #[must_use]
    pub fn print_options(&self, color: bool) -> PrintOptions {
        let layout = match self.layout {
            Some(arg) => arg.into(),
            None if color => Layout::Indented,
            None => Layout::Compact,
        };
        PrintOptions { layout, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["nbt"]).unwrap();
        assert!(!cli.parse);
        assert!(!cli.compress);
        assert_eq!(cli.color, ColorMode::Auto);
        assert_eq!(cli.layout, None);
    }

    #[test]
    fn test_layout_follows_color() {
        let cli = Cli::try_parse_from(["nbt"]).unwrap();
        assert_eq!(cli.print_options(true).layout, Layout::Indented);
        assert_eq!(cli.print_options(false).layout, Layout::Compact);

        let cli = Cli::try_parse_from(["nbt", "--layout", "spaced"]).unwrap();
        assert_eq!(cli.print_options(true).layout, Layout::Spaced);
    }

    #[test]
    fn test_explicit_color_modes() {
        assert!(ColorMode::Always.enabled(false));
        assert!(!ColorMode::Never.enabled(true));
    }

    #[test]
    fn test_stderr_color_follows_flag() {
        let cli = Cli::try_parse_from(["nbt", "--color", "never"]).unwrap();
        assert!(!cli.stderr_color());
        let cli = Cli::try_parse_from(["nbt", "--color", "always"]).unwrap();
        assert!(cli.stderr_color());
    }
}
