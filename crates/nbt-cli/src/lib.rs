//! Library half of the `nbt` binary: argument definitions and the conversion
//! pipeline, separated from process I/O.

pub mod cli;

use nbt::print::PrintOptions;
use nbt::{Error, decode, encode, parse, print};

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    /// The input could not be decoded or parsed, or the output encoded.
    pub const CONVERSION_ERROR: i32 = 1;
    /// Reading stdin or writing stdout failed.
    pub const IO_ERROR: i32 = 2;
}

/// What to read and what to write.
#[derive(Debug, Clone, Copy)]
pub struct Conversion {
    /// Input is text; otherwise gzip binary.
    pub parse: bool,
    /// Output is gzip binary; otherwise text.
    pub compress: bool,
    pub print: PrintOptions,
}

/// Convert one whole document.
///
/// Text output ends with a newline.
///
/// # Errors
///
/// Returns the library error for whichever stage failed.
pub fn convert(input: &[u8], conv: &Conversion) -> Result<Vec<u8>, Error> {
    let root = if conv.parse {
        parse::parse(input)?
    } else {
        decode::decode(input)?
    };

    if conv.compress {
        tracing::info!("compressing data");
        return encode::encode(&root);
    }

    let mut text = print::render(&root, &conv.print)?;
    text.push('\n');
    Ok(text.into_bytes())
}

/// Human-readable report for a failed conversion.
///
/// Parse failures get the full cause chain with source context.
#[must_use]
pub fn report(err: &Error, input: &[u8], color: bool) -> String {
    match err {
        Error::Parse(e) => e.render(input, color),
        _ if color => format!("\x1b[31mError! {err}\x1b[0m\n"),
        _ => format!("Error! {err}\n"),
    }
}
