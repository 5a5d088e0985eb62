//! Gzip envelope around the binary format.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::error::CompressionError;

/// Gzip-compress a buffer at the default level.
///
/// # Errors
///
/// Returns `CompressionError` if the encoder fails.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    let out = encoder.finish()?;
    tracing::debug!(input = data.len(), output = out.len(), "compressed document");
    Ok(out)
}

/// Decompress a gzip buffer in full.
///
/// # Errors
///
/// Returns `CompressionError` if the input is not a valid gzip stream.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut out = Vec::with_capacity(data.len() * 4);
    GzDecoder::new(data).read_to_end(&mut out)?;
    tracing::debug!(input = data.len(), output = out.len(), "decompressed document");
    Ok(out)
}
