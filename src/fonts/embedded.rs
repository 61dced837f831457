//! Fonts compiled into the binary.
//!
//! Embedding removes the need to ship the file next to the executable at the cost of
//! binary size. The data is gzip compressed and inflated once at setup.

use crate::ShowcaseResult;
use flate2::read::GzDecoder;
use std::io::Read;

/// DejaVu Sans Mono, gzip compressed.
pub static MONO_TTF_GZ: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf.gz");

/// Inflates a gzip compressed font.
pub fn inflate(compressed: &[u8]) -> ShowcaseResult<Vec<u8>> {
    let mut data = Vec::with_capacity(compressed.len() * 2);
    GzDecoder::new(compressed).read_to_end(&mut data)?;
    log::debug!(
        "Inflated embedded font from {} to {} bytes",
        compressed.len(),
        data.len()
    );
    Ok(data)
}

pub fn mono_ttf() -> ShowcaseResult<Vec<u8>> {
    inflate(MONO_TTF_GZ)
}
