//! Gzip helpers for the compression cycle

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use oxidelog_core::Result;
use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::path::Path;

/// Gzip `source` onto the end of `archive` as a new gzip member.
///
/// Returns once the encoder is finished and the archive is synced to disk,
/// so the caller may remove `source` afterwards. Returns the number of
/// uncompressed bytes read.
pub fn compress_file(source: &Path, archive: &Path, level: u32) -> Result<u64> {
    let mut input = File::open(source)?;
    let output = OpenOptions::new().create(true).append(true).open(archive)?;

    let mut encoder = GzEncoder::new(output, Compression::new(level.min(9)));
    let bytes = io::copy(&mut input, &mut encoder)?;
    let output = encoder.finish()?;
    output.sync_all()?;

    Ok(bytes)
}

/// Decode every gzip member in `archive` into one string
pub fn decompress_to_string(archive: &Path) -> Result<String> {
    let mut decoder = MultiGzDecoder::new(File::open(archive)?);
    let mut content = String::new();
    decoder.read_to_string(&mut content)?;
    Ok(content)
}
