//! Object-key path derivations.

use crate::error::HandlerError;

/// Derive the transcoding output destination for an upload: the key's
/// trailing segment (the file name) is stripped and the configured output
/// prefix appended exactly once.
///
/// `videos/lesson1/input.mp4` with prefix `hls_output/` becomes
/// `s3://<bucket>/videos/lesson1/hls_output/`.
#[must_use]
pub fn hls_destination(bucket: &str, key: &str, output_prefix: &str) -> String {
    match key.rsplit_once('/') {
        Some((directory, _file)) => format!("s3://{bucket}/{directory}/{output_prefix}"),
        None => format!("s3://{bucket}/{output_prefix}"),
    }
}

/// Extract the section identifier from a processed-output key.
///
/// The identifier is read positionally from the third `/`-separated
/// segment (`courses/101/sectionA/output.m3u8` → `sectionA`); this mirrors
/// the platform's key layout and intentionally nothing more.
///
/// # Errors
/// Returns [`HandlerError::SectionIdUnresolvable`] for keys with fewer
/// than three segments rather than silently misindexing.
pub fn section_id(key: &str) -> Result<&str, HandlerError> {
    let segments: Vec<&str> = key.split('/').collect();
    if segments.len() < 3 {
        return Err(HandlerError::SectionIdUnresolvable {
            key: key.to_owned(),
            segments: segments.len(),
        });
    }
    Ok(segments[2])
}
