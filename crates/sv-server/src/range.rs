//! `Range` request header parsing.
//!
//! Only the single-range form `bytes=<start>-[<end>]` is understood. Suffix
//! ranges (`bytes=-N`) and multi-range lists (`bytes=0-1,5-9`) are not
//! supported and are treated as if no `Range` header had been sent, which
//! makes the request a plain full-content request.

use sv_core::{ByteRange, Error, Result};

/// Parse a raw `Range` header value against a resource of `size` bytes.
///
/// - `Ok(None)`: no header, or a value outside the supported grammar.
/// - `Ok(Some(range))`: a satisfiable range, with `end` clamped to `size - 1`.
/// - `Err(Error::RangeNotSatisfiable)`: well-formed, but `start >= size`.
pub fn parse_range_header(value: Option<&str>, size: u64) -> Result<Option<ByteRange>> {
    let Some((start, end)) = value.and_then(split_single_range) else {
        return Ok(None);
    };

    if start >= size {
        return Err(Error::RangeNotSatisfiable { size });
    }

    let last = size - 1;
    let end = end.map_or(last, |e| e.min(last));

    let range = ByteRange::new(start, end);
    if range.is_none() {
        tracing::debug!(start, end, "Ignoring inverted byte range");
    }
    Ok(range)
}

/// Split `bytes=START-END` into `(start, Option<end>)`.
fn split_single_range(value: &str) -> Option<(u64, Option<u64>)> {
    let ranges = value.trim().strip_prefix("bytes=")?;
    let (start_str, end_str) = ranges.split_once('-')?;

    let start = parse_offset(start_str.trim())?;
    let end_str = end_str.trim();
    let end = if end_str.is_empty() {
        None
    } else {
        Some(parse_offset(end_str)?)
    };

    Some((start, end))
}

/// Parse a non-empty run of ASCII digits. `u64::from_str` alone would also
/// accept a leading `+`.
fn parse_offset(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
