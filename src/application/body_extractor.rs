//! Slices the note body out of an ENML document.
//!
//! ENML wraps the content in a single `<en-note ...>` root after an XML
//! declaration and doctype. Everything between the end of the opening tag
//! and the closing marker is returned untouched.

use crate::domain::{AppError, Result};

const ROOT_OPEN: &[u8] = b"<en-note";
const ROOT_CLOSE: &[u8] = b"</en-note";

/// Returns the bytes between the `<en-note>` opening tag and its closing marker.
///
/// # Errors
/// Returns a `Format` error if either marker or the end of the opening tag
/// is missing.
pub fn extract(raw: &[u8]) -> Result<&[u8]> {
    let open = find(raw, ROOT_OPEN, 0)
        .ok_or_else(|| AppError::format("missing <en-note> opening tag"))?;
    let open_end = find(raw, b">", open)
        .ok_or_else(|| AppError::format("unterminated <en-note> opening tag"))?;
    let close = find(raw, ROOT_CLOSE, open_end)
        .ok_or_else(|| AppError::format("missing </en-note> closing tag"))?;

    Ok(&raw[open_end + 1..close])
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}
