//! Content fingerprint of a building's notes.
//!
//! Two note sets that differ only in whitespace layout, or in `None`/blank
//! entries, produce the same fingerprint. Any other edit (new note, changed
//! word, changed case) produces a different one.

use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Collapse whitespace runs to one space and trim. Returns `None` for blank input.
pub fn normalize_note(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// SHA-256 (lowercase hex, 64 chars) of the normalized notes joined by `\n`.
pub fn fingerprint<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let cleaned = texts
        .into_iter()
        .flatten()
        .filter_map(normalize_note)
        .collect::<Vec<_>>();

    let mut hasher = Sha256::new();
    hasher.update(cleaned.join("\n").as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(64);
    for b in digest.iter() {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Short prefix for log lines.
pub(crate) fn short(fp: &str) -> &str {
    fp.get(..12).unwrap_or(fp)
}
