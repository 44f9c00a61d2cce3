//! Client filename sanitizing.
//!
//! Reduces a client-supplied filename to something safe to join onto the
//! upload directory. Only directory components are removed and spaces
//! replaced; no other characters are filtered.

/// Keep the final path segment of `raw_name` and replace spaces with `_`.
///
/// Both `/` and `\` count as separators, so `../../etc/passwd` and
/// `..\..\boot.ini` both lose their directory parts.
pub fn sanitize(raw_name: &str) -> String {
    let base = raw_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();
    base.replace(' ', "_")
}

/// Whether a sanitized name can be used as a file inside the upload dir.
///
/// Rejects the empty name (input ended in a separator) and the `.`/`..`
/// entries, which would resolve to a directory.
pub fn is_storable(sanitized: &str) -> bool {
    !matches!(sanitized, "" | "." | "..")
}
