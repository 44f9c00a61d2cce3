//! HTML rendering for upload results.
//!
//! Turns a sample read back from disk into either an escaped text block or
//! a short hex dump, and wraps fragments into a full HTML document.

use crate::config::HEX_PREVIEW_BYTES;
use crate::services::classify::{classify, ContentKind};

const PAGE_HEAD: &str = "<!doctype html><html><head><meta charset='utf-8'>\
<title>Upload result</title></head><body>\n<h2>Upload result</h2>\n";
const PAGE_TAIL: &str = "</body></html>\n";

/// Rendered view of a stored file's sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Empty,
    Text {
        content: String,
        /// Set when the sample was longer than `bound` and was cut.
        truncated: bool,
        bound: usize,
    },
    Binary {
        /// Lowercase hex of at most [`HEX_PREVIEW_BYTES`] leading bytes.
        hex: String,
    },
}

impl Preview {
    /// Build a preview from a sample of up to `max_display_bytes + 1` bytes.
    pub fn from_sample(sample: &[u8], max_display_bytes: usize) -> Self {
        if sample.is_empty() {
            return Self::Empty;
        }

        match classify(sample) {
            ContentKind::Text => {
                let truncated = sample.len() > max_display_bytes;
                let shown = &sample[..sample.len().min(max_display_bytes)];
                Self::Text {
                    content: decode_text(shown),
                    truncated,
                    bound: max_display_bytes,
                }
            }
            ContentKind::Binary => {
                let shown = &sample[..sample.len().min(HEX_PREVIEW_BYTES)];
                Self::Binary {
                    hex: hex::encode(shown),
                }
            }
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Self::Empty => "<p><em>File is empty.</em></p>\n".to_string(),
            Self::Text {
                content,
                truncated,
                bound,
            } => {
                let mut html = String::with_capacity(content.len() + 256);
                if *truncated {
                    html.push_str(&format!(
                        "<p>File is large, showing first {} bytes:</p>\n",
                        bound
                    ));
                }
                html.push_str("<h3>File contents (text)</h3>\n");
                html.push_str(
                    "<pre style='white-space: pre-wrap; word-break: break-word; \
                     border: 1px solid #ccc; padding: 8px;'>",
                );
                html.push_str(&escape_html(content));
                html.push_str("</pre>\n");
                html
            }
            Self::Binary { hex } => format!(
                "<h3>Binary file detected</h3>\n\
                 <p>Displaying a small hex preview (first {} bytes):</p>\n\
                 <pre style='background:#f7f7f7; padding:8px; border:1px solid #ddd;'>{}</pre>\n",
                HEX_PREVIEW_BYTES,
                escape_html(hex)
            ),
        }
    }
}

/// Strict UTF-8, falling back to lossy decoding.
///
/// The fallback only triggers when the display bound splits a multi-byte
/// character, since the full sample already passed classification.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            tracing::debug!(
                valid_up_to = e.valid_up_to(),
                "Text preview is not strict UTF-8, decoding lossily"
            );
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Escape `&`, `<`, `>`, `"` and `'` for use in HTML text and attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap a body fragment in the result page.
pub fn render_document(body: &str) -> String {
    let mut html = String::with_capacity(PAGE_HEAD.len() + body.len() + PAGE_TAIL.len());
    html.push_str(PAGE_HEAD);
    html.push_str(body);
    html.push_str(PAGE_TAIL);
    html
}

/// "Saved file" line with name, on-disk size and location.
pub fn render_saved_summary(name: &str, size_bytes: u64, location: &str) -> String {
    format!(
        "<p>Saved file: <strong>{}</strong> ({} bytes) to <code>{}</code></p>\n",
        escape_html(name),
        size_bytes,
        escape_html(location)
    )
}

/// Link to the stored file under `base_path`.
///
/// Serving that path is left to whatever exposes the upload directory.
pub fn render_download_link(base_path: &str, name: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let href = format!("{}/{}", base, urlencoding::encode(name));
    format!(
        "<p><a href='{}' download>Download the saved file</a></p>\n",
        escape_html(&href)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        let preview = Preview::from_sample(b"", 10);
        assert_eq!(preview, Preview::Empty);
        assert!(preview.to_html().contains("File is empty."));
    }

    #[test]
    fn test_text_preview_is_escaped() {
        let preview = Preview::from_sample(b"<script>alert('x') & \"y\"</script>", 1000);
        let html = preview.to_html();
        assert!(html.contains("File contents (text)"));
        assert!(html.contains(
            "&lt;script&gt;alert(&#x27;x&#x27;) &amp; &quot;y&quot;&lt;/script&gt;"
        ));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("File is large"));
    }

    #[test]
    fn test_text_preview_truncates_at_bound() {
        let sample = vec![b'a'; 11];
        let preview = Preview::from_sample(&sample, 10);
        assert_eq!(
            preview,
            Preview::Text {
                content: "a".repeat(10),
                truncated: true,
                bound: 10,
            }
        );
        assert!(preview
            .to_html()
            .contains("File is large, showing first 10 bytes:"));
    }

    #[test]
    fn test_text_preview_exactly_at_bound_is_not_truncated() {
        let sample = vec![b'a'; 10];
        match Preview::from_sample(&sample, 10) {
            Preview::Text {
                content, truncated, ..
            } => {
                assert_eq!(content.len(), 10);
                assert!(!truncated);
            }
            other => panic!("expected text preview, got {:?}", other),
        }
    }

    #[test]
    fn test_split_multibyte_char_falls_back_to_lossy() {
        // "é" is two bytes; a bound of 2 cuts it in half.
        let sample = "aé".as_bytes();
        match Preview::from_sample(sample, 2) {
            Preview::Text { content, truncated, .. } => {
                assert!(truncated);
                assert_eq!(content, "a\u{fffd}");
            }
            other => panic!("expected text preview, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_preview() {
        let preview = Preview::from_sample(b"\x00\x01\x02\x03", 200_000);
        assert_eq!(
            preview,
            Preview::Binary {
                hex: "00010203".into()
            }
        );
        let html = preview.to_html();
        assert!(html.contains("Binary file detected"));
        assert!(html.contains("first 256 bytes"));
        assert!(html.contains("00010203"));
    }

    #[test]
    fn test_binary_preview_ignores_display_bound() {
        let sample: Vec<u8> = (0..1000u32).map(|i| (i % 256) as u8).collect();
        match Preview::from_sample(&sample, 200_000) {
            Preview::Binary { hex } => {
                assert_eq!(hex.len(), 512);
                assert_eq!(hex, hex::encode(&sample[..256]));
            }
            other => panic!("expected binary preview, got {:?}", other),
        }

        // Even a display bound below 256 leaves the hex preview alone.
        match Preview::from_sample(&sample, 8) {
            Preview::Binary { hex } => assert_eq!(hex.len(), 512),
            other => panic!("expected binary preview, got {:?}", other),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(escape_html("a<b>&c"), "a&lt;b&gt;&amp;c");
        assert_eq!(escape_html("'\""), "&#x27;&quot;");
    }

    #[test]
    fn test_render_document() {
        let doc = render_document("<p>x</p>");
        assert!(doc.starts_with("<!doctype html>"));
        assert!(doc.contains("<h2>Upload result</h2>"));
        assert!(doc.contains("<p>x</p>"));
        assert!(doc.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_download_link_encodes_name() {
        let html = render_download_link("/uploads", "a&b'c.txt");
        assert!(html.contains("href='/uploads/a%26b%27c.txt'"));

        let html = render_download_link("/files/", "report.pdf");
        assert!(html.contains("href='/files/report.pdf'"));
    }

    #[test]
    fn test_saved_summary() {
        let html = render_saved_summary("<x>.txt", 42, "uploads/<x>.txt");
        assert!(html.contains("<strong>&lt;x&gt;.txt</strong> (42 bytes)"));
        assert!(html.contains("<code>uploads/&lt;x&gt;.txt</code>"));
    }
}
