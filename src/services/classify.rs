//! Text/binary classification of a stored file's sample.
//!
//! A heuristic, not a content-type detector: the client's declared MIME
//! type is never consulted.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Binary,
}

/// Classify a byte sample.
///
/// Any NUL byte means binary. Otherwise the sample is text iff it is
/// strict UTF-8.
pub fn classify(sample: &[u8]) -> ContentKind {
    if sample.contains(&0) {
        return ContentKind::Binary;
    }

    match std::str::from_utf8(sample) {
        Ok(_) => ContentKind::Text,
        Err(_) => ContentKind::Binary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"\x00\x01\x02\x03".as_slice())]
    #[case(b"hello\x00world".as_slice())]
    #[case(b"\x00".as_slice())]
    #[case("valid utf-8 \u{00e9} but nul\0".as_bytes())]
    fn test_nul_byte_is_binary(#[case] sample: &[u8]) {
        assert_eq!(classify(sample), ContentKind::Binary);
    }

    #[rstest]
    #[case(b"hello\nworld".as_slice())]
    #[case("caf\u{00e9} \u{1f980} \u{4e2d}\u{6587}".as_bytes())]
    #[case(b"".as_slice())]
    #[case(b"\t\r\n".as_slice())]
    fn test_valid_utf8_is_text(#[case] sample: &[u8]) {
        assert_eq!(classify(sample), ContentKind::Text);
    }

    #[rstest]
    #[case(b"\xff\xfe\xfd".as_slice())]
    #[case(b"abc\xc3".as_slice())]
    #[case(b"\x89PNG\r\n\x1a\n".as_slice())]
    fn test_invalid_utf8_is_binary(#[case] sample: &[u8]) {
        assert_eq!(classify(sample), ContentKind::Binary);
    }

    #[test]
    fn test_every_single_byte() {
        for b in 0u8..=255 {
            let expected = if b != 0 && b < 0x80 {
                ContentKind::Text
            } else {
                ContentKind::Binary
            };
            assert_eq!(classify(&[b]), expected, "byte {:#04x}", b);
        }
    }
}
