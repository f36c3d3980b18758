use anyhow::{bail, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Outcome of sniffing the raw bytes of one CSV member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detected {
    pub encoding: &'static Encoding,
    /// Length of the byte-order mark to skip, 0 when there is none.
    pub bom_len: usize,
}

/// Guess the text encoding of `bytes`.
///
/// A byte-order mark wins. Otherwise valid UTF-8 is UTF-8 and anything else
/// is read as Windows-1252, the legacy encoding the publications fall back to.
pub fn detect_encoding(bytes: &[u8]) -> Detected {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return Detected { encoding, bom_len };
    }
    let encoding = if std::str::from_utf8(bytes).is_ok() {
        UTF_8
    } else {
        WINDOWS_1252
    };
    Detected {
        encoding,
        bom_len: 0,
    }
}

/// Detect and decode in one go. Returns the text and the encoding used.
pub fn decode_text(bytes: &[u8]) -> Result<(String, &'static Encoding)> {
    let detected = detect_encoding(bytes);
    let (text, had_errors) = detected
        .encoding
        .decode_without_bom_handling(&bytes[detected.bom_len..]);
    if had_errors {
        bail!(
            "malformed {} data after byte-order mark",
            detected.encoding.name()
        );
    }
    Ok((text.into_owned(), detected.encoding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::UTF_16LE;

    #[test]
    fn plain_utf8() {
        let (text, enc) = decode_text("Metric,Value\nNet cost (£),1\n".as_bytes()).unwrap();
        assert_eq!(enc, UTF_8);
        assert!(text.contains("(£)"));
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"Year,Value\n");
        let (text, enc) = decode_text(&bytes).unwrap();
        assert_eq!(enc, UTF_8);
        assert!(text.starts_with("Year"));
    }

    #[test]
    fn windows_1252_pound_sign() {
        // 0xA3 is `£` in Windows-1252 and invalid on its own in UTF-8
        let bytes = b"Metric\nAverage cost (\xA3)\n";
        let (text, enc) = decode_text(bytes).unwrap();
        assert_eq!(enc, WINDOWS_1252);
        assert_eq!(text, "Metric\nAverage cost (£)\n");
    }

    #[test]
    fn utf16_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Year\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let detected = detect_encoding(&bytes);
        assert_eq!(detected.encoding, UTF_16LE);
        assert_eq!(detected.bom_len, 2);
        let (text, _) = decode_text(&bytes).unwrap();
        assert_eq!(text, "Year\n");
    }

    #[test]
    fn broken_utf8_after_bom_is_fatal() {
        let bytes = [0xEF, 0xBB, 0xBF, b'a', 0xFF, b'b'];
        assert!(decode_text(&bytes).is_err());
    }
}
