//! Encoding detection for diff display
//!
//! Diffs and index patches work on raw bytes. Encodings only matter when a
//! line is turned into text for display.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// Encoding of a whole buffer, including whether it carried a BOM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding {
    encoding: &'static Encoding,
    bom: bool,
}

impl TextEncoding {
    pub const UTF8: TextEncoding = TextEncoding {
        encoding: UTF_8,
        bom: false,
    };

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn has_bom(&self) -> bool {
        self.bom
    }

    /// Decode one line of a buffer in this encoding, replacing anything malformed.
    ///
    /// `bytes` is the line as split on `\n` bytes with the terminator removed.
    /// For UTF-16 that split falls inside a code unit, so the stray byte it
    /// leaves behind is dropped along with a trailing carriage return.
    pub fn decode_line(&self, bytes: &[u8]) -> String {
        let utf16 = self.encoding == UTF_16LE || self.encoding == UTF_16BE;
        let bytes = match bytes.len() % 2 {
            1 if self.encoding == UTF_16LE => &bytes[1..],
            1 if self.encoding == UTF_16BE => &bytes[..bytes.len() - 1],
            _ => bytes,
        };

        let (text, _) = self.encoding.decode_without_bom_handling(bytes);
        match text.strip_suffix('\r') {
            Some(stripped) if utf16 => stripped.to_string(),
            _ => text.into_owned(),
        }
    }
}

/// Detect the encoding of `bytes`.
///
/// A BOM wins, then strict UTF-8, then the best legacy guess.
pub fn detect_encoding(bytes: &[u8]) -> TextEncoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return TextEncoding {
            encoding,
            bom: true,
        };
    }

    if std::str::from_utf8(bytes).is_ok() {
        return TextEncoding::UTF8;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, false);
    tracing::debug!("Treating non-UTF-8 text as {}", encoding.name());

    TextEncoding {
        encoding,
        bom: false,
    }
}
