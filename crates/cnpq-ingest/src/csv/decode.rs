//! Byte decoding with an ordered list of candidate encodings.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Encodings tried, in order, when the caller does not override them.
///
/// UTF-8 is strict so that a Latin-1 export fails over to Windows-1252
/// instead of being decoded with replacement characters. Windows-1252 is a
/// superset of the printable Latin-1 range and never fails.
pub fn default_encodings() -> Vec<&'static Encoding> {
    vec![UTF_8, WINDOWS_1252]
}

/// Decode `bytes` strictly as `encoding`.
///
/// A byte-order mark matching the encoding is stripped. Returns `None` when
/// the bytes contain sequences that are malformed for the encoding.
pub fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let body = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => &bytes[bom_len..],
        _ => bytes,
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_with_bom_is_stripped() {
        let bytes = b"\xEF\xBB\xBFPROCESSO;VALOR";
        assert_eq!(decode_with(bytes, UTF_8).as_deref(), Some("PROCESSO;VALOR"));
    }

    #[test]
    fn test_latin1_rejected_by_utf8() {
        // "Região" encoded as Latin-1
        let bytes = b"Regi\xE3o";
        assert_eq!(decode_with(bytes, UTF_8), None);
        assert_eq!(decode_with(bytes, WINDOWS_1252).as_deref(), Some("Região"));
    }

    #[test]
    fn test_default_order() {
        let names: Vec<_> = default_encodings().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["UTF-8", "windows-1252"]);
    }
}
