//! Encoding detection and transcoding for HTML byte streams.
//!
//! Bridges to `encoding_rs`. The detection order is a reduced form of the
//! HTML encoding sniffing algorithm:
//!
//! 1. A Byte Order Mark (UTF-8, UTF-16BE, UTF-16LE) wins and is stripped.
//! 2. Otherwise a caller-supplied label, if it names a known encoding.
//! 3. Otherwise a `<meta charset>` / `<meta content="...charset=...">`
//!    declaration found in the first [`PRESCAN_LIMIT`] bytes.
//! 4. Otherwise UTF-8.
//!
//! Decoding never fails: malformed sequences become U+FFFD.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

/// Number of leading bytes inspected for a `<meta>` charset declaration.
pub const PRESCAN_LIMIT: usize = 1024;

/// Detects a Byte Order Mark, returning the encoding it indicates and the
/// number of BOM bytes to skip.
///
/// # Examples
///
/// ```
/// use htmlsift::encoding::detect_bom;
///
/// let (enc, skip) = detect_bom(b"\xEF\xBB\xBFhello").unwrap();
/// assert_eq!(enc.name(), "UTF-8");
/// assert_eq!(skip, 3);
/// assert!(detect_bom(b"<p>").is_none());
/// ```
#[must_use]
pub fn detect_bom(bytes: &[u8]) -> Option<(&'static Encoding, usize)> {
    match bytes {
        [0xEF, 0xBB, 0xBF, ..] => Some((UTF_8, 3)),
        [0xFE, 0xFF, ..] => Some((UTF_16BE, 2)),
        [0xFF, 0xFE, ..] => Some((UTF_16LE, 2)),
        _ => None,
    }
}

/// Looks up an encoding label, applying the HTML rules that a declared
/// UTF-16 means UTF-8 and `x-user-defined` means windows-1252.
fn for_html_label(label: &str) -> Option<&'static Encoding> {
    let encoding = Encoding::for_label(label.trim().as_bytes())?;
    if encoding == UTF_16BE || encoding == UTF_16LE {
        Some(UTF_8)
    } else if encoding.name() == "x-user-defined" {
        Some(WINDOWS_1252)
    } else {
        Some(encoding)
    }
}

/// Scans the start of the input for a `<meta>` charset declaration.
///
/// The scan is byte-oriented and ASCII case-insensitive, so it works before
/// the real encoding is known.
#[must_use]
pub fn prescan_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(PRESCAN_LIMIT)];
    let lower = head.to_ascii_lowercase();

    let mut rest = lower.as_slice();
    while let Some(start) = find(rest, b"<meta") {
        let after = &rest[start + "<meta".len()..];
        let end = after.iter().position(|&b| b == b'>').unwrap_or(after.len());
        let encoding = charset_value(&after[..end])
            .and_then(|label| std::str::from_utf8(label).ok())
            .and_then(for_html_label);
        if encoding.is_some() {
            return encoding;
        }
        rest = &after[end..];
    }
    None
}

/// Extracts the value following `charset=` inside a `<meta ...>` tag.
fn charset_value(tag: &[u8]) -> Option<&[u8]> {
    let pos = find(tag, b"charset")?;
    let after = skip_ascii_whitespace(&tag[pos + "charset".len()..]);
    let after = skip_ascii_whitespace(after.strip_prefix(b"=")?);
    let (value, terminators) = match after.first()? {
        b'"' => (&after[1..], b"\"".as_slice()),
        b'\'' => (&after[1..], b"'".as_slice()),
        _ => (after, b" \t\n\r\x0C;\"'/".as_slice()),
    };
    let end = value
        .iter()
        .position(|b| terminators.contains(b))
        .unwrap_or(value.len());
    let value = &value[..end];
    (!value.is_empty()).then_some(value)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn skip_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

/// Decodes raw HTML bytes into a UTF-8 string.
///
/// `label` is an optional caller-supplied encoding label; it is ignored when
/// a BOM is present or when it names no known encoding. Returns the decoded
/// text and the encoding that was used.
///
/// # Examples
///
/// ```
/// use htmlsift::encoding::decode_to_utf8;
///
/// let (text, enc) = decode_to_utf8(b"<meta charset=\"latin1\"><p>caf\xE9</p>", None);
/// assert!(text.contains("café"));
/// assert_eq!(enc.name(), "windows-1252");
/// ```
#[must_use]
pub fn decode_to_utf8(bytes: &[u8], label: Option<&str>) -> (String, &'static Encoding) {
    let (encoding, content) = match detect_bom(bytes) {
        Some((encoding, skip)) => (encoding, &bytes[skip..]),
        None => {
            let encoding = label
                .and_then(for_html_label)
                .or_else(|| prescan_meta_charset(bytes))
                .unwrap_or(UTF_8);
            (encoding, bytes)
        }
    };

    if encoding == UTF_8 {
        if let Ok(text) = std::str::from_utf8(content) {
            return (text.to_string(), encoding);
        }
    }

    let (text, _had_errors) = encoding.decode_without_bom_handling(content);
    (text.into_owned(), encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_utf8_bom() {
        assert_eq!(detect_bom(b"\xEF\xBB\xBF<p>"), Some((UTF_8, 3)));
    }

    #[test]
    fn test_detect_utf16_boms() {
        assert_eq!(detect_bom(b"\xFE\xFF\x00<"), Some((UTF_16BE, 2)));
        assert_eq!(detect_bom(b"\xFF\xFE<\x00"), Some((UTF_16LE, 2)));
    }

    #[test]
    fn test_detect_no_bom() {
        assert_eq!(detect_bom(b""), None);
        assert_eq!(detect_bom(b"\xEF"), None);
    }

    #[test]
    fn test_prescan_meta_charset() {
        assert_eq!(
            prescan_meta_charset(b"<html><head><META CHARSET='ISO-8859-1'>"),
            Some(WINDOWS_1252)
        );
    }

    #[test]
    fn test_prescan_http_equiv() {
        let html = b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=shift_jis\">";
        assert_eq!(prescan_meta_charset(html).map(Encoding::name), Some("Shift_JIS"));
    }

    #[test]
    fn test_prescan_utf16_declaration_means_utf8() {
        assert_eq!(prescan_meta_charset(b"<meta charset=utf-16>"), Some(UTF_8));
    }

    #[test]
    fn test_prescan_skips_meta_without_charset() {
        let html = b"<meta name=viewport content=width><meta charset=koi8-r>";
        assert_eq!(prescan_meta_charset(html).map(Encoding::name), Some("KOI8-R"));
    }

    #[test]
    fn test_prescan_absent() {
        assert_eq!(prescan_meta_charset(b"<p>charset=latin1</p>"), None);
    }

    #[test]
    fn test_decode_utf8() {
        let (text, enc) = decode_to_utf8("<p>héllo</p>".as_bytes(), None);
        assert_eq!(text, "<p>héllo</p>");
        assert_eq!(enc, UTF_8);
    }

    #[test]
    fn test_decode_strips_bom() {
        let (text, _) = decode_to_utf8(b"\xEF\xBB\xBF<p>", None);
        assert_eq!(text, "<p>");
    }

    #[test]
    fn test_decode_utf16le_bom() {
        let (text, enc) = decode_to_utf8(b"\xFF\xFE<\x00p\x00>\x00", None);
        assert_eq!(text, "<p>");
        assert_eq!(enc, UTF_16LE);
    }

    #[test]
    fn test_decode_with_label() {
        let (text, enc) = decode_to_utf8(b"caf\xE9", Some("iso-8859-1"));
        assert_eq!(text, "café");
        assert_eq!(enc, WINDOWS_1252);
    }

    #[test]
    fn test_decode_unknown_label_falls_back() {
        let (text, enc) = decode_to_utf8(b"plain", Some("no-such-encoding"));
        assert_eq!(text, "plain");
        assert_eq!(enc, UTF_8);
    }

    #[test]
    fn test_decode_invalid_utf8_replaces() {
        let (text, enc) = decode_to_utf8(b"a\xFFb", None);
        assert_eq!(text, "a\u{FFFD}b");
        assert_eq!(enc, UTF_8);
    }
}
