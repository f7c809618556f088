//! Charset handling for fetched pages.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Page body as UTF-8, with the label of the encoding that was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub html: String,
    pub encoding_label: String,
}

/// Decode raw page bytes to UTF-8. Encoding is taken from the BOM, then
/// the `Content-Type` charset parameter, then a statistical guess.
/// Undecodable sequences become replacement characters; decoding never
/// fails.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> DecodedPage {
    let encoding = sniff_encoding(bytes, content_type);
    let (html, actual, _had_errors) = encoding.decode(bytes);
    DecodedPage {
        html: html.into_owned(),
        encoding_label: actual.name().to_string(),
    }
}

fn sniff_encoding(bytes: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    if let Some(label) = content_type.and_then(charset_label) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return encoding;
        }
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Pull the `charset` parameter out of a `Content-Type` header value.
fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        } else {
            None
        }
    })
}
