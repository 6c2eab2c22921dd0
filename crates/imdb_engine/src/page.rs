use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use scrape_logging::{preview, scrape_debug, scrape_trace, scrape_warn};
use scraper::{Html, Selector};
use serde_json::Value;

/// The server-rendered data block embedded in every upstream page.
pub const NEXT_DATA_SELECTOR: &str = r#"script[id="__NEXT_DATA__"][type="application/json"]"#;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("invalid selector {selector}: {message}")]
    Selector { selector: String, message: String },
    #[error("Script tag with id '__NEXT_DATA__' not found.")]
    MissingDataMarker,
    #[error("embedded page data is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Decodes a page body to text: BOM, then the `Content-Type` charset, then detection.
///
/// Invalid sequences are replaced rather than rejected; the embedded JSON is
/// still usable when a stray byte sits elsewhere in the markup.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(charset_label)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        scrape_warn!("page body had invalid {} sequences; replaced", used.name());
    }
    text.into_owned()
}

fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(&['"', '\''][..]))
    })
}

/// Parses the `__NEXT_DATA__` script of an HTML document as JSON.
pub fn next_data(html: &str) -> Result<Value, PageError> {
    let selector = Selector::parse(NEXT_DATA_SELECTOR).map_err(|err| PageError::Selector {
        selector: NEXT_DATA_SELECTOR.to_string(),
        message: err.to_string(),
    })?;
    let document = Html::parse_document(html);
    let script = document
        .select(&selector)
        .next()
        .ok_or(PageError::MissingDataMarker)?;

    let text = script.text().collect::<String>();
    scrape_trace!("page data: {} bytes, {}", text.len(), preview(&text, 120));
    serde_json::from_str(&text).map_err(|err| {
        scrape_debug!("unparseable page data: {}", preview(&text, 200));
        PageError::MalformedJson(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_label_is_read_case_insensitively() {
        assert_eq!(charset_label("text/html; Charset=\"ISO-8859-1\""), Some("ISO-8859-1"));
        assert_eq!(charset_label("text/html"), None);
    }

    #[test]
    fn decode_respects_charset_header() {
        let text = decode_body(b"caf\xe9", Some("text/html; charset=ISO-8859-1"));
        assert_eq!(text, "caf\u{e9}");
    }

    #[test]
    fn decode_strips_utf8_bom() {
        assert_eq!(decode_body(b"\xEF\xBB\xBFhello", Some("text/html")), "hello");
    }
}
