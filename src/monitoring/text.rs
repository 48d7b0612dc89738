//! HTML decoding and visible-text extraction

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use scraper::node::Node;
use scraper::Html;

/// Elements whose text is never rendered
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// How far into the document a `<meta>` charset declaration is honoured
const META_PRESCAN_BYTES: usize = 1024;

/// Decode a raw HTML payload into a string.
///
/// Encoding precedence: byte order mark, `Content-Type` charset, `<meta>`
/// charset in the first 1024 bytes, then UTF-8. Undecodable bytes become
/// U+FFFD.
pub fn decode_html(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_from_content_type)
        .or_else(|| sniff_meta_charset(body))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(body);
    text.into_owned()
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        Encoding::for_label(value.trim().trim_matches(|c| c == '"' || c == '\'').as_bytes())
    })
}

fn sniff_meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_PRESCAN_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    head.match_indices("<meta").find_map(|(start, _)| {
        let tag = &head[start..];
        let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
        let value = &tag[tag.find("charset=")? + "charset=".len()..];
        let label: String = value
            .trim_start_matches(|c| c == '"' || c == '\'')
            .chars()
            .take_while(|c| !matches!(c, '"' | '\'' | ';' | '/' | '>') && !c.is_whitespace())
            .collect();
        let encoding = Encoding::for_label(label.as_bytes())?;
        // A meta tag cannot declare UTF-16; the bytes were readable as ASCII
        if encoding == UTF_16LE || encoding == UTF_16BE {
            Some(UTF_8)
        } else {
            Some(encoding)
        }
    })
}

/// Convert an HTML document into lowercase visible text.
///
/// Text nodes are concatenated in document order. Anything inside
/// `script`, `style`, `noscript` or `template` is skipped.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let Node::Text(text) = node.value() else {
                return None;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
            });
            (!hidden).then_some(&**text)
        })
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1251;

    #[test]
    fn should_strip_markup_and_lowercase() {
        // Arrange
        let body = "<html><head><title>Board</title></head><body><h1>Data <b>Breach</b> Detected</h1></body></html>";

        // Act
        let text = extract_text(body);

        // Assert
        assert!(text.contains("data breach detected"));
        assert!(text.contains("board"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn should_tolerate_broken_markup() {
        // Act
        let text = extract_text("<div><p>Leaked DATABASE for sale<div");

        // Assert
        assert!(text.contains("leaked database for sale"));
    }

    #[test]
    fn should_ignore_script_and_style_text() {
        // Arrange
        let body = "<html><head><style>.ransomware { color: red; }</style>\
                    <script>var exploit = 1;</script></head>\
                    <body><noscript>enable credentials</noscript><p>Quiet day</p>\
                    <script type=\"text/javascript\">leaked('database')</script></body></html>";

        // Act
        let text = extract_text(body);

        // Assert
        assert!(text.contains("quiet day"));
        assert!(!text.contains("exploit"), "script text leaked into visible text");
        assert!(!text.contains("ransomware"), "style text leaked into visible text");
        assert!(!text.contains("credentials"));
        assert!(!text.contains("leaked"));
    }

    #[test]
    fn should_replace_invalid_utf8() {
        // Act
        let text = decode_html(b"<p>exploit \xff kit</p>", None);

        // Assert
        assert!(text.contains("exploit"));
        assert!(text.contains('\u{FFFD}'));
        assert!(text.contains("kit"));
    }

    #[test]
    fn should_decode_using_content_type_charset() {
        // Arrange
        let (body, _, _) = WINDOWS_1251.encode("<p>Свежая утечка базы</p>");

        // Act
        let text = decode_html(&body, Some("text/html; charset=\"Windows-1251\""));

        // Assert
        assert_eq!(text, "<p>Свежая утечка базы</p>");
    }

    #[test]
    fn should_decode_using_meta_charset() {
        // Arrange
        let (body, _, _) = WINDOWS_1251.encode(
            "<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1251\"></head>\
             <body><p>Утечка</p></body></html>",
        );

        // Act
        let text = decode_html(&body, Some("text/html"));

        // Assert
        assert!(text.contains("<p>Утечка</p>"));
    }

    #[test]
    fn should_prefer_header_charset_over_meta() {
        // Arrange
        let body = "<meta charset=\"windows-1251\"><p>café</p>".as_bytes();

        // Act
        let text = decode_html(body, Some("text/html; charset=utf-8"));

        // Assert
        assert!(text.contains("café"));
    }

    #[test]
    fn should_fall_back_to_utf8_without_declaration() {
        // Act
        let text = decode_html("<p>утечка</p>".as_bytes(), None);

        // Assert
        assert_eq!(text, "<p>утечка</p>");
    }
}
