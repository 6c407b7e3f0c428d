//! HTML to text extraction
//!
//! A small fixed rule set, not a readability engine:
//! - title from `<title>`, then `og:title`
//! - body from the `<p>` elements of the first `<article>` or `<main>` block,
//!   falling back to every long `<p>` on the page
//! - tags stripped, common entities decoded, whitespace collapsed

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Title used when the page names none
pub const UNTITLED: &str = "Untitled Article";

#[allow(clippy::expect_used)] // Infallible with valid static patterns
fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static pattern compiles")
}

static NON_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?is)<(script|style|noscript|template)\b[^>]*>.*?</(?:script|style|noscript|template)\s*>|<!--.*?-->")
});
static TITLE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?is)<title\b[^>]*>(.*?)</title\s*>"));
static META_TAG: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?is)<meta\b[^>]*>"));
static OG_TITLE_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"(?i)\b(?:property|name)\s*=\s*["']og:title["']"#));
static CONTENT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"(?is)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#));
static CONTAINER: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?is)<(article|main)\b[^>]*>(.*?)</(?:article|main)\s*>"));
static PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?is)<p\b[^>]*>(.*?)</p\s*>"));
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)<br\s*/?>"));
static TAG: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?s)<[^>]*>"));
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\s+"));

/// Title and paragraphs extracted from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub paragraphs: Vec<String>,
}

impl ExtractedPage {
    /// Paragraphs joined by blank lines
    #[must_use]
    pub fn body(&self) -> String {
        self.paragraphs.join("\n\n")
    }
}

/// Extract the title and readable paragraphs from an HTML document
#[must_use]
pub fn extract(html: &str, min_paragraph_chars: usize) -> ExtractedPage {
    let html = NON_CONTENT.replace_all(html, " ");

    ExtractedPage {
        title: extract_title(&html).unwrap_or_else(|| UNTITLED.to_string()),
        paragraphs: extract_paragraphs(&html, min_paragraph_chars),
    }
}

/// Page title from `<title>`, falling back to `og:title`
#[must_use]
pub fn extract_title(html: &str) -> Option<String> {
    let from_title = TITLE
        .captures(html)
        .map(|caps| clean_text(&caps[1]))
        .filter(|title| !title.is_empty());

    from_title.or_else(|| {
        META_TAG
            .find_iter(html)
            .map(|tag| tag.as_str())
            .filter(|tag| OG_TITLE_PROPERTY.is_match(tag))
            .find_map(|tag| {
                let caps = CONTENT_ATTR.captures(tag)?;
                let value = caps.get(1).or_else(|| caps.get(2))?.as_str();
                Some(clean_text(value)).filter(|title| !title.is_empty())
            })
    })
}

/// Paragraph texts of the main content
///
/// Uses every non-empty `<p>` inside the first `<article>`/`<main>` block. When
/// the page has no such block, or the block holds no paragraphs, every `<p>`
/// longer than `min_paragraph_chars` characters is used instead.
#[must_use]
pub fn extract_paragraphs(html: &str, min_paragraph_chars: usize) -> Vec<String> {
    if let Some(container) = CONTAINER.captures(html) {
        let paragraphs: Vec<String> = PARAGRAPH
            .captures_iter(&container[2])
            .map(|caps| clean_text(&caps[1]))
            .filter(|text| !text.is_empty())
            .collect();
        if !paragraphs.is_empty() {
            return paragraphs;
        }
    }

    PARAGRAPH
        .captures_iter(html)
        .map(|caps| clean_text(&caps[1]))
        .filter(|text| text.chars().count() > min_paragraph_chars)
        .collect()
}

/// Strip tags, decode entities and collapse whitespace
#[must_use]
pub fn clean_text(fragment: &str) -> String {
    let text = LINE_BREAK.replace_all(fragment, " ");
    let text = TAG.replace_all(&text, "");
    let text = decode_entities(&text);
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Decode named and numeric character references
///
/// Unknown names are left as written.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures<'_>| {
            let entity = &caps[1];
            decode_entity(entity).map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(numeric) = entity.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse().ok()?,
        };
        return char::from_u32(code);
    }

    let decoded = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '–',
        "mdash" => '—',
        "hellip" => '…',
        "laquo" => '«',
        "raquo" => '»',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "copy" => '©',
        _ => return None,
    };
    Some(decoded)
}

/// Cut `text` to at most `max_chars` characters, appending `...` when cut
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: &str = "This paragraph is comfortably longer than fifty characters in total.";

    #[test]
    fn title_from_title_tag() {
        let html = "<html><head><title> Rust &amp; Go </title></head></html>";
        assert_eq!(extract_title(html).as_deref(), Some("Rust & Go"));
    }

    #[test]
    fn title_falls_back_to_og_title() {
        let html = r#"<head><title>  </title><meta content="Open Graph" property="og:title"></head>"#;
        assert_eq!(extract_title(html).as_deref(), Some("Open Graph"));
    }

    #[test]
    fn missing_title_uses_placeholder() {
        let page = extract("<body><p>text</p></body>", 50);
        assert_eq!(page.title, UNTITLED);
    }

    #[test]
    fn paragraphs_come_from_article_block() {
        let html = format!(
            "<p>{LONG} outside</p><article><h1>H</h1><p>Short one.</p><p>Second <b>bold</b> part.</p></article>"
        );
        let paragraphs = extract_paragraphs(&html, 50);
        assert_eq!(paragraphs, ["Short one.", "Second bold part."]);
    }

    #[test]
    fn main_block_is_used_when_first() {
        let html = "<main><p>From main.</p></main><article><p>From article.</p></article>";
        assert_eq!(extract_paragraphs(html, 50), ["From main."]);
    }

    #[test]
    fn fallback_keeps_only_long_paragraphs() {
        let html = format!("<div><p>tiny</p><p>{LONG}</p></div>");
        assert_eq!(extract_paragraphs(&html, 50), [LONG]);
    }

    #[test]
    fn empty_container_falls_back_to_page() {
        let html = format!("<article><div>no paragraphs</div></article><p>{LONG}</p>");
        assert_eq!(extract_paragraphs(&html, 50), [LONG]);
    }

    #[test]
    fn scripts_and_styles_are_ignored() {
        let html = format!(
            "<script>var p = '<p>{LONG}</p>';</script><style>p {{}}</style><p>{LONG}</p>"
        );
        let page = extract(&html, 50);
        assert_eq!(page.paragraphs, [LONG]);
    }

    #[test]
    fn clean_text_collapses_whitespace_and_breaks() {
        assert_eq!(clean_text("a<br/>b\n\n  c\t<i>d</i>"), "a b c d");
    }

    #[test]
    fn decodes_numeric_and_named_entities() {
        assert_eq!(decode_entities("&#1055;&#x440;&laquo;x&raquo;&nbsp;&lt;"), "Пр«x» <");
    }

    #[test]
    fn unknown_entities_are_kept() {
        assert_eq!(decode_entities("&bogus; &amp;"), "&bogus; &");
    }

    #[test]
    fn body_joins_with_blank_lines() {
        let page = ExtractedPage {
            title: "T".to_string(),
            paragraphs: vec!["one".to_string(), "two".to_string()],
        };
        assert_eq!(page.body(), "one\n\ntwo");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("Привет мир", 6), "Привет...");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exact", 5), "exact");
    }
}
