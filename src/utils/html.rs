//! HTML and XML escaping.
//!
//! All functions borrow when the input needs no escaping.

use std::borrow::Cow;

/// Replace every char for which `entity` returns `Some`.
fn replace_chars(s: &str, entity: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    let Some(first) = s.find(|c| entity(c).is_some()) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len() + 16);
    out.push_str(&s[..first]);
    for c in s[first..].chars() {
        match entity(c) {
            Some(e) => out.push_str(e),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape text for HTML element content.
pub fn escape(s: &str) -> Cow<'_, str> {
    replace_chars(s, |c| match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    })
}

/// Escape an HTML attribute value (double-quoted).
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape(s)
}

/// Escape XML text and attribute content (sitemap).
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    replace_chars(s, |c| match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&apos;"),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_basic() {
        assert_eq!(escape("<script>"), "&lt;script&gt;");
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape("it's"), "it&#39;s");
    }

    #[test]
    fn test_escape_no_alloc() {
        assert!(matches!(escape("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_unicode_untouched() {
        assert_eq!(escape("Привет <мир>"), "Привет &lt;мир&gt;");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("hello"), "hello");
        assert_eq!(
            escape_xml("https://example.com/?q=a&b=c"),
            "https://example.com/?q=a&amp;b=c"
        );
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }
}
