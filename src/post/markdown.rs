//! Markdown to HTML rendering using pulldown-cmark.
//!
//! Raw HTML passes through unchanged. On top of CommonMark the renderer
//! enables tables, strikethrough, footnotes, task lists and smart
//! punctuation, and turns bare URLs in text into links.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream, html};
use regex::Regex;
use std::sync::LazyLock;

use crate::utils::html::{escape, escape_attr};

/// Options for markdown rendering
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub task_lists: bool,
    /// Curly quotes, dashes and ellipses
    pub smart_punctuation: bool,
    /// Turn bare `http(s)://` and `www.` URLs into links
    pub linkify: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            smart_punctuation: true,
            linkify: true,
        }
    }
}

impl MarkdownOptions {
    /// Convert to pulldown-cmark Options
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.smart_punctuation {
            opts.insert(Options::ENABLE_SMART_PUNCTUATION);
        }
        opts
    }
}

/// Render markdown to an HTML fragment.
pub fn render(markdown: &str, options: &MarkdownOptions) -> String {
    let parser = TextMergeStream::new(Parser::new_ext(markdown, options.to_pulldown_options()));

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    if options.linkify {
        html::push_html(&mut out, Linkify::new(parser));
    } else {
        html::push_html(&mut out, parser);
    }
    out
}

// ============================================================================
// Linkify
// ============================================================================

static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"]+"#).expect("valid url regex")
});

static RE_HTML_ANCHOR_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<a[\s>]").expect("valid anchor regex"));

static RE_HTML_ANCHOR_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^</a\s*>").expect("valid anchor regex"));

/// Event adapter that links bare URLs in plain text.
///
/// Text inside code blocks, markdown links/images and inline `<a>` HTML
/// is left alone.
struct Linkify<'a, I> {
    inner: I,
    pending: std::vec::IntoIter<Event<'a>>,
    code_depth: usize,
    link_depth: usize,
    html_anchor_depth: usize,
}

impl<'a, I: Iterator<Item = Event<'a>>> Linkify<'a, I> {
    fn new(inner: I) -> Self {
        Self {
            inner,
            pending: Vec::new().into_iter(),
            code_depth: 0,
            link_depth: 0,
            html_anchor_depth: 0,
        }
    }

    fn track(&mut self, event: &Event<'a>) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => self.code_depth += 1,
            Event::End(TagEnd::CodeBlock) => self.code_depth = self.code_depth.saturating_sub(1),
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => self.link_depth += 1,
            Event::End(TagEnd::Link | TagEnd::Image) => {
                self.link_depth = self.link_depth.saturating_sub(1);
            }
            Event::InlineHtml(raw) => {
                let raw = raw.trim_start();
                if RE_HTML_ANCHOR_OPEN.is_match(raw) {
                    self.html_anchor_depth += 1;
                } else if RE_HTML_ANCHOR_CLOSE.is_match(raw) {
                    self.html_anchor_depth = self.html_anchor_depth.saturating_sub(1);
                }
            }
            _ => {}
        }
    }

    const fn in_plain_text(&self) -> bool {
        self.code_depth == 0 && self.link_depth == 0 && self.html_anchor_depth == 0
    }
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for Linkify<'a, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.next() {
            return Some(event);
        }

        let event = self.inner.next()?;
        self.track(&event);

        match event {
            Event::Text(text) if self.in_plain_text() && RE_URL.is_match(&text) => {
                let mut events = linkify_text(&text).into_iter();
                let first = events.next();
                self.pending = events;
                first
            }
            other => Some(other),
        }
    }
}

/// Split text into text and anchor events.
fn linkify_text<'a>(text: &str) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut last = 0;

    for m in RE_URL.find_iter(text) {
        let url = trim_url(m.as_str());
        if url.is_empty() {
            continue;
        }
        let start = m.start();
        let end = start + url.len();

        if start > last {
            events.push(Event::Text(CowStr::from(text[last..start].to_string())));
        }

        let href = if url.len() >= 4 && url[..4].eq_ignore_ascii_case("www.") {
            format!("http://{url}")
        } else {
            url.to_string()
        };
        events.push(Event::InlineHtml(CowStr::from(format!(
            "<a href=\"{}\">{}</a>",
            escape_attr(&href),
            escape(url)
        ))));
        last = end;
    }

    if last < text.len() {
        events.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
    events
}

/// Drop trailing punctuation that usually ends a sentence rather than a URL.
///
/// A closing paren is kept when the URL contains a matching open paren.
fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        let Some(last) = url.chars().last() else {
            return url;
        };
        let trim = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '*' | '_' => true,
            ')' => url.matches('(').count() < url.matches(')').count(),
            _ => false,
        };
        if !trim {
            return url;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md(input: &str) -> String {
        render(input, &MarkdownOptions::default())
    }

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(md("Hello *world*"), "<p>Hello <em>world</em></p>\n");
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = md("<div class=\"note\">hi</div>\n");
        assert!(html.contains("<div class=\"note\">hi</div>"));
    }

    #[test]
    fn test_smart_punctuation() {
        let html = md("\"quoted\" -- and...");
        assert!(html.contains('\u{201c}'));
        assert!(html.contains('\u{201d}'));
        assert!(html.contains('\u{2013}'));
        assert!(html.contains('\u{2026}'));
    }

    #[test]
    fn test_tables_enabled() {
        let html = md("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_linkify_bare_url() {
        let html = md("see https://example.com/path.");
        assert!(
            html.contains("see <a href=\"https://example.com/path\">https://example.com/path</a>."),
            "{html}"
        );
    }

    #[test]
    fn test_linkify_www() {
        let html = md("visit www.example.com today");
        assert!(html.contains("<a href=\"http://www.example.com\">www.example.com</a>"));
    }

    #[test]
    fn test_linkify_url_with_underscores() {
        let html = md("https://example.com/a_b_c");
        assert!(html.contains("href=\"https://example.com/a_b_c\""), "{html}");
    }

    #[test]
    fn test_linkify_keeps_balanced_paren() {
        assert_eq!(
            trim_url("https://en.wikipedia.org/wiki/Rust_(language))"),
            "https://en.wikipedia.org/wiki/Rust_(language)"
        );
        assert_eq!(trim_url("https://example.com)."), "https://example.com");
    }

    #[test]
    fn test_linkify_skips_existing_links() {
        let html = md("[https://example.com](https://example.com)");
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn test_linkify_skips_code() {
        let html = md("`https://example.com`\n\n```\nhttps://example.org\n```\n");
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_linkify_skips_inline_html_anchor() {
        let html = md("<a href=\"/x\">https://example.com</a> and https://b.example");
        assert_eq!(html.matches("<a ").count(), 2);
        assert!(html.contains("<a href=\"https://b.example\">"));
    }

    #[test]
    fn test_linkify_disabled() {
        let options = MarkdownOptions {
            linkify: false,
            ..Default::default()
        };
        assert!(!render("https://example.com", &options).contains("<a "));
    }

    #[test]
    fn test_math_placeholder_survives() {
        assert_eq!(md("@@BLOCKMATH0@@"), "<p>@@BLOCKMATH0@@</p>\n");
    }
}
