//! Blog posts: Markdown files with front matter rendered into HTML pages.
//!
//! Pipeline per post:
//!
//! ```text
//! read -> front matter -> extract $$math$$ -> markdown -> restore math -> template -> write
//! ```
//!
//! - [`meta`] - front matter parsing
//! - [`math`] - display-math placeholders
//! - [`markdown`] - pulldown-cmark rendering with linkify
//! - [`build`] - collection, rendering and ordering

pub mod build;
pub mod markdown;
pub mod math;
pub mod meta;

pub use build::build_posts;
pub use meta::{PostMeta, parse_front_matter};

use crate::utils::date::DateTimeUtc;
use anyhow::Result;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::time::SystemTime;

/// Escaped in a URL path segment, on top of every non-ASCII byte.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A post after metadata resolution, ready for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// File stem, also the URL segment under `/blog/`.
    pub slug: String,
    pub title: String,
    pub description: String,
    /// Date as written in front matter (display only).
    pub date: String,
    /// Update date as written in front matter (display only).
    pub updated: String,
    /// Parsed `date`, if it is a recognised format.
    pub published: Option<DateTimeUtc>,
    /// Sort key in Unix seconds: `published`, else file mtime.
    pub timestamp: i64,
    /// RFC 3339 last-modified: `updated`, else `date`, else mtime.
    pub lastmod: String,
    pub draft: bool,
    pub tags: Vec<String>,
    /// Position in the source listing, used to break timestamp ties.
    pub index: usize,
}

impl Post {
    /// Resolve metadata for a post.
    ///
    /// Returns the post and its Markdown body.
    pub fn from_source<'a>(
        slug: &str,
        raw: &'a str,
        modified: SystemTime,
        index: usize,
    ) -> Result<(Self, &'a str)> {
        let (meta, body) = parse_front_matter(raw)?;

        let mtime = DateTimeUtc::from_system_time(modified);
        let date = meta.date().unwrap_or_default().to_string();
        let updated = meta.updated().unwrap_or_default().to_string();
        let published = DateTimeUtc::parse(&date);

        let timestamp = published
            .or(mtime)
            .map(DateTimeUtc::to_unix_secs)
            .unwrap_or_default();
        let lastmod = DateTimeUtc::parse(&updated)
            .or(published)
            .or(mtime)
            .map(DateTimeUtc::to_rfc3339)
            .unwrap_or_default();

        let post = Self {
            slug: slug.to_string(),
            title: meta.title().unwrap_or(slug).to_string(),
            description: meta.description().unwrap_or_default().to_string(),
            date,
            updated,
            published,
            timestamp,
            lastmod,
            draft: meta.draft,
            tags: meta.tags,
            index,
        };
        Ok((post, body))
    }

    /// Slug percent-encoded for use in a URL.
    pub fn url_slug(&self) -> String {
        utf8_percent_encode(&self.slug, SEGMENT).to_string()
    }

    /// Absolute URL of the post page.
    pub fn permalink(&self, base_url: &str) -> String {
        format!("{base_url}/blog/{}/", self.url_slug())
    }
}

/// Newest first; equal timestamps keep source order.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.index.cmp(&b.index))
    });
}
