//! Auxiliary outputs generated from the rendered posts.
//!
//! - **Index**: blog listing page (`blog/index.html`)
//! - **Sitemap**: search engine indexing (`sitemap.xml`)
//! - **Robots**: crawler rules pointing at the sitemap (`robots.txt`)
//! - **Feed**: RSS 2.0 feed of dated posts
//!
//! All of them work on the `Post` list returned by the blog build, so no
//! source file is read twice.

pub mod feed;
pub mod index;
pub mod robots;
pub mod sitemap;

use anyhow::{Context, Result};
use std::{borrow::Cow, fs, path::Path};

/// Strip indentation and line breaks between tags when `enabled`.
///
/// Non-UTF-8 input is returned unchanged.
pub fn minify_xml(content: &[u8], enabled: bool) -> Cow<'_, [u8]> {
    let xml_str = match std::str::from_utf8(content) {
        Ok(s) if enabled => s,
        _ => return Cow::Borrowed(content),
    };
    let minified = xml_str
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("");
    Cow::Owned(minified.into_bytes())
}

/// Write a generated file, creating parent directories.
pub fn write_output(path: &Path, content: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
