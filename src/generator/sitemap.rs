//! Sitemap generation.
//!
//! Lists the site's fixed pages plus every post for search engine indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url><loc>https://example.com/</loc></url>
//!   <url><loc>https://example.com/blog/hello/</loc><lastmod>2025-01-01T00:00:00Z</lastmod></url>
//! </urlset>
//! ```

use super::{minify_xml, write_output};
use crate::{config::SiteConfig, log, post::Post, utils::html::escape_xml};
use anyhow::Result;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Sitemap file name inside the public directory.
pub const SITEMAP_FILE: &str = "sitemap.xml";

/// Pages that always exist, relative to the base URL.
const FIXED_PATHS: [&str; 3] = ["/", "/blog/", "/publications/"];

/// Build sitemap if enabled.
pub fn build_sitemap(config: &SiteConfig, base_url: &str, posts: &[Post]) -> Result<()> {
    if !config.build.sitemap.enable {
        return Ok(());
    }

    let xml = Sitemap::build(base_url, posts).into_xml();
    let xml = minify_xml(xml.as_bytes(), config.build.minify_xml);
    let path = config.build.public.join(SITEMAP_FILE);
    write_output(&path, &*xml)?;

    log!("sitemap"; "{}", SITEMAP_FILE);
    Ok(())
}

struct Sitemap {
    urls: Vec<UrlEntry>,
}

struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
}

impl Sitemap {
    fn build(base_url: &str, posts: &[Post]) -> Self {
        let base_url = base_url.trim_end_matches('/');

        let fixed = FIXED_PATHS.iter().map(|path| UrlEntry {
            loc: format!("{base_url}{path}"),
            lastmod: None,
        });
        let pages = posts.iter().map(|post| UrlEntry {
            loc: post.permalink(base_url),
            lastmod: Some(post.lastmod.clone()).filter(|m| !m.is_empty()),
        });

        Self {
            urls: fixed.chain(pages).collect(),
        }
    }

    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(256 + self.urls.len() * 96);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for entry in self.urls {
            xml.push_str("  <url><loc>");
            xml.push_str(&escape_xml(&entry.loc));
            xml.push_str("</loc>");
            if let Some(lastmod) = entry.lastmod {
                xml.push_str("<lastmod>");
                xml.push_str(&escape_xml(&lastmod));
                xml.push_str("</lastmod>");
            }
            xml.push_str("</url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}
