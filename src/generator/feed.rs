//! RSS 2.0 feed of blog posts.
//!
//! Only posts with a parsable `date` are included; the feed keeps the
//! listing order (newest first).

use super::{minify_xml, write_output};
use crate::{config::SiteConfig, log, post::Post};
use anyhow::{Result, anyhow};
use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};

/// Build the RSS feed if enabled.
pub fn build_feed(config: &SiteConfig, base_url: &str, posts: &[Post]) -> Result<()> {
    if !config.build.feed.enable {
        return Ok(());
    }

    let xml = feed_xml(config, base_url, posts)?;
    let xml = minify_xml(xml.as_bytes(), config.build.minify_xml);
    let path = config.build.output.join(&config.build.feed.path);
    write_output(&path, &*xml)?;

    log!("rss"; "{}", config.build.feed.path.display());
    Ok(())
}

fn feed_xml(config: &SiteConfig, base_url: &str, posts: &[Post]) -> Result<String> {
    let base_url = base_url.trim_end_matches('/');
    let items: Vec<_> = posts
        .iter()
        .filter_map(|post| post_to_item(post, base_url))
        .collect();

    let site = &config.site;
    let title = if site.title.is_empty() {
        site.author.clone()
    } else {
        site.title.clone()
    };
    let description = if site.description.is_empty() {
        title.clone()
    } else {
        site.description.clone()
    };

    let channel = ChannelBuilder::default()
        .title(title)
        .link(format!("{base_url}/blog/"))
        .description(description)
        .language(Some(site.language.clone()).filter(|l| !l.is_empty()))
        .generator(Some(env!("CARGO_PKG_NAME").to_string()))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| anyhow!("RSS validation failed: {e}"))?;
    Ok(channel.to_string())
}

fn post_to_item(post: &Post, base_url: &str) -> Option<rss::Item> {
    let pub_date = post.published?.to_rfc2822();
    let link = post.permalink(base_url);

    let categories = post
        .tags
        .iter()
        .map(|tag| CategoryBuilder::default().name(tag.clone()).build())
        .collect::<Vec<_>>();

    Some(
        ItemBuilder::default()
            .title(Some(post.title.clone()))
            .link(Some(link.clone()))
            .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
            .description(Some(post.description.clone()).filter(|d| !d.is_empty()))
            .pub_date(Some(pub_date))
            .categories(categories)
            .build(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use std::{fs, time::SystemTime};

    fn post(slug: &str, raw: &str) -> Post {
        Post::from_source(slug, raw, SystemTime::UNIX_EPOCH, 0)
            .unwrap()
            .0
    }

    #[test]
    fn test_item_requires_date() {
        assert!(post_to_item(&post("undated", "x"), "https://example.com").is_none());
    }

    #[test]
    fn test_item_fields() {
        let p = post(
            "hello",
            "---\ntitle: Hello\ndate: 2024-01-15\ndescription: Intro\ntags: rust, ml\n---\n",
        );
        let item = post_to_item(&p, "https://example.com").unwrap();

        assert_eq!(item.title(), Some("Hello"));
        assert_eq!(item.link(), Some("https://example.com/blog/hello/"));
        assert_eq!(item.description(), Some("Intro"));
        assert_eq!(item.pub_date(), Some("Mon, 15 Jan 2024 00:00:00 GMT"));
        assert_eq!(item.categories().len(), 2);
    }

    #[test]
    fn test_item_link_is_encoded() {
        let p = post("my post", "---\ndate: 2024-01-15\n---\n");
        let item = post_to_item(&p, "https://example.com").unwrap();
        assert_eq!(item.link(), Some("https://example.com/blog/my%20post/"));
    }

    #[test]
    fn test_feed_xml_is_valid_channel() {
        let mut config = test_config(std::path::Path::new("/site"));
        config.site.title = "Notes".into();
        let posts = [post("a", "---\ndate: 2024-01-15\n---\n"), post("b", "x")];

        let xml = feed_xml(&config, "https://example.com", &posts).unwrap();
        assert!(xml.contains("<title>Notes</title>"));
        assert!(xml.contains("<link>https://example.com/blog/</link>"));
        assert_eq!(xml.matches("<item>").count(), 1);
    }

    #[test]
    fn test_build_feed_disabled_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        build_feed(&config, "https://example.org", &[]).unwrap();
        assert!(!config.build.output.join(&config.build.feed.path).exists());
    }

    #[test]
    fn test_build_feed_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.build.feed.enable = true;
        config.site.title = "Notes".into();

        build_feed(&config, "https://example.org", &[]).unwrap();
        let xml = fs::read_to_string(config.build.output.join("blog/rss.xml")).unwrap();
        assert!(xml.contains("<rss"));
    }
}
