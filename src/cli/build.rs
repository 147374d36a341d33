//! Site building orchestration.
//!
//! Build pipeline phases:
//! - **Blog** - render posts, then the blog index
//! - **Publications** - DBLP export to publications page and BibTeX
//! - **SEO** - sitemap, robots.txt and RSS feed from the post list
//!
//! Blog and publications are independent and run in parallel.

use crate::{
    config::SiteConfig,
    generator::{
        feed::build_feed, index::build_blog_index, robots::build_robots, sitemap::build_sitemap,
    },
    log,
    post::{Post, build_posts},
    publication::build_publications,
};
use anyhow::Result;
use std::time::Instant;

/// Build everything: blog and publications in parallel, then SEO files.
pub fn build_site(config: &SiteConfig) -> Result<()> {
    let start = Instant::now();

    let (blog_result, publications_result) =
        rayon::join(|| build_blog(config), || build_publications(config));

    let posts = blog_result?;
    publications_result?;

    if let Some(posts) = posts {
        build_seo(config, &posts)?;
    }

    log!("build"; "done in {:.2?}", start.elapsed());
    Ok(())
}

/// Blog only: posts, index and SEO files.
pub fn build_blog_site(config: &SiteConfig) -> Result<()> {
    if let Some(posts) = build_blog(config)? {
        build_seo(config, &posts)?;
    }
    Ok(())
}

/// Publications page and BibTeX only.
pub fn build_publications_site(config: &SiteConfig) -> Result<()> {
    build_publications(config)
}

/// Posts and blog index. `None` when the blog build was skipped.
fn build_blog(config: &SiteConfig) -> Result<Option<Vec<Post>>> {
    let Some(posts) = build_posts(config)? else {
        return Ok(None);
    };
    build_blog_index(config, &posts)?;
    Ok(Some(posts))
}

/// Sitemap, robots.txt and feed share one resolved base URL.
fn build_seo(config: &SiteConfig, posts: &[Post]) -> Result<()> {
    let base_url = config.base_url();

    let (sitemap_result, feed_result) = rayon::join(
        || {
            build_sitemap(config, &base_url, posts)?;
            build_robots(config, &base_url)
        },
        || build_feed(config, &base_url, posts),
    );

    sitemap_result?;
    feed_result?;
    Ok(())
}
