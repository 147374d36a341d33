//! `robots.txt` pointing crawlers at the sitemap.

use super::{sitemap::SITEMAP_FILE, write_output};
use crate::{config::SiteConfig, log};
use anyhow::Result;

/// Build robots.txt if enabled.
pub fn build_robots(config: &SiteConfig, base_url: &str) -> Result<()> {
    if !config.build.robots.enable {
        return Ok(());
    }

    let path = config.build.public.join("robots.txt");
    write_output(&path, robots_txt(base_url))?;

    log!("robots"; "robots.txt");
    Ok(())
}

fn robots_txt(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nSitemap: {}/{SITEMAP_FILE}\n",
        base_url.trim_end_matches('/')
    )
}
