//! Blog build: collect sources, render pages in parallel, order for listing.

use super::{
    Post,
    markdown::{self, MarkdownOptions},
    math::{extract_block_math, restore_block_math},
    sort_posts,
};
use crate::{
    config::SiteConfig,
    debug, log,
    template::{Template, Vars},
    utils::{html::escape, path::root_prefix, plural_count},
};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Post page template file name.
pub const POST_TEMPLATE: &str = "blog-post.html";

/// Render every post and return the listable ones, newest first.
///
/// `None` when there is no content directory: the blog build is skipped.
/// Individual posts that fail are reported and left out.
pub fn build_posts(config: &SiteConfig) -> Result<Option<Vec<Post>>> {
    let content_dir = &config.build.content;
    if !content_dir.is_dir() {
        log!("warning"; "no content directory at {}, skipping blog build", content_dir.display());
        return Ok(None);
    }

    let template = Template::load(&config.build.template(POST_TEMPLATE))?;
    let sources = collect_sources(content_dir)?;
    let blog_dir = config.blog_dir();
    let options = MarkdownOptions::default();

    let results: Vec<Option<Post>> = sources
        .par_iter()
        .enumerate()
        .map(|(index, path)| {
            match build_post(path, index, &template, &blog_dir, config, &options) {
                Ok(post) => post,
                Err(e) => {
                    log!("warning"; "skipping {}: {:#}", path.display(), e);
                    None
                }
            }
        })
        .collect();

    let mut posts: Vec<Post> = results.into_iter().flatten().collect();
    sort_posts(&mut posts);

    log!("posts"; "{} rendered", plural_count(posts.len(), "post"));
    Ok(Some(posts))
}

/// `*.md` files directly inside `dir`, sorted by file name.
pub fn collect_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Render one post. `Ok(None)` for drafts that are not being built.
fn build_post(
    path: &Path,
    index: usize,
    template: &Template,
    blog_dir: &Path,
    config: &SiteConfig,
    options: &MarkdownOptions,
) -> Result<Option<Post>> {
    let slug = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .with_context(|| format!("no file name in {}", path.display()))?;
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("Failed to stat {}", path.display()))?;

    let (post, body) = Post::from_source(&slug, &raw, modified, index)?;
    if post.draft && !config.build.drafts {
        debug!("posts"; "draft skipped: {}", slug);
        return Ok(None);
    }

    let content = render_body(body, options);
    let out_dir = blog_dir.join(&post.slug);
    let prefix = root_prefix(&out_dir, &config.build.output);
    let page = render_page(template, &post, &content, &prefix);

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let out_file = out_dir.join("index.html");
    fs::write(&out_file, page)
        .with_context(|| format!("Failed to write {}", out_file.display()))?;

    debug!("posts"; "{} -> {}", path.display(), out_file.display());
    Ok(Some(post))
}

/// Markdown body to HTML, with display math preserved verbatim.
pub fn render_body(body: &str, options: &MarkdownOptions) -> String {
    let extracted = extract_block_math(body);
    let html = markdown::render(&extracted.text, options);
    restore_block_math(&html, &extracted.blocks)
}

/// Fill the post template.
///
/// `prefix` leads from the post's directory to the output root.
pub fn render_page(template: &Template, post: &Post, content: &str, prefix: &str) -> String {
    let date_line = if post.date.is_empty() {
        String::new()
    } else {
        format!("<p class=\"meta\">Published {}</p>", escape(&post.date))
    };
    let updated_line = if post.updated.is_empty() {
        String::new()
    } else {
        format!("<p class=\"meta\">Updated {}</p>", escape(&post.updated))
    };

    let vars = Vars::new()
        .with("title", escape(&post.title))
        .with("description", escape(&post.description))
        .with("dateLine", date_line)
        .with("updatedLine", updated_line)
        .with("content", content)
        .with("assetPrefix", prefix)
        .with("homeLink", prefix)
        .with("blogLink", format!("{prefix}blog/"))
        .with("pubLink", format!("{prefix}publications/"));

    template.render(&vars)
}
