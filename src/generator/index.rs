//! Blog index page.

use super::write_output;
use crate::{
    config::SiteConfig,
    log,
    post::Post,
    template::{Template, Vars},
    utils::html::{escape, escape_attr},
};
use anyhow::Result;

/// Blog index template file name.
pub const INDEX_TEMPLATE: &str = "blog-index.html";

/// Shown when there is nothing to list.
const EMPTY_ITEM: &str = r#"<div class="list-item">
  <span class="meta">No posts yet</span>
  <strong>Coming soon</strong>
  <span>New writing will appear here.</span>
</div>"#;

/// Write `<output>/blog/index.html`. Skipped with a warning when the
/// template is missing.
pub fn build_blog_index(config: &SiteConfig, posts: &[Post]) -> Result<()> {
    let Some(template) = Template::load_optional(&config.build.template(INDEX_TEMPLATE))? else {
        log!("warning"; "{} template not found, skipping blog index", INDEX_TEMPLATE);
        return Ok(());
    };

    let page = render_index(&template, posts);
    let path = config.blog_dir().join("index.html");
    write_output(&path, page)?;

    log!("index"; "blog/index.html");
    Ok(())
}

/// Fill `{{items}}` with one entry per post.
pub fn render_index(template: &Template, posts: &[Post]) -> String {
    let items = if posts.is_empty() {
        EMPTY_ITEM.to_string()
    } else {
        posts.iter().map(render_item).collect::<Vec<_>>().join("\n")
    };
    template.render(&Vars::new().with("items", items))
}

fn render_item(post: &Post) -> String {
    let mut item = String::from("<div class=\"list-item\">\n");
    if !post.date.is_empty() {
        item.push_str(&format!("  <span class=\"meta\">{}</span>\n", escape(&post.date)));
    }
    item.push_str(&format!(
        "  <strong><a href=\"./{}/\">{}</a></strong>\n",
        escape_attr(&post.url_slug()),
        escape(&post.title)
    ));
    if !post.description.is_empty() {
        item.push_str(&format!("  <span>{}</span>\n", escape(&post.description)));
    }
    item.push_str("</div>");
    item
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
    fn test_render_item_full() {
        let html = render_item(&post(
            "hello",
            "---\ntitle: Hello & bye\ndate: 2024-01-01\ndescription: About <things>\n---\n",
        ));
        assert!(html.contains("<span class=\"meta\">2024-01-01</span>"));
        assert!(html.contains("<a href=\"./hello/\">Hello &amp; bye</a>"));
        assert!(html.contains("<span>About &lt;things&gt;</span>"));
    }

    #[test]
    fn test_render_item_minimal() {
        let html = render_item(&post("bare", "text"));
        assert!(!html.contains("class=\"meta\""));
        assert!(html.contains("<a href=\"./bare/\">bare</a>"));
        assert_eq!(html.matches("<span>").count(), 0);
    }

    #[test]
    fn test_render_item_encodes_href() {
        let html = render_item(&post("two words", "x"));
        assert!(html.contains("<a href=\"./two%20words/\">two words</a>"));
    }

    #[test]
    fn test_render_index_empty() {
        let html = render_index(&Template::new("<ul>{{items}}</ul>"), &[]);
        assert!(html.contains("No posts yet"));
        assert!(html.contains("Coming soon"));
    }

    #[test]
    fn test_render_index_keeps_order() {
        let posts = [post("b", "x"), post("a", "x")];
        let html = render_index(&Template::new("{{items}}"), &posts);
        assert!(html.find("./b/").unwrap() < html.find("./a/").unwrap());
    }

    #[test]
    fn test_build_blog_index_without_template() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        build_blog_index(&config, &[]).unwrap();
        assert!(!config.blog_dir().join("index.html").exists());
    }

    #[test]
    fn test_build_blog_index_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let template = config.build.template(INDEX_TEMPLATE);
        fs::create_dir_all(template.parent().unwrap()).unwrap();
        fs::write(&template, "<main>{{items}}</main>").unwrap();

        build_blog_index(&config, &[post("only", "x")]).unwrap();
        let html = fs::read_to_string(config.blog_dir().join("index.html")).unwrap();
        assert!(html.starts_with("<main><div class=\"list-item\">"));
    }
}
