//! Publications page HTML.

use super::{Author, Publication};
use crate::{
    config::SiteConfig,
    generator::write_output,
    log,
    template::{Template, Vars},
    utils::{
        html::{escape, escape_attr},
        path::relative_path,
    },
};
use anyhow::Result;
use std::{cmp::Reverse, path::Path};

/// Publications page template file name.
pub const PUBLICATIONS_TEMPLATE: &str = "publications.html";

const EMPTY_LIST: &str = r#"<p class="bio">No publications found.</p>"#;

/// Render and write `<output>/publications/index.html`.
pub fn write_page(
    config: &SiteConfig,
    name: &str,
    publications: &[Publication],
    bibtex_href: Option<&str>,
) -> Result<()> {
    let template = Template::load(&config.build.template(PUBLICATIONS_TEMPLATE))?;
    let page = render_page(&template, name, publications, bibtex_href);

    let path = config.publications_page();
    write_output(&path, page)?;
    log!("publications"; "publications/index.html");
    Ok(())
}

pub fn render_page(
    template: &Template,
    name: &str,
    publications: &[Publication],
    bibtex_href: Option<&str>,
) -> String {
    let items = render_list(publications);
    let items = if items.is_empty() {
        EMPTY_LIST.to_string()
    } else {
        items
    };
    let bibtex_link = bibtex_href
        .map(|href| {
            format!(
                "<a class=\"bibtex-link\" href=\"{}\" download>BibTeX</a>",
                escape_attr(href)
            )
        })
        .unwrap_or_default();

    let vars = Vars::new()
        .with("name", escape(name))
        .with("items", items)
        .with("bibtexLink", bibtex_link);
    template.render(&vars)
}

/// Year sections, newest year first. Items keep document order within a year.
pub fn render_list(publications: &[Publication]) -> String {
    let mut groups: Vec<(&str, Vec<&Publication>)> = Vec::new();
    for publication in publications {
        match groups.iter_mut().find(|(year, _)| *year == publication.year) {
            Some((_, items)) => items.push(publication),
            None => groups.push((&publication.year, vec![publication])),
        }
    }
    // Stable: years that do not parse keep their relative order at the end
    groups.sort_by_key(|(year, _)| Reverse(year.trim().parse::<i64>().unwrap_or(i64::MIN)));

    groups
        .iter()
        .map(|(year, items)| render_section(year, items))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_section(year: &str, items: &[&Publication]) -> String {
    let year = escape(year);
    let items = items
        .iter()
        .map(|p| render_item(&year, p))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<section class="section">
  <h2 class="section-title">{year}</h2>
  <div class="list">
{items}
  </div>
</section>"#
    )
}

fn render_item(year: &str, publication: &Publication) -> String {
    let meta = if publication.venue.is_empty() {
        year.to_string()
    } else {
        format!("{year} · {}", escape(&publication.venue))
    };

    let title = escape(&publication.title);
    let title = match &publication.link {
        Some(link) => format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{title}</a>"#,
            escape_attr(link)
        ),
        None => title.into_owned(),
    };

    let mut item = format!(
        "    <div class=\"list-item\">\n      <span class=\"meta\">{meta}</span>\n      <strong>{title}</strong>\n"
    );
    let authors = format_authors(&publication.authors);
    if !authors.is_empty() {
        item.push_str(&format!("      <span>{authors}</span>\n"));
    }
    item.push_str("    </div>");
    item
}

/// Comma-separated authors, the site owner highlighted.
pub fn format_authors(authors: &[Author]) -> String {
    authors
        .iter()
        .map(|a| {
            let name = escape(&a.name);
            if a.is_self {
                format!("<span class=\"author-self\">{name}</span>")
            } else {
                name.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Relative link from a page to another output file.
pub fn href_from(page: &Path, target: &Path) -> String {
    let from = page.parent().unwrap_or(page);
    relative_path(from, target)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
