//! Configuration section definitions.
//!
//! | Section          | Purpose                                          |
//! |------------------|--------------------------------------------------|
//! | `[site]`         | Site metadata (title, author, url)               |
//! | `[build]`        | Content/template/output paths, sitemap, feed     |
//! | `[publications]` | DBLP source, record filters, BibTeX output       |

mod build;
mod publications;
mod site;

pub use build::BuildSection;
pub use publications::PublicationsSection;
pub use site::{DEFAULT_BASE_URL, SiteSection};
