//! Folio - a static generator for a personal site with a blog and a
//! publication list.

mod cli;
mod config;
mod generator;
mod image;
mod logger;
mod post;
mod publication;
mod template;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        // Works on plain paths, no site config needed
        Commands::Crop { args } => cli::crop::run_crop(args),
        Commands::Build { .. } => cli::build::build_site(&SiteConfig::load(&cli)?),
        Commands::Posts { .. } => cli::build::build_blog_site(&SiteConfig::load(&cli)?),
        Commands::Publications { .. } => {
            cli::build::build_publications_site(&SiteConfig::load(&cli)?)
        }
    }
}
