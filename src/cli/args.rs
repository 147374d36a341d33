//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Personal site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Project root directory (default: current directory)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Config file path, relative to the project root (default: site.toml)
    #[arg(short = 'C', long, global = true, default_value = "site.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build blog posts, publications, sitemap and robots.txt
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Build only the blog: posts, blog index, sitemap, robots.txt and feed
    #[command(visible_alias = "p")]
    Posts {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Build only the publications page and BibTeX file from the DBLP export
    #[command(visible_alias = "pub")]
    Publications {
        #[command(flatten)]
        build_args: BuildArgs,

        /// DBLP XML export to read (overrides `publications.source`)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        source: Option<PathBuf>,

        /// Enable BibTeX output
        #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        bibtex: Option<bool>,
    },

    /// Crop and resize a portrait image to a square
    Crop {
        #[command(flatten)]
        args: CropArgs,
    },
}

/// Shared build arguments
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Override site URL used for sitemap, robots.txt and feed
    #[arg(short = 'U', long = "site-url", value_hint = clap::ValueHint::Url)]
    pub site_url: Option<String>,

    /// Enable sitemap generation
    #[arg(short = 'S', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub sitemap: Option<bool>,

    /// Enable robots.txt generation
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub robots: Option<bool>,

    /// Enable RSS feed generation
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub rss: Option<bool>,

    /// Include draft posts
    #[arg(short = 'D', long)]
    pub drafts: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Portrait crop arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct CropArgs {
    /// Path to input image
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Path to output image
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Square output size in pixels
    #[arg(long, default_value_t = 250)]
    pub size: u32,

    /// Left offset for crop
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub x: i64,

    /// Top offset for crop
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub y: i64,

    /// Square crop size in pixels (defaults to min(width, height))
    #[arg(long)]
    pub crop_size: Option<u32>,
}

impl Cli {
    /// Build arguments of the active command, if it has any.
    pub fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Build { build_args }
            | Commands::Posts { build_args }
            | Commands::Publications { build_args, .. } => Some(build_args),
            Commands::Crop { .. } => None,
        }
    }

    /// `--verbose` on the active command.
    pub fn verbose(&self) -> bool {
        self.build_args().is_some_and(|args| args.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_defaults() {
        let cli = Cli::try_parse_from(["folio", "build"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        let args = cli.build_args().unwrap();
        assert!(args.sitemap.is_none());
        assert!(!args.drafts);
    }

    #[test]
    fn test_parse_bool_flag_without_value() {
        let cli = Cli::try_parse_from(["folio", "posts", "--rss"]).unwrap();
        assert_eq!(cli.build_args().unwrap().rss, Some(true));

        let cli = Cli::try_parse_from(["folio", "posts", "--sitemap", "false"]).unwrap();
        assert_eq!(cli.build_args().unwrap().sitemap, Some(false));
    }

    #[test]
    fn test_parse_crop() {
        let cli = Cli::try_parse_from([
            "folio", "crop", "--input", "in.jpg", "--output", "out.jpg", "--y", "100",
        ])
        .unwrap();
        assert!(cli.build_args().is_none());
        let Commands::Crop { args } = cli.command else {
            panic!("expected crop command");
        };
        assert_eq!(args.size, 250);
        assert_eq!(args.x, 0);
        assert_eq!(args.y, 100);
        assert_eq!(args.crop_size, None);
    }

    #[test]
    fn test_parse_publications_source() {
        let cli = Cli::try_parse_from(["folio", "pub", "-s", "dblp.xml", "--bibtex", "false"])
            .unwrap();
        let Commands::Publications { source, bibtex, .. } = cli.command else {
            panic!("expected publications command");
        };
        assert_eq!(source, Some(PathBuf::from("dblp.xml")));
        assert_eq!(bibtex, Some(false));
    }

    #[test]
    fn test_verbose_flag() {
        assert!(Cli::try_parse_from(["folio", "posts", "-V"]).unwrap().verbose());
        assert!(!Cli::try_parse_from(["folio", "build"]).unwrap().verbose());
        let crop = Cli::try_parse_from(["folio", "crop", "-i", "a.jpg", "-o", "b.jpg"]).unwrap();
        assert!(!crop.verbose());
    }

    #[test]
    fn test_global_root_after_subcommand() {
        let cli = Cli::try_parse_from(["folio", "build", "--root", "site"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("site")));
    }
}
