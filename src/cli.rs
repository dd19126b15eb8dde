//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Isobit static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Config file name (default: isobit.toml)
    #[arg(short = 'C', long, default_value = "isobit.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared build arguments
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Clean output directory completely before building
    #[arg(long)]
    pub clean: bool,

    /// Minify the html content
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render the content tree, scripts, styles and assets into the output directory
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Deletes the output directory
    Clean,
}

impl Cli {
    pub const fn is_clean(&self) -> bool {
        matches!(self.command, Commands::Clean)
    }

    pub fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Build { build_args } => Some(build_args),
            Commands::Clean => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::parse_from(["isobit", "--root", "blog", "build", "--clean", "--minify"]);
        let args = cli.build_args().unwrap();

        assert_eq!(cli.root, Some(PathBuf::from("blog")));
        assert!(args.clean);
        assert_eq!(args.minify, Some(true));
        assert!(!cli.is_clean());
    }

    #[test]
    fn test_parse_minify_explicit_false() {
        let cli = Cli::parse_from(["isobit", "build", "--minify", "false"]);
        assert_eq!(cli.build_args().unwrap().minify, Some(false));
    }

    #[test]
    fn test_parse_clean_command() {
        let cli = Cli::parse_from(["isobit", "-C", "site.toml", "clean"]);
        assert!(cli.is_clean());
        assert!(cli.build_args().is_none());
        assert_eq!(cli.config, PathBuf::from("site.toml"));
    }
}
