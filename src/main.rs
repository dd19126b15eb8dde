//! Isobit - a static site generator for a personal blog.

mod build;
mod cli;
mod compiler;
mod config;
mod data;
mod logger;
mod utils;

use anyhow::{Result, bail};
use build::{build_site, clean_output};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    log!("config"; "using {}", config.config_path.display());

    match &cli.command {
        Commands::Build { .. } => build_site(&config).map(|_| ()),
        Commands::Clean => clean_output(&config),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    if !config_path.exists() {
        bail!("Config file not found: {}", config_path.display());
    }

    let mut config = SiteConfig::from_path(&config_path)?;
    config.update_with_cli(cli);

    if !cli.is_clean() {
        config.validate()?;
    }

    Ok(config)
}
