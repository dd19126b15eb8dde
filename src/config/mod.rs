//! Site configuration management for `isobit.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                           |
//! |-------------|---------------------------------------------------|
//! | `[site]`    | Global template data (title, URL prefixes, extra) |
//! | `[build]`   | Source/output directories and output options      |
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "Isobit"
//! description = "A software development blog"
//!
//! [site.extra]
//! github_username = "someone"
//!
//! [build]
//! content = "site"
//! output = "www"
//! minify = true
//! ```

mod build;
pub mod defaults;
mod error;
mod site;

pub use site::join_url;

use build::BuildSection;
use error::ConfigError;
use site::SiteSection;

use crate::cli::Cli;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing isobit.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Global template data
    #[serde(default)]
    pub site: SiteSection,

    /// Build settings
    #[serde(default)]
    pub build: BuildSection,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.get_root().to_owned());

        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        if let Some(args) = cli.build_args() {
            Self::update_option(&mut self.build.minify, args.minify.as_ref());
            self.build.clean |= args.clean;
        }

        self.config_path = Self::normalize_path(&root.join(&cli.config));
        self.update_path_with_root(&root);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    pub fn update_path_with_root(&mut self, root: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.build.content = Self::normalize_path(&root.join(&self.build.content));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.build.assets = Self::normalize_path(&root.join(&self.build.assets));
        self.build.scripts = Self::normalize_path(&root.join(&self.build.scripts));
        self.build.styles = Self::normalize_path(&root.join(&self.build.styles));
        self.build.templates = self
            .build
            .templates
            .iter()
            .map(|dir| Self::normalize_path(&root.join(dir)))
            .collect();
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Output directory for a site URL prefix such as `/_scripts`.
    pub fn output_for_url(&self, url: &str) -> PathBuf {
        self.build.output.join(url.trim_start_matches('/'))
    }

    /// Validate configuration for a build
    pub fn validate(&self) -> Result<()> {
        for (field, url) in [
            ("[site.scripts_url]", &self.site.scripts_url),
            ("[site.styles_url]", &self.site.styles_url),
            ("[site.assets_url]", &self.site.assets_url),
        ] {
            if !url.starts_with('/') {
                bail!(ConfigError::Validation(format!("{field} must start with `/`")));
            }
        }

        if !self.build.content.is_dir() {
            bail!(ConfigError::Validation(format!(
                "[build.content] `{}` is not a directory",
                self.build.content.display()
            )));
        }

        if self.build.output == self.get_root() {
            bail!(ConfigError::Validation(
                "[build.output] must not be the project root".into()
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
