//! `[build]` section configuration.
//!
//! Source directories, output directory and output options.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in isobit.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// content = "site"                     # Content tree
/// output = "www"                       # Output directory
/// templates = ["includes", "layouts"]  # Template search path
/// minify = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSection {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Content source directory.
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Template search directories, earlier entries take precedence.
    #[serde(default = "defaults::build::templates")]
    #[educe(Default = defaults::build::templates())]
    pub templates: Vec<PathBuf>,

    /// Static assets copied verbatim.
    #[serde(default = "defaults::build::assets")]
    #[educe(Default = defaults::build::assets())]
    pub assets: PathBuf,

    /// Scripts rendered as templates.
    #[serde(default = "defaults::build::scripts")]
    #[educe(Default = defaults::build::scripts())]
    pub scripts: PathBuf,

    /// Plain stylesheets rendered as templates.
    #[serde(default = "defaults::build::styles")]
    #[educe(Default = defaults::build::styles())]
    pub styles: PathBuf,

    /// Minify HTML output.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub minify: bool,

    /// Remove the output directory before each build.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_build_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.build.content, PathBuf::from("site"));
        assert_eq!(config.build.output, PathBuf::from("www"));
        assert_eq!(
            config.build.templates,
            vec![PathBuf::from("includes"), PathBuf::from("layouts")]
        );
        assert!(!config.build.minify);
        assert!(!config.build.clean);
    }

    #[test]
    fn test_build_overrides() {
        let config: SiteConfig = toml::from_str(
            r#"
            [build]
            content = "pages"
            output = "public"
            templates = ["layouts"]
            minify = true
        "#,
        )
        .unwrap();

        assert_eq!(config.build.content, PathBuf::from("pages"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.templates, vec![PathBuf::from("layouts")]);
        assert!(config.build.minify);
        assert_eq!(config.build.assets, PathBuf::from("assets"));
    }

    #[test]
    fn test_build_unknown_field() {
        let result: Result<SiteConfig, _> = toml::from_str("[build]\nsass = true");
        assert!(result.is_err());
    }
}
