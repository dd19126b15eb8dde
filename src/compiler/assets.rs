//! Scripts, styles and static assets.
//!
//! Scripts and plain stylesheets are templates too: they see `site`, so a
//! script can reference `{{ site.assets_url }}` or call `asset(path=...)`.
//! Assets are copied byte for byte.

use super::render::Renderer;
use super::{BuildReport, is_up_to_date};
use crate::config::SiteConfig;
use crate::log;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::Map;
use std::fs;
use std::path::{Path, PathBuf};

/// Render every file under `config.build.scripts` into `<output><scripts_url>`.
pub fn render_scripts(
    files: &[PathBuf],
    renderer: &Renderer,
    config: &SiteConfig,
    on_progress: impl Fn() + Sync,
) -> BuildReport {
    let dest = config.output_for_url(&config.site.scripts_url);
    render_all(files, &config.build.scripts, &dest, renderer, config, on_progress)
}

/// Render plain `.css` files under `config.build.styles` into `<output><styles_url>`.
///
/// Anything else (`.scss` sources, editor files) is skipped with a warning.
pub fn render_styles(
    files: &[PathBuf],
    renderer: &Renderer,
    config: &SiteConfig,
    on_progress: impl Fn() + Sync,
) -> BuildReport {
    let (css, other): (Vec<_>, Vec<_>) = files.iter().cloned().partition(|path| is_css(path));

    for path in &other {
        log!("warn"; "skipping stylesheet {}, only plain .css is supported", path.display());
        on_progress();
    }

    let dest = config.output_for_url(&config.site.styles_url);
    let mut report = render_all(&css, &config.build.styles, &dest, renderer, config, on_progress);
    report.skipped += other.len();
    report
}

/// Copy every file under `config.build.assets` into `<output><assets_url>`.
///
/// Destinations newer than their source are left alone unless `clean` is set.
pub fn copy_assets(files: &[PathBuf], config: &SiteConfig, on_progress: impl Fn() + Sync) -> BuildReport {
    let dest_dir = config.output_for_url(&config.site.assets_url);
    let clean = config.build.clean;

    files
        .par_iter()
        .map(|path| {
            let result = copy_asset(path, &config.build.assets, &dest_dir, clean);
            on_progress();
            match result {
                Ok(true) => BuildReport::rendered(),
                Ok(false) => BuildReport::skipped(),
                Err(err) => BuildReport::failed(path, &err),
            }
        })
        .reduce(BuildReport::default, BuildReport::merge)
}

fn render_all(
    files: &[PathBuf],
    src_dir: &Path,
    dest_dir: &Path,
    renderer: &Renderer,
    config: &SiteConfig,
    on_progress: impl Fn() + Sync,
) -> BuildReport {
    let site = config.site.to_value();

    files
        .par_iter()
        .map(|path| {
            let result = render_file(path, src_dir, dest_dir, renderer, &site);
            on_progress();
            match result {
                Ok(()) => BuildReport::rendered(),
                Err(err) => BuildReport::failed(path, &err),
            }
        })
        .reduce(BuildReport::default, BuildReport::merge)
}

fn render_file(
    path: &Path,
    src_dir: &Path,
    dest_dir: &Path,
    renderer: &Renderer,
    site: &serde_json::Value,
) -> Result<()> {
    let relative = path.strip_prefix(src_dir)?;
    let body = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let mut context = Map::new();
    context.insert("site".into(), site.clone());
    let output = renderer.render(relative, &body, context)?;

    let dest = dest_dir.join(relative);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&dest, output).with_context(|| format!("failed to write {}", dest.display()))?;
    Ok(())
}

/// Returns `false` when the copy was skipped as up to date.
fn copy_asset(path: &Path, src_dir: &Path, dest_dir: &Path, clean: bool) -> Result<bool> {
    let dest = dest_dir.join(path.strip_prefix(src_dir)?);

    if !clean && is_up_to_date(path, &dest) {
        return Ok(false);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(path, &dest).with_context(|| format!("failed to copy {}", path.display()))?;
    Ok(true)
}

fn is_css(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("css"))
}
