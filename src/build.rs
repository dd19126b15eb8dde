//! Site building orchestration.
//!
//! Coordinates content rendering and the script/style/asset stages.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── clean_output()            (when [build] clean is set)
//!     │
//!     ├── scan_content()
//!     │       │
//!     │       └── Walk content dir, extract front-matter → SiteTree
//!     │
//!     └── in parallel, once the tree is complete:
//!             ├── render_pages()    → <output>/<dir>/<name>/index.html
//!             ├── render_scripts()  → <output><scripts_url>/
//!             ├── render_styles()   → <output><styles_url>/
//!             └── copy_assets()     → <output><assets_url>/
//! ```

use crate::{
    compiler::{
        BuildReport, Renderer, collect_all_files, copy_assets, render_pages, render_scripts,
        render_styles, scan_content,
    },
    config::SiteConfig,
    log,
    logger::ProgressBars,
};
use anyhow::{Context, Result, bail};
use std::fs;

/// Build the entire site.
///
/// Individual file failures are logged and collected in the returned report;
/// only setup problems (templates, output directory) abort the build.
pub fn build_site(config: &SiteConfig) -> Result<BuildReport> {
    let output = &config.build.output;

    if config.build.clean {
        clean_output(config)?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    let renderer = Renderer::new(config)?;

    log!("site"; "scanning {}", config.build.content.display());
    let mut scan = scan_content(&config.build.content);
    let mut report = std::mem::take(&mut scan.report);
    log!("site"; "found {} pages", scan.pages.len());

    let scripts = collect_all_files(&config.build.scripts);
    let styles = collect_all_files(&config.build.styles);
    let assets = collect_all_files(&config.build.assets);

    let progress = ProgressBars::new(&[
        ("site", scan.pages.len()),
        ("scripts", scripts.len()),
        ("styles", styles.len()),
        ("assets", assets.len()),
    ]);

    let (site_report, (scripts_report, (styles_report, assets_report))) = rayon::join(
        || render_pages(&scan, &renderer, config, || progress.inc("site")),
        || {
            rayon::join(
                || render_scripts(&scripts, &renderer, config, || progress.inc("scripts")),
                || {
                    rayon::join(
                        || render_styles(&styles, &renderer, config, || progress.inc("styles")),
                        || copy_assets(&assets, config, || progress.inc("assets")),
                    )
                },
            )
        },
    );

    progress.finish();

    report += site_report;
    report += scripts_report;
    report += styles_report;
    report += assets_report;

    log_build_result(&report);
    Ok(report)
}

/// Remove the output directory and everything in it.
pub fn clean_output(config: &SiteConfig) -> Result<()> {
    let output = &config.build.output;

    if output == config.get_root() {
        bail!("Refusing to remove the project root: {}", output.display());
    }
    if !output.exists() {
        return Ok(());
    }

    fs::remove_dir_all(output)
        .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    log!("clean"; "removed {}", output.display());
    Ok(())
}

fn log_build_result(report: &BuildReport) {
    if report.rendered == 0 && report.skipped == 0 && report.is_ok() {
        log!("warn"; "output is empty, check the content directory");
        return;
    }

    log!(
        "build";
        "done: {} written, {} up to date or skipped, {} failed",
        report.rendered,
        report.skipped,
        report.failures.len()
    );
    for failure in &report.failures {
        log!("warn"; "not built: {}", failure.path.display());
    }
}
