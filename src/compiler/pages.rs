//! Content tree: scan, then render.
//!
//! Scanning is single-threaded so the tree sees entries in traversal order.
//! Rendering starts only once the tree is complete and shares it read-only.

use super::front::{self, FrontMatterError};
use super::render::Renderer;
use super::{BuildReport, DIR_DATA_FILE, is_hidden};
use crate::config::SiteConfig;
use crate::data::{PageRecord, SiteTree};
use crate::utils::{minify::minify_html, url::prettify_path};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Everything the scan produced: the finished tree and the pages to render.
#[derive(Debug, Default)]
pub struct ContentScan {
    pub tree: SiteTree,
    pub pages: Vec<PageRecord>,
    pub report: BuildReport,
}

/// Walk the content directory and assemble the site tree.
///
/// Hidden files and directories are skipped. Files that cannot be read or
/// whose front-matter is malformed are logged, recorded in the report, and
/// left out of both the tree and the output. A directory named `items` is
/// reported and skipped with everything under it.
pub fn scan_content(content: &Path) -> ContentScan {
    let mut scan = ContentScan::default();
    let root_data = read_dir_data(content, Path::new(""), &mut scan.report);
    if let Err(err) = scan.tree.insert_directory(Path::new(""), root_data.as_ref()) {
        scan.report.fail(Path::new(""), &err);
    }

    let mut walker = WalkDir::new(content)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(content).to_path_buf();
                scan.report.fail(&path, &err);
                continue;
            }
        };
        let Ok(relative) = entry.path().strip_prefix(content) else {
            continue;
        };

        if entry.file_type().is_dir() {
            let data = read_dir_data(entry.path(), relative, &mut scan.report);
            if let Err(err) = scan.tree.insert_directory(relative, data.as_ref()) {
                scan.report.fail(relative, &err);
                walker.skip_current_dir();
            }
            continue;
        }
        if entry.file_name() == DIR_DATA_FILE {
            continue;
        }

        let page = read_page(entry.path(), relative).and_then(|page| {
            scan.tree.insert_page(relative, page.data())?;
            Ok(page)
        });
        match page {
            Ok(page) => scan.pages.push(page),
            Err(err) => scan.report.fail(relative, &err),
        }
    }

    scan
}

/// Render every scanned page into the output directory, in parallel.
pub fn render_pages(
    scan: &ContentScan,
    renderer: &Renderer,
    config: &SiteConfig,
    on_progress: impl Fn() + Sync,
) -> BuildReport {
    let site = config.site.to_value();
    let root = scan.tree.to_value();

    scan.pages
        .par_iter()
        .map(|page| {
            let result = write_page(page, &site, &root, renderer, config);
            on_progress();
            match result {
                Ok(()) => BuildReport::rendered(),
                Err(err) => BuildReport::failed(&page.source, &err),
            }
        })
        .reduce(BuildReport::default, BuildReport::merge)
}

/// Template context for a page: `site`, `root`, then the page's own data.
///
/// Page keys win over `site`/`root` when they collide.
pub fn page_context(site: &Value, root: &Value, page: &PageRecord) -> Map<String, Value> {
    let mut context = Map::new();
    context.insert("site".into(), site.clone());
    context.insert("root".into(), root.clone());
    context.extend(page.data());
    context
}

fn write_page(
    page: &PageRecord,
    site: &Value,
    root: &Value,
    renderer: &Renderer,
    config: &SiteConfig,
) -> Result<()> {
    let html = renderer.render(&page.source, &page.body, page_context(site, root, page))?;

    let dest = config.build.output.join(prettify_path(&page.source));
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let html = minify_html(html.as_bytes(), config);
    fs::write(&dest, &*html).with_context(|| format!("failed to write {}", dest.display()))?;
    Ok(())
}

fn read_page(path: &Path, relative: &Path) -> Result<PageRecord> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", relative.display()))?;
    Ok(front::extract(relative, &text)?)
}

/// Front-matter for a directory from its optional `_dir.json5`.
///
/// A malformed file is reported and the directory is kept without data.
fn read_dir_data(dir: &Path, relative: &Path, report: &mut BuildReport) -> Option<Map<String, Value>> {
    let path = dir.join(DIR_DATA_FILE);
    let text = fs::read_to_string(&path).ok()?;
    let data_path = relative.join(DIR_DATA_FILE);

    match front::parse_object(&text) {
        Ok(data) => Some(data),
        Err(message) => {
            let err = FrontMatterError {
                path: data_path.clone(),
                message,
            };
            report.fail(&data_path, &err);
            None
        }
    }
}
