//! Pretty URL output paths.

use std::path::{Path, PathBuf};

/// Rewrite `dir/name.ext` to `dir/name/index.html` so the page is served at `/dir/name/`.
///
/// Files whose stem is already `index` are left alone, which makes the
/// transform idempotent.
pub fn prettify_path(path: &Path) -> PathBuf {
    match path.file_stem() {
        Some(stem) if stem != "index" => path
            .parent()
            .unwrap_or(Path::new(""))
            .join(stem)
            .join("index.html"),
        _ => path.to_path_buf(),
    }
}
