//! Front-matter extraction.
//!
//! A content file may start with a relaxed-JSON (JSON5) object body followed
//! by `;;;`. The braces are implied:
//!
//! ```text
//! title: "Wave Glimpse",
//! tags: ['webgl', 'three.js'],
//! ;;;
//! {% extends "post.html" %}
//! ```

use crate::data::PageRecord;
use regex::Regex;
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Leading block up to the first `;;;`, which may span lines.
static FRONT_MATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^;]*);;;").expect("front-matter pattern is valid"));

/// Malformed front-matter in a content file.
#[derive(Debug, Error)]
#[error("{message} in {}", path.display())]
pub struct FrontMatterError {
    pub path: PathBuf,
    pub message: String,
}

/// Split `text` into a page record.
///
/// Files without a front-matter block become all body with only the derived URL.
pub fn extract(relative: &Path, text: &str) -> Result<PageRecord, FrontMatterError> {
    let url = derive_url(relative);

    let Some(captures) = FRONT_MATTER.captures(text) else {
        return Ok(PageRecord {
            source: relative.to_path_buf(),
            url,
            front_matter: Map::new(),
            body: text.to_owned(),
        });
    };

    let block = &captures[1];
    let front_matter = parse_object(&format!("{{{block}}}")).map_err(|message| FrontMatterError {
        path: relative.to_path_buf(),
        message,
    })?;

    Ok(PageRecord {
        source: relative.to_path_buf(),
        url,
        front_matter,
        body: text[captures[0].len()..].to_owned(),
    })
}

/// Parse a JSON5 document that must be an object.
pub fn parse_object(source: &str) -> Result<Map<String, Value>, String> {
    match json5::from_str::<Value>(source) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected an object, found `{other}`")),
        Err(err) => Err(err.to_string()),
    }
}

/// Site URL for a content path: `/<dir>/<file stem>`.
///
/// `index.html` → `/index`, `blog/first.html` → `/blog/first`
pub fn derive_url(relative: &Path) -> String {
    let mut url = String::from("/");

    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            if let Component::Normal(name) = component {
                url.push_str(&name.to_string_lossy());
                url.push('/');
            }
        }
    }

    if let Some(stem) = relative.file_stem() {
        url.push_str(&stem.to_string_lossy());
    }
    url
}
