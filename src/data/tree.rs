//! Nested content tree keyed by directory path.
//!
//! Entries must be inserted in traversal order. Nodes are created on demand,
//! so a page can be inserted before (or without) its directory entry.

use crate::log;
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Key of the page list inside every directory node.
pub const ITEMS_KEY: &str = "items";

/// A directory named like the page list would replace it.
#[derive(Debug, Error)]
#[error("directory `{}` is named `{ITEMS_KEY}`, which is reserved for the page list", path.display())]
pub struct ReservedName {
    pub path: PathBuf,
}

/// Directory-keyed aggregation of page data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteTree {
    root: Map<String, Value>,
}

impl SiteTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a directory: make sure its node has an `items` list and merge
    /// its front-matter fields into the node.
    ///
    /// An `items` field in the front-matter is ignored so the page list
    /// survives the merge.
    pub fn insert_directory(
        &mut self,
        path: &Path,
        front_matter: Option<&Map<String, Value>>,
    ) -> Result<(), ReservedName> {
        let node = resolve_mut(&mut self.root, &checked_segments(path)?);
        ensure_items(node);

        for (key, value) in front_matter.into_iter().flatten() {
            if key == ITEMS_KEY {
                log!("warn"; "{}: ignoring `{ITEMS_KEY}` in directory data", path.display());
                continue;
            }
            node.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    /// Append a page's data to the `items` list of its parent directory.
    ///
    /// Pages are never de-duplicated: two pages with the same URL both stay.
    pub fn insert_page(&mut self, path: &Path, data: Map<String, Value>) -> Result<(), ReservedName> {
        let parent = path.parent().unwrap_or(Path::new(""));
        let node = resolve_mut(&mut self.root, &checked_segments(parent)?);
        ensure_items(node).push(Value::Object(data));
        Ok(())
    }

    /// Node for a directory path (`""` is the root).
    pub fn node(&self, path: &Path) -> Option<&Map<String, Value>> {
        let mut node = &self.root;
        for segment in segments(path) {
            node = node.get(&segment)?.as_object()?;
        }
        Some(node)
    }

    /// Pages directly under a directory, in insertion order.
    pub fn items(&self, path: &Path) -> &[Value] {
        self.node(path)
            .and_then(|node| node.get(ITEMS_KEY))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Template view of the whole tree.
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }
}

/// Split a relative path into its directory/file name segments.
fn segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Segments of a directory path, refusing any named [`ITEMS_KEY`].
fn checked_segments(dir: &Path) -> Result<Vec<String>, ReservedName> {
    let segments = segments(dir);
    if segments.iter().any(|segment| segment == ITEMS_KEY) {
        return Err(ReservedName {
            path: dir.to_path_buf(),
        });
    }
    Ok(segments)
}

/// Walk down `segments`, creating intermediate nodes as needed.
///
/// A non-object value in the way (e.g. a front-matter scalar sharing a name
/// with a sub-directory) is replaced by an empty node.
fn resolve_mut<'a>(mut node: &'a mut Map<String, Value>, segments: &[String]) -> &'a mut Map<String, Value> {
    for segment in segments {
        let slot = node
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            log!("warn"; "`{segment}` is both a value and a directory, keeping the directory");
        }
        node = as_node(slot);
    }
    node
}

fn as_node(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just replaced by an object"),
    }
}

/// The node's `items` list, created empty when missing.
fn ensure_items(node: &mut Map<String, Value>) -> &mut Vec<Value> {
    let items = node
        .entry(ITEMS_KEY)
        .or_insert_with(|| Value::Array(Vec::new()));
    if !items.is_array() {
        *items = Value::Array(Vec::new());
    }
    match items {
        Value::Array(list) => list,
        _ => unreachable!("items was just replaced by an array"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(url: &str) -> Map<String, Value> {
        json!({ "url": url }).as_object().cloned().unwrap()
    }

    #[test]
    fn test_root_pages() {
        let mut tree = SiteTree::new();
        tree.insert_page(Path::new("index.html"), page("/index")).unwrap();
        tree.insert_page(Path::new("about.html"), page("/about")).unwrap();

        let items = tree.items(Path::new(""));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["url"], "/index");
        assert_eq!(items[1]["url"], "/about");
    }

    #[test]
    fn test_items_count_matches_direct_files() {
        let mut tree = SiteTree::new();
        tree.insert_directory(Path::new("blog"), None).unwrap();
        tree.insert_page(Path::new("blog/a.html"), page("/blog/a")).unwrap();
        tree.insert_page(Path::new("blog/b.html"), page("/blog/b")).unwrap();
        tree.insert_directory(Path::new("blog/2016"), None).unwrap();
        tree.insert_page(Path::new("blog/2016/c.html"), page("/blog/2016/c")).unwrap();
        tree.insert_directory(Path::new("empty"), None).unwrap();

        assert_eq!(tree.items(Path::new("blog")).len(), 2);
        assert_eq!(tree.items(Path::new("blog/2016")).len(), 1);
        assert_eq!(tree.items(Path::new("")).len(), 0);
        // Directory without files still has an (empty) list
        let empty = tree.node(Path::new("empty")).unwrap();
        assert_eq!(empty[ITEMS_KEY], json!([]));
    }

    #[test]
    fn test_page_before_directory_creates_node() {
        let mut tree = SiteTree::new();
        tree.insert_page(Path::new("a/b/c.html"), page("/a/b/c")).unwrap();

        assert!(tree.node(Path::new("a")).is_some());
        assert_eq!(tree.items(Path::new("a/b")).len(), 1);

        // Visiting the directory afterwards keeps the page and merges fields
        let front = json!({"title": "B"}).as_object().cloned().unwrap();
        tree.insert_directory(Path::new("a/b"), Some(&front)).unwrap();
        let node = tree.node(Path::new("a/b")).unwrap();
        assert_eq!(node["title"], "B");
        assert_eq!(tree.items(Path::new("a/b")).len(), 1);
    }

    #[test]
    fn test_directory_front_matter_cannot_replace_items() {
        let mut tree = SiteTree::new();
        tree.insert_page(Path::new("blog/a.html"), page("/blog/a")).unwrap();
        let front = json!({"items": 3, "title": "Blog"}).as_object().cloned().unwrap();
        tree.insert_directory(Path::new("blog"), Some(&front)).unwrap();

        assert_eq!(tree.items(Path::new("blog")).len(), 1);
        assert_eq!(tree.node(Path::new("blog")).unwrap()["title"], "Blog");
    }

    #[test]
    fn test_duplicate_urls_coexist() {
        let mut tree = SiteTree::new();
        tree.insert_page(Path::new("post.html"), page("/post")).unwrap();
        tree.insert_page(Path::new("post.md"), page("/post")).unwrap();

        let items = tree.items(Path::new(""));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], items[1]);
    }

    #[test]
    fn test_scalar_replaced_by_directory() {
        let mut tree = SiteTree::new();
        let front = json!({"notes": "text"}).as_object().cloned().unwrap();
        tree.insert_directory(Path::new(""), Some(&front)).unwrap();
        tree.insert_page(Path::new("notes/one.html"), page("/notes/one")).unwrap();

        assert_eq!(tree.items(Path::new("notes")).len(), 1);
    }

    #[test]
    fn test_to_value_shape() {
        let mut tree = SiteTree::new();
        tree.insert_directory(Path::new("blog"), None).unwrap();
        tree.insert_page(Path::new("blog/a.html"), page("/blog/a")).unwrap();

        assert_eq!(
            tree.to_value(),
            json!({ "blog": { "items": [ { "url": "/blog/a" } ] } })
        );
    }

    #[test]
    fn test_items_directory_is_rejected() {
        let mut tree = SiteTree::new();
        tree.insert_page(Path::new("index.html"), page("/index")).unwrap();

        let err = tree.insert_directory(Path::new("items"), None).unwrap_err();
        assert_eq!(err.path, PathBuf::from("items"));
        assert!(tree.insert_page(Path::new("items/x.html"), page("/items/x")).is_err());
        assert!(tree.insert_page(Path::new("a/items/b/x.html"), page("/a/items/b/x")).is_err());

        // The root page list is untouched
        assert_eq!(tree.items(Path::new("")).len(), 1);
        // A page merely named `items` is fine
        tree.insert_page(Path::new("items.html"), page("/items")).unwrap();
        assert_eq!(tree.items(Path::new("")).len(), 2);
    }
}
