//! Page record type.

use serde_json::{Map, Value};
use std::path::PathBuf;

/// One content file after front-matter extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    /// Path relative to the content directory (e.g., `blog/first.html`)
    pub source: PathBuf,

    /// Site URL derived from the source path (e.g., `/blog/first`)
    pub url: String,

    /// Fields parsed from the front-matter block, in source order
    pub front_matter: Map<String, Value>,

    /// File text with the front-matter block removed
    pub body: String,
}

impl PageRecord {
    /// Template data for this page: `url` followed by the front-matter fields.
    ///
    /// A front-matter `url` key replaces the derived one.
    pub fn data(&self) -> Map<String, Value> {
        let mut data = Map::with_capacity(self.front_matter.len() + 1);
        data.insert("url".into(), Value::String(self.url.clone()));
        data.extend(self.front_matter.clone());
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(front_matter: Value) -> PageRecord {
        PageRecord {
            source: PathBuf::from("blog/first.html"),
            url: "/blog/first".into(),
            front_matter: front_matter.as_object().cloned().unwrap_or_default(),
            body: String::new(),
        }
    }

    #[test]
    fn test_data_starts_with_url() {
        let data = record(json!({"title": "First", "tags": ["a"]})).data();

        let keys: Vec<_> = data.keys().map(String::as_str).collect();
        assert_eq!(keys, ["url", "title", "tags"]);
        assert_eq!(data["url"], "/blog/first");
    }

    #[test]
    fn test_front_matter_url_wins() {
        let data = record(json!({"url": "/custom"})).data();
        assert_eq!(data["url"], "/custom");
        assert_eq!(data.len(), 1);
    }
}
