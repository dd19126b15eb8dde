//! `[site]` section configuration.
//!
//! Global site data handed to every template as `site`.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `[site]` section in isobit.toml - global template data.
///
/// # Example
/// ```toml
/// [site]
/// title = "Isobit"
/// description = "A software development blog"
/// scripts_url = "/_scripts"
///
/// [site.extra]
/// github_username = "someone"
/// theme_color = "#252525"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Site title.
    #[serde(default = "defaults::site::title")]
    #[educe(Default = defaults::site::title())]
    pub title: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: String,

    /// Prefix prepended to absolute links (empty for root deployment).
    #[serde(default = "defaults::site::base_url")]
    #[educe(Default = defaults::site::base_url())]
    pub base_url: String,

    /// URL path that rendered scripts are published under.
    #[serde(default = "defaults::site::scripts_url")]
    #[educe(Default = defaults::site::scripts_url())]
    pub scripts_url: String,

    /// URL path that stylesheets are published under.
    #[serde(default = "defaults::site::styles_url")]
    #[educe(Default = defaults::site::styles_url())]
    pub styles_url: String,

    /// URL path that copied assets are published under.
    #[serde(default = "defaults::site::assets_url")]
    #[educe(Default = defaults::site::assets_url())]
    pub assets_url: String,

    /// User-defined fields, flattened into `site` for templates.
    #[serde(default, skip_serializing)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl SiteSection {
    /// Template view of the section: known fields plus `extra` at the top level.
    ///
    /// Known fields win over an `extra` key of the same name.
    pub fn to_value(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, value) in &self.extra {
            if let Ok(value) = serde_json::to_value(value) {
                map.insert(key.clone(), value);
            }
        }
        if let Ok(serde_json::Value::Object(known)) = serde_json::to_value(self) {
            map.extend(known);
        }
        serde_json::Value::Object(map)
    }
}

/// Join a URL prefix and a file path with exactly one `/` between them.
pub fn join_url(prefix: &str, file: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let file = file.trim_start_matches('/');
    format!("{prefix}/{file}")
}
