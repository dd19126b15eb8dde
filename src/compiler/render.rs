//! Template rendering on top of tera.
//!
//! Layouts and partials are loaded once from the template search directories.
//! Each content file is then rendered as its own template against a clone of
//! that set, so it can `{% extends %}` or `{% include %}` any of them.

use super::{is_hidden, markdown};
use crate::config::{SiteConfig, join_url};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::error::Error as _;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;
use walkdir::WalkDir;

/// Name prefix for content templates, keeps them apart from layout names.
const CONTENT_PREFIX: &str = "@content/";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load templates: {0}")]
    Templates(String),

    #[error("{}: {message}", path.display())]
    Page { path: PathBuf, message: String },
}

/// Layout set plus site helpers, shared read-only across render workers.
#[derive(Debug)]
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Load every file under `config.build.templates`.
    ///
    /// When two directories hold the same name, the earlier directory wins.
    pub fn new(config: &SiteConfig) -> Result<Self, RenderError> {
        let mut files = Vec::new();
        for dir in config.build.templates.iter().rev() {
            files.extend(template_files(dir));
        }

        let mut tera = Tera::default();
        tera.add_template_files(files)
            .map_err(|err| RenderError::Templates(error_chain(&err)))?;
        // Every template escapes `{{ }}` output; `/` is left alone so URLs stay readable
        tera.autoescape_on(vec![""]);
        tera.set_escape_fn(markdown::escape_html);

        tera.register_filter("markdown", MarkdownFilter);
        let site = &config.site;
        tera.register_function("script", url_function(&site.base_url, &site.scripts_url));
        tera.register_function("style", url_function(&site.base_url, &site.styles_url));
        tera.register_function("asset", url_function(&site.base_url, &site.assets_url));

        Ok(Self { tera })
    }

    /// Render `body` as a template named after `path` with `context`.
    pub fn render(&self, path: &Path, body: &str, context: Map<String, Value>) -> Result<String, RenderError> {
        let fail = |err: tera::Error| RenderError::Page {
            path: path.to_path_buf(),
            message: error_chain(&err),
        };

        let name = format!("{CONTENT_PREFIX}{}", template_name(path));
        let mut tera = self.tera.clone();
        tera.add_raw_template(&name, body).map_err(fail)?;

        let context = Context::from_value(Value::Object(context)).map_err(fail)?;
        tera.render(&name, &context).map_err(fail)
    }

    #[cfg(test)]
    fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }
}

/// `(file, name)` pairs for every file under `dir`, named by relative path.
fn template_files(dir: &Path) -> Vec<(PathBuf, Option<String>)> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = template_name(entry.path().strip_prefix(dir).ok()?);
            Some((entry.into_path(), Some(name)))
        })
        .collect()
}

/// Forward-slash template name for a relative path.
fn template_name(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// `markdown` filter; its HTML output is exempt from autoescaping.
struct MarkdownFilter;

impl tera::Filter for MarkdownFilter {
    fn filter(&self, value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
        let text = tera::try_get_value!("markdown", "value", String, value);
        Ok(Value::String(markdown::render(&text)))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

/// `name(path="...")` → base URL + prefix + path.
fn url_function(base_url: &str, prefix: &str) -> impl tera::Function + use<> {
    let prefix = format!("{}{prefix}", base_url.trim_end_matches('/'));
    move |args: &HashMap<String, Value>| -> tera::Result<Value> {
        match args.get("path").and_then(Value::as_str) {
            Some(path) => Ok(Value::String(join_url(&prefix, path))),
            None => Err(tera::Error::msg("expected a string argument `path`")),
        }
    }
}

/// Tera wraps the useful message a few sources deep.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str("\n  ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn setup(files: &[(&str, &str)]) -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        for (path, text) in files {
            let path = dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, text).unwrap();
        }
        let mut config = SiteConfig::default();
        config.update_path_with_root(dir.path());
        (dir, config)
    }

    fn context(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_render_plain_variables() {
        let (_dir, config) = setup(&[]);
        let renderer = Renderer::new(&config).unwrap();

        let html = renderer
            .render(Path::new("a.html"), "<h1>{{ title }}</h1>", context(json!({"title": "Hi"})))
            .unwrap();
        assert_eq!(html, "<h1>Hi</h1>");
    }

    #[test]
    fn test_output_is_escaped() {
        let (_dir, config) = setup(&[]);
        let renderer = Renderer::new(&config).unwrap();

        let data = json!({"title": "Tom & Jerry's <b>", "url": "/blog/a?x=1"});
        let html = renderer
            .render(Path::new("a.html"), "{{ title }} {{ url }} {{ title | safe }}", context(data))
            .unwrap();
        assert_eq!(
            html,
            "Tom &amp; Jerry&#39;s &lt;b&gt; /blog/a?x=1 Tom & Jerry's <b>"
        );
    }

    #[test]
    fn test_markdown_filter_output_not_escaped() {
        let (_dir, config) = setup(&[]);
        let renderer = Renderer::new(&config).unwrap();

        let html = renderer
            .render(Path::new("a.js"), "{{ body | markdown }}", context(json!({"body": "*a* & b"})))
            .unwrap();
        assert_eq!(html.trim(), "<p><em>a</em> &amp; b</p>");
    }

    #[test]
    fn test_extends_layout() {
        let (_dir, config) = setup(&[(
            "layouts/post.html",
            "<main>{% block content %}{% endblock %}</main>",
        )]);
        let renderer = Renderer::new(&config).unwrap();

        let body = r#"{% extends "post.html" %}{% block content %}{{ title }}{% endblock %}"#;
        let html = renderer
            .render(Path::new("blog/a.html"), body, context(json!({"title": "A"})))
            .unwrap();
        assert_eq!(html, "<main>A</main>");
    }

    #[test]
    fn test_earlier_template_dir_wins() {
        let (_dir, config) = setup(&[
            ("includes/nav.html", "includes"),
            ("layouts/nav.html", "layouts"),
            ("layouts/base/page.html", "page"),
            ("layouts/.nav.html.swp", "{% if %}"),
        ]);
        let renderer = Renderer::new(&config).unwrap();

        assert_eq!(renderer.template_names(), ["base/page.html", "nav.html"]);
        let html = renderer
            .render(Path::new("x.html"), r#"{% include "nav.html" %}"#, Map::new())
            .unwrap();
        assert_eq!(html, "includes");
    }

    #[test]
    fn test_content_name_does_not_shadow_layout() {
        let (_dir, config) = setup(&[("layouts/post.html", "[{% block c %}{% endblock %}]")]);
        let renderer = Renderer::new(&config).unwrap();

        let body = r#"{% extends "post.html" %}{% block c %}ok{% endblock %}"#;
        let html = renderer.render(Path::new("post.html"), body, Map::new()).unwrap();
        assert_eq!(html, "[ok]");
    }

    #[test]
    fn test_markdown_filter_block() {
        let (_dir, config) = setup(&[]);
        let renderer = Renderer::new(&config).unwrap();

        let body = "{% filter markdown %}# {{ title }}\n\n```rust\nlet x = 1;\n```\n{% endfilter %}";
        let html = renderer
            .render(Path::new("m.html"), body, context(json!({"title": "Notes"})))
            .unwrap();
        assert!(html.contains("<h1>Notes</h1>"));
        assert!(html.contains("class=\"language-rust\""));
    }

    #[test]
    fn test_url_functions() {
        let (_dir, mut config) = setup(&[]);
        config.site.base_url = "/blog/".into();
        let renderer = Renderer::new(&config).unwrap();

        let body = r#"{{ script(path="app.js") }} {{ style(path="/main.css") }} {{ asset(path="img/a.png") }}"#;
        let html = renderer.render(Path::new("u.html"), body, Map::new()).unwrap();
        assert_eq!(html, "/blog/_scripts/app.js /blog/_styles/main.css /blog/_assets/img/a.png");
    }

    #[test]
    fn test_url_function_requires_path() {
        let (_dir, config) = setup(&[]);
        let renderer = Renderer::new(&config).unwrap();
        let err = renderer
            .render(Path::new("u.html"), "{{ asset() }}", Map::new())
            .unwrap_err();
        assert!(err.to_string().contains("path"));
    }

    #[test]
    fn test_error_tagged_with_path() {
        let (_dir, config) = setup(&[]);
        let renderer = Renderer::new(&config).unwrap();

        let err = renderer
            .render(Path::new("blog/bad.html"), "{% if %}", Map::new())
            .unwrap_err();
        assert!(matches!(&err, RenderError::Page { path, .. } if path == Path::new("blog/bad.html")));
        assert!(err.to_string().starts_with("blog/bad.html: "));
    }

    #[test]
    fn test_missing_layout_is_render_error() {
        let (_dir, config) = setup(&[]);
        let renderer = Renderer::new(&config).unwrap();
        let body = r#"{% extends "missing.html" %}"#;
        assert!(renderer.render(Path::new("x.html"), body, Map::new()).is_err());
    }

    #[test]
    fn test_template_name() {
        assert_eq!(template_name(Path::new("blog/2016/a.html")), "blog/2016/a.html");
        assert_eq!(template_name(Path::new("a.html")), "a.html");
    }
}
