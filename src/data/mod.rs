//! Site-wide data handed to templates.
//!
//! Every content file becomes a [`PageRecord`]; the records are folded into a
//! [`SiteTree`] keyed by directory, which templates see as `root`.
//!
//! ```text
//! site/                          root
//! ├── index.html       ──►       ├── items: [ {url: "/index", ...} ]
//! └── blog/                      └── blog
//!     ├── _dir.json5   ──►           ├── title: "Blog"      (merged)
//!     ├── first.html   ──►           └── items: [ {url: "/blog/first", ...},
//!     └── second.html  ──►                        {url: "/blog/second", ...} ]
//! ```
//!
//! A template lists the posts of a directory with
//! `{% for post in root.blog.items %}…{% endfor %}`.

mod tree;
mod types;

pub use tree::SiteTree;
pub use types::PageRecord;
