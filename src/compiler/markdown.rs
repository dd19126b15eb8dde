//! Markdown to HTML with class-based syntax highlighting of fenced code.
//!
//! Highlighted tokens are emitted as `<span class="...">` so the colors come
//! from the site stylesheet, not from an inline theme.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};
use std::sync::LazyLock;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Render markdown `text` to an HTML fragment.
pub fn render(text: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut events = Vec::new();
    let mut code: Option<(String, String)> = None;

    for event in Parser::new_ext(text, options) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => language_token(&info).to_owned(),
                    CodeBlockKind::Indented => String::new(),
                };
                code = Some((lang, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((lang, buffer)) = code.take() {
                    events.push(Event::Html(code_block(&lang, &buffer).into()));
                }
            }
            Event::Text(chunk) if code.is_some() => {
                if let Some((_, buffer)) = code.as_mut() {
                    buffer.push_str(&chunk);
                }
            }
            event => events.push(event),
        }
    }

    let mut output = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut output, events.into_iter());
    output
}

/// First word of a fence info string: "rust,ignore" → "rust".
fn language_token(info: &str) -> &str {
    info.split(|c: char| c == ',' || c.is_whitespace())
        .next()
        .unwrap_or_default()
}

fn code_block(lang: &str, code: &str) -> String {
    let body = highlight(find_syntax(lang, code), code).unwrap_or_else(|_| escape_html(code));
    if lang.is_empty() {
        format!("<pre><code>{body}</code></pre>\n")
    } else {
        format!("<pre><code class=\"language-{}\">{body}</code></pre>\n", escape_html(lang))
    }
}

/// Syntax by fence token, then by first line (shebangs), then plain text.
fn find_syntax(lang: &str, code: &str) -> &'static SyntaxReference {
    let set: &'static SyntaxSet = &SYNTAX_SET;
    (!lang.is_empty())
        .then(|| set.find_syntax_by_token(lang))
        .flatten()
        .or_else(|| set.find_syntax_by_first_line(code))
        .unwrap_or_else(|| set.find_syntax_plain_text())
}

fn highlight(syntax: &SyntaxReference, code: &str) -> Result<String, syntect::Error> {
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    Ok(generator.finalize())
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
