//! Markdown-to-HTML rendering for generated page components.
//!
//! Rendering is delegated to `pulldown-cmark` with tables and strikethrough
//! enabled. Raw HTML in the source is escaped unless explicitly allowed, so
//! the output is always safe to embed in a component template. An escaped
//! HTML block is rendered as the paragraph it would be if HTML were not
//! recognised at all, so markdown inside it still renders.

mod component;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html::push_html};
use tracing::{instrument, trace};

pub use component::{COMPONENT_ENTRY, COMPONENT_EXTENSION, component_file_name, wrap_component};

/// Options for markdown rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Emit raw HTML blocks and inline tags verbatim instead of escaping them.
    pub allow_html: bool,
}

/// Render markdown source to an HTML fragment.
#[instrument(skip_all, fields(len = source.len()))]
pub fn render(source: &str, opts: &RenderOptions) -> String {
    let parser = Parser::new_ext(source, parser_options());

    let mut html = String::with_capacity(source.len() * 3 / 2);
    if opts.allow_html {
        push_html(&mut html, parser);
    } else {
        push_html(&mut html, escape_html_events(parser).into_iter());
    }

    trace!(html_len = html.len(), "rendered markdown");
    html
}

/// Render markdown and wrap it in the component template in one step.
pub fn render_component(source: &str, opts: &RenderOptions) -> String {
    wrap_component(&render(source, opts))
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
}

/// Replace raw HTML with text.
///
/// Inline tags become text in place. An HTML block is collected and parsed
/// again as plain markdown, with the `<` that opened each block line escaped
/// so it cannot start another block.
fn escape_html_events<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut block: Option<String> = None;

    for event in events {
        match event {
            Event::Start(Tag::HtmlBlock) => block = Some(String::new()),
            Event::End(TagEnd::HtmlBlock) => {
                let raw = block.take().unwrap_or_default();
                let reparsed = escape_block_starts(&raw);
                for inner in Parser::new_ext(&reparsed, parser_options()) {
                    out.push(escape_raw_html(inner).into_static());
                }
            }
            Event::Html(raw) => match block.as_mut() {
                Some(buf) => buf.push_str(&raw),
                None => out.push(Event::Text(raw)),
            },
            other => out.push(escape_raw_html(other)),
        }
    }

    out
}

/// Backslash-escape a `<` that opens a line (after at most three spaces).
fn escape_block_starts(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + 8);
    for line in raw.split_inclusive('\n') {
        let body = line.trim_start_matches(' ');
        let indent = line.len() - body.len();
        if indent <= 3 && body.starts_with('<') {
            escaped.push_str(&line[..indent]);
            escaped.push('\\');
            escaped.push_str(body);
        } else {
            escaped.push_str(line);
        }
    }
    escaped
}

/// Turn raw HTML events into text so the HTML writer escapes them.
fn escape_raw_html(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_default(md: &str) -> String {
        render(md, &RenderOptions::default())
    }

    #[test]
    fn heading() {
        assert_eq!(render_default("# Hi"), "<h1>Hi</h1>\n");
    }

    #[test]
    fn paragraphs_and_emphasis() {
        let html = render_default("Some *soft* and **loud** text.\n\nSecond.");
        assert_eq!(
            html,
            "<p>Some <em>soft</em> and <strong>loud</strong> text.</p>\n<p>Second.</p>\n"
        );
    }

    #[test]
    fn tables_enabled() {
        let html = render_default("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn strikethrough_enabled() {
        assert!(render_default("~~gone~~").contains("<del>gone</del>"));
    }

    #[test]
    fn code_block_is_escaped() {
        let html = render_default("```rust\nlet x = a < b;\n```\n");
        assert!(html.contains("<pre><code class=\"language-rust\">"));
        assert!(html.contains("a &lt; b"));
    }

    #[test]
    fn raw_html_escaped_by_default() {
        let html = render_default("<script>alert(1)</script>\n\nText with <b>bold</b>.");
        assert!(!html.contains("<script>"));
        assert!(html.contains("<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn escaped_html_block_renders_as_paragraph() {
        assert_eq!(
            render_default("<div>\n*hi*\n</div>\n"),
            "<p>&lt;div&gt;\n<em>hi</em>\n&lt;/div&gt;</p>\n"
        );
    }

    #[test]
    fn escaped_html_block_keeps_following_blocks() {
        let html = render_default("<!-- note -->\n\n# After\n");
        assert_eq!(html, "<p>&lt;!-- note --&gt;</p>\n<h1>After</h1>\n");
    }

    #[test]
    fn html_block_passes_through_when_allowed() {
        let html = render("<div>\n*hi*\n</div>\n", &RenderOptions { allow_html: true });
        assert_eq!(html, "<div>\n*hi*\n</div>\n");
    }

    #[test]
    fn block_start_escaping() {
        assert_eq!(escape_block_starts("<a>\n  </a>\ntext <b>\n"), "\\<a>\n  \\</a>\ntext <b>\n");
        assert_eq!(escape_block_starts("    <pre>"), "    <pre>");
    }

    #[test]
    fn raw_html_allowed() {
        let html = render(
            "Text with <b>bold</b>.",
            &RenderOptions { allow_html: true },
        );
        assert!(html.contains("<b>bold</b>"));
    }

    #[test]
    fn empty_source() {
        assert_eq!(render_default(""), "");
    }
}
