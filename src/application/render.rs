//! Markdown rendering: post bodies to HTML, plus plain-text extraction used
//! for excerpt defaults and the search index.

use comrak::nodes::{AstNode, NodeValue};
use comrak::{Arena, Options, markdown_to_html, parse_document};
use once_cell::sync::Lazy;

/// Number of plain-text characters kept when an excerpt is not declared.
pub const EXCERPT_CHARS: usize = 160;

static RENDER_OPTIONS: Lazy<Options<'static>> = Lazy::new(default_options);

fn default_options() -> Options<'static> {
    let mut options = Options::default();

    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.table = true;
    ext.autolink = true;
    ext.tasklist = true;

    let render = &mut options.render;
    render.github_pre_lang = true;

    options
}

/// Render a post body to HTML.
pub fn render_html(markdown: &str) -> String {
    markdown_to_html(markdown, &RENDER_OPTIONS)
}

/// Collapse a markdown body to plain text: markup stripped, image
/// destinations dropped, whitespace normalised to single spaces.
pub fn plain_text(markdown: &str) -> String {
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &RENDER_OPTIONS);

    let mut buffer = String::new();
    collect_text(root, &mut buffer);

    let mut output = String::with_capacity(buffer.len());
    for word in buffer.split_whitespace() {
        if !output.is_empty() {
            output.push(' ');
        }
        output.push_str(word);
    }
    output
}

fn collect_text<'a>(node: &'a AstNode<'a>, buffer: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(literal) => buffer.push_str(literal),
        NodeValue::Code(code) => buffer.push_str(&code.literal),
        NodeValue::CodeBlock(block) => {
            buffer.push(' ');
            buffer.push_str(&block.literal);
            buffer.push(' ');
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => buffer.push(' '),
        NodeValue::Image(_) => {
            // Alt text inside the image node is decorative here; skip the
            // whole node so excerpts never start with figure captions.
            return;
        }
        _ => {}
    }

    for child in node.children() {
        collect_text(child, buffer);
    }

    if node.data.borrow().value.block() {
        buffer.push(' ');
    }
}

/// First [`EXCERPT_CHARS`] characters of the stripped body, with an ellipsis
/// when truncated.
pub fn default_excerpt(markdown: &str) -> String {
    let text = plain_text(markdown);
    if text.chars().count() <= EXCERPT_CHARS {
        return text;
    }

    let truncated: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_html_handles_gfm_tables() {
        let html = render_html("| a | b |\n| - | - |\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn plain_text_strips_markup_and_links() {
        let text = plain_text("# Title\n\nSome *bold* text with a [link](https://example.com).");
        assert_eq!(text, "Title Some bold text with a link.");
    }

    #[test]
    fn plain_text_drops_images() {
        let text = plain_text("![cover](./assets/cover.png)\n\nBody starts here.");
        assert_eq!(text, "Body starts here.");
    }

    #[test]
    fn short_bodies_are_not_truncated() {
        assert_eq!(default_excerpt("Just a short body."), "Just a short body.");
    }

    #[test]
    fn long_bodies_truncate_with_ellipsis() {
        let body = "word ".repeat(100);
        let excerpt = default_excerpt(&body);

        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + 3);
    }
}
