//! Markdown to sanitized HTML for job descriptions and marketing pages.

use std::collections::HashSet;

use ammonia::Builder as AmmoniaBuilder;
use comrak::{
    Arena,
    nodes::{AstNode, NodeValue},
    options::Options,
    parse_document,
};
use once_cell::sync::Lazy;

static OPTIONS: Lazy<Options<'static>> = Lazy::new(default_options);
static SANITIZER: Lazy<AmmoniaBuilder<'static>> = Lazy::new(build_sanitizer);

fn default_options() -> Options<'static> {
    let mut options = Options::default();

    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.table = true;
    ext.autolink = true;
    ext.tasklist = true;
    ext.description_lists = true;
    ext.underline = true;

    let render = &mut options.render;
    render.github_pre_lang = true;
    render.tasklist_classes = true;
    // Raw HTML in source records goes through the sanitizer below.
    render.r#unsafe = true;

    options
}

fn build_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();
    let tags: HashSet<&'static str> = HashSet::from([
        "a",
        "blockquote",
        "br",
        "code",
        "dd",
        "del",
        "dl",
        "dt",
        "em",
        "h2",
        "h3",
        "h4",
        "hr",
        "input",
        "li",
        "ol",
        "p",
        "pre",
        "strong",
        "table",
        "tbody",
        "td",
        "th",
        "thead",
        "tr",
        "u",
        "ul",
    ]);
    builder.tags(tags);
    builder.add_tag_attributes("input", &["type", "checked", "disabled"]);
    builder.add_tag_attributes("code", &["class"]);
    builder.link_rel(Some("noopener noreferrer nofollow"));
    builder.add_url_schemes(["http", "https", "mailto"].iter().copied());
    builder
}

pub fn render_markdown(markdown: &str) -> String {
    let html = comrak::markdown_to_html(markdown, &OPTIONS);
    SANITIZER.clean(&html).to_string()
}

/// Plain text for meta descriptions and feed summaries, with whitespace collapsed.
pub fn plain_text(markdown: &str) -> String {
    fn walk(node: &AstNode<'_>, buffer: &mut String) {
        {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Text(text) => buffer.push_str(text),
                NodeValue::Code(code) => buffer.push_str(&code.literal),
                NodeValue::CodeBlock(block) => buffer.push_str(&block.literal),
                NodeValue::LineBreak
                | NodeValue::SoftBreak
                | NodeValue::Paragraph
                | NodeValue::Heading(_)
                | NodeValue::Item(_) => buffer.push(' '),
                _ => {}
            }
        }
        let mut child = node.first_child();
        while let Some(next) = child {
            walk(next, buffer);
            child = next.next_sibling();
        }
    }

    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &OPTIONS);
    let mut text = String::new();
    walk(root, &mut text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_lists_and_strips_scripts() {
        let html = render_markdown("## Perks\n\n- Remote\n- Equity\n\n<script>alert(1)</script>");
        assert!(html.contains("<h2>Perks</h2>"));
        assert!(html.contains("<li>Remote</li>"));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn links_get_safe_rel() {
        let html = render_markdown("[apply](https://acme.example/jobs)");
        assert!(html.contains(r#"rel="noopener noreferrer nofollow""#));
    }

    #[test]
    fn plain_text_drops_markup() {
        assert_eq!(plain_text("**Build** things &\n\n- ship `fast`"), "Build things & ship fast");
    }
}
