//! Markup stripping for free-text recipe fields.

use scraper::{Html, Node};

/// Elements whose text content is dropped along with the tags.
const DROPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Characters that are written back out as entities.
const ESCAPED: [char; 3] = ['&', '<', '>'];

/// Strip HTML from `input`, returning text that is safe to render as HTML.
///
/// Tags and comments are removed and `<script>`/`<style>` bodies are dropped.
/// The remaining text is re-escaped, so an entity such as `&lt;b&gt;` stays
/// `&lt;b&gt;` and never turns into a tag. Malformed markup is parsed the way
/// a browser would and never causes an error.
pub fn clean(input: &str) -> String {
    // Fast path: nothing to strip and nothing to escape.
    if !input.contains(ESCAPED) {
        return input.to_string();
    }

    let fragment = Html::parse_fragment(input);
    let mut text = String::with_capacity(input.len());

    for node in fragment.tree.root().descendants() {
        let Node::Text(chunk) = node.value() else {
            continue;
        };
        let inside_dropped = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => DROPPED_ELEMENTS.contains(&element.name()),
            _ => false,
        });
        if !inside_dropped {
            push_escaped(&mut text, chunk);
        }
    }

    text
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}
