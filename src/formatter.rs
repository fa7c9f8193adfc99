//! Conversion of entry descriptions from HTML to the markdown dialect the
//! webhook renders.

use scraper::{ElementRef, Html, Node};

/// Converts HTML into display text.
///
/// Bold tags become `**text**`, links become `[text](href)` and every other
/// tag is dropped while its text is kept. Text nodes are joined with no
/// separator and the result is trimmed.
pub fn to_display_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    render_children(fragment.root_element(), &mut out);
    out.trim().to_string()
}

fn render_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            render_element(child_element, out);
        } else if let Node::Text(text) = child.value() {
            out.push_str(text);
        }
    }
}

fn render_element(element: ElementRef<'_>, out: &mut String) {
    match element.value().name() {
        "strong" | "b" => {
            out.push_str("**");
            render_children(element, out);
            out.push_str("**");
        }
        "a" => {
            let mut label = String::new();
            render_children(element, &mut label);
            match element.value().attr("href") {
                Some(href) => {
                    out.push('[');
                    out.push_str(&label);
                    out.push_str("](");
                    out.push_str(href);
                    out.push(')');
                }
                None => out.push_str(&label),
            }
        }
        "script" | "style" => {}
        _ => render_children(element, out),
    }
}
