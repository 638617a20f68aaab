pub mod extractors;

use scraper::{ElementRef, Html, Node, Selector};

/// Visible text of the page body, one line per block element.
///
/// Scripts, styles and hidden elements are skipped. The result is cut at
/// `max_chars` characters.
pub fn extract_text(document: &Html, max_chars: usize) -> String {
    let body_selector = Selector::parse("body").unwrap();
    let root = document
        .select(&body_selector)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut blocks = Vec::new();
    let mut current = Vec::new();
    collect_text(&root, &mut current, &mut blocks);
    flush_block(&mut current, &mut blocks);

    let text = blocks.join("\n");
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}

fn collect_text(element: &ElementRef, current: &mut Vec<String>, blocks: &mut Vec<String>) {
    if is_hidden(element) || should_skip_element(element) {
        return;
    }

    let tag_name = element.value().name().to_lowercase();
    if tag_name == "br" {
        flush_block(current, blocks);
        return;
    }

    let is_block = is_block_element(&tag_name);
    if is_block {
        flush_block(current, blocks);
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let normalized = normalize_whitespace(text);
                if !normalized.is_empty() {
                    current.push(normalized);
                }
            }
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(&child_ref, current, blocks);
                }
            }
            _ => {}
        }
    }

    if is_block {
        flush_block(current, blocks);
    }
}

fn flush_block(current: &mut Vec<String>, blocks: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let merged = current.join(" ").trim().to_string();
    if !merged.is_empty() {
        blocks.push(merged);
    }
    current.clear();
}

fn is_hidden(element: &ElementRef) -> bool {
    element.value().attr("hidden").is_some()
        || element.value().attr("aria-hidden") == Some("true")
        || element
            .value()
            .attr("style")
            .map(|s| {
                let s = s.replace(' ', "");
                s.contains("display:none") || s.contains("visibility:hidden")
            })
            .unwrap_or(false)
}

fn is_block_element(tag: &str) -> bool {
    matches!(
        tag,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "dd"
            | "div"
            | "dl"
            | "dt"
            | "figcaption"
            | "figure"
            | "footer"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "li"
            | "main"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "table"
            | "tr"
            | "ul"
    )
}

fn should_skip_element(element: &ElementRef) -> bool {
    let tag_name = element.value().name().to_lowercase();
    matches!(
        tag_name.as_str(),
        "script" | "style" | "noscript" | "iframe" | "canvas" | "svg" | "template" | "nav"
    )
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_from_html() {
        let html = r#"
            <html>
            <head><title>ignored</title><script>var x = 1;</script></head>
            <body>
                <nav>Home | Recipes</nav>
                <h1>Test Recipe</h1>
                <p>Some   ingredients<br>and more</p>
                <ul><li>2 eggs</li><li>1 cup <b>flour</b></li></ul>
                <div style="display: none">Hidden ad</div>
                <style>.x { color: red }</style>
                <p>Some instructions</p>
            </body>
            </html>
        "#;

        let document = Html::parse_document(html);
        let text = extract_text(&document, 10_000);

        assert_eq!(
            text,
            "Test Recipe\nSome ingredients\nand more\n2 eggs\n1 cup flour\nSome instructions"
        );
    }

    #[test]
    fn test_extract_text_is_capped() {
        let document = Html::parse_document("<body><p>ééééééééé</p></body>");
        assert_eq!(extract_text(&document, 4), "éééé");
    }
}
