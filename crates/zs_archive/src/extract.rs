use scraper::{Html, Node, Selector};
use zs_core::{Article, Error, Result};

/// Elements whose text never belongs to the readable article body.
const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Plain text of an HTML document: every non-empty text node, trimmed, one per line.
pub fn extract_text(html: &[u8]) -> String {
    let document = Html::parse_document(&String::from_utf8_lossy(html));

    let mut lines = Vec::new();
    for node in document.tree.nodes() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let skipped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if skipped {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed);
        }
    }

    lines.join("\n")
}

pub fn article_text(article: &Article) -> String {
    extract_text(&article.content)
}

/// Contents of the document's `<title>`, if present and non-blank.
pub fn extract_title(html: &[u8]) -> Option<String> {
    let document = Html::parse_document(&String::from_utf8_lossy(html));
    first_text(&document, "title")
        .ok()
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

pub(crate) fn first_text(document: &Html, selector: &str) -> Result<String> {
    let selector = Selector::parse(selector)
        .map_err(|e| Error::Extraction(format!("Invalid selector: {}", e)))?;

    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or_else(|| Error::Extraction(format!("No element found for selector: {:?}", selector)))
}
