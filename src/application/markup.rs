//! Markup flattening.
//!
//! The extracted body is parsed with an HTML5 parser, converted into a
//! [`MarkupNode`] tree, then flattened into newline-joined text. Tag names,
//! attributes, comments and doctypes are discarded.

use scraper::{ElementRef, Html, Node};

use crate::domain::MarkupNode;

/// Parses body markup into the top-level nodes of a synthetic `<body>`.
#[must_use]
pub fn parse(markup: &str) -> Vec<MarkupNode> {
    let document = Html::parse_document(&format!("<html><body>{markup}</body></html>"));

    document
        .root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "body")
        .map(convert_children)
        .unwrap_or_default()
}

fn convert_children(element: ElementRef<'_>) -> Vec<MarkupNode> {
    element
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(MarkupNode::text(&**text)),
            Node::Element(_) => {
                ElementRef::wrap(child).map(|child| MarkupNode::element(convert_children(child)))
            }
            _ => None,
        })
        .collect()
}

/// Flattens a single node: text is kept verbatim, elements join their
/// children with newlines.
#[must_use]
pub fn flatten_node(node: &MarkupNode) -> String {
    match node {
        MarkupNode::Text(text) => text.clone(),
        MarkupNode::Element { children } => flatten_nodes(children),
    }
}

/// Flattens a sequence of sibling nodes, one per line.
#[must_use]
pub fn flatten_nodes(nodes: &[MarkupNode]) -> String {
    nodes
        .iter()
        .map(flatten_node)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses and flattens body markup into plain text.
#[must_use]
pub fn flatten(markup: &str) -> String {
    flatten_nodes(&parse(markup))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_text_and_block() {
        assert_eq!(flatten("Hello<div>World</div>"), "Hello\nWorld");
    }

    #[test]
    fn test_parse_builds_typed_tree() {
        assert_eq!(
            parse("Hello<div>World</div>"),
            vec![
                MarkupNode::text("Hello"),
                MarkupNode::element(vec![MarkupNode::text("World")]),
            ]
        );
    }

    #[test]
    fn test_flatten_node_is_pure_over_tree() {
        let tree = MarkupNode::element(vec![
            MarkupNode::text("a"),
            MarkupNode::element(vec![MarkupNode::text("b"), MarkupNode::text("c")]),
            MarkupNode::element(Vec::new()),
        ]);
        assert_eq!(flatten_node(&tree), "a\nb\nc\n");
    }

    #[test]
    fn test_nested_inline_elements_split_lines() {
        assert_eq!(flatten("<div><b>bold</b> tail</div>"), "bold\n tail");
    }

    #[test]
    fn test_attributes_are_dropped() {
        assert_eq!(
            flatten(r#"<a href="https://example.com" title="x">link</a>"#),
            "link"
        );
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(flatten("a<!-- hidden -->b"), "a\nb");
    }

    #[test]
    fn test_tolerates_unclosed_tags() {
        assert_eq!(flatten("<div>one<div>two"), "one\ntwo");
    }

    #[test]
    fn test_entities_are_decoded() {
        assert_eq!(flatten("<div>fish &amp; chips</div>"), "fish & chips");
    }

    #[test]
    fn test_empty_markup() {
        assert!(parse("").is_empty());
        assert_eq!(flatten(""), "");
    }
}
