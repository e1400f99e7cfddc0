//! XML navigation helpers for the namespaced API payload.
//!
//! The 25Live API prefixes every element with the `r25` namespace; these
//! helpers match on local tag names so callers never deal with prefixes.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
pub fn tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first child element with the given local tag name.
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && tag_name(*child) == tag)
}

/// Find all child elements with the given local tag name.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && tag_name(*child) == tag)
}

/// Get the trimmed text content of the first matching child element.
///
/// Returns `None` when the child is absent or its text is empty.
pub fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    find_child(node, tag)
        .and_then(|child| child.text())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
