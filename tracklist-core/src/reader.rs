//! Shared low-level readers
//!
//! - [`lines`]: trimmed, non-empty lines of a text export
//! - [`select`]: element paths over an XML tree, CSS style. Each [`Step`]
//!   is matched either against the direct children (`>`) or against all
//!   descendants of the previous step's matches, so identically named
//!   elements in other sections never leak into a result.

use roxmltree::{Document, Node};
use tracing::debug;

use crate::error::Result;

/// Trimmed, non-empty lines in file order
pub fn lines(contents: &str) -> impl Iterator<Item = &str> {
    contents.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Like [`lines`], but `keep` is not trimmed, so rows of a delimited file
/// whose first or last column is empty stay aligned
pub fn lines_keeping(contents: &str, keep: char) -> impl Iterator<Item = &str> {
    contents
        .lines()
        .map(move |line| line.trim_matches(|c: char| c.is_whitespace() && c != keep))
        .filter(|line| !line.is_empty())
}

/// Parse an XML document, logging why it was rejected
pub fn parse_document(contents: &str) -> Result<Document<'_>> {
    Document::parse(contents).map_err(|e| {
        debug!("Not well-formed XML: {}", e);
        e.into()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
}

/// One element step of a selector path
#[derive(Debug, Clone, Copy)]
pub struct Step<'s> {
    axis: Axis,
    tag: &'s str,
    attribute: Option<(&'s str, &'s str)>,
}

impl<'s> Step<'s> {
    /// Direct child named `tag`
    pub const fn child(tag: &'s str) -> Self {
        Self { axis: Axis::Child, tag, attribute: None }
    }

    /// Any descendant named `tag`
    pub const fn descendant(tag: &'s str) -> Self {
        Self { axis: Axis::Descendant, tag, attribute: None }
    }

    /// Additionally require `name="value"`
    pub const fn with_attribute(self, name: &'s str, value: &'s str) -> Self {
        Self {
            axis: self.axis,
            tag: self.tag,
            attribute: Some((name, value)),
        }
    }

    fn matches(&self, node: &Node) -> bool {
        node.is_element()
            && node.tag_name().name() == self.tag
            && match self.attribute {
                Some((name, value)) => node.attribute(name) == Some(value),
                None => true,
            }
    }
}

/// Elements reached from `scope` by following `path`, in document order.
///
/// Pass `document.root()` to anchor the first step at the root element.
pub fn select<'a, 'input>(scope: Node<'a, 'input>, path: &[Step]) -> Vec<Node<'a, 'input>> {
    let mut current = vec![scope];

    for step in path {
        let mut next = Vec::new();
        match step.axis {
            Axis::Child => {
                for node in &current {
                    next.extend(node.children().filter(|n| step.matches(n)));
                }
            }
            Axis::Descendant => {
                // nested scopes would yield the same descendants twice
                let outermost = current
                    .iter()
                    .filter(|node| !node.ancestors().skip(1).any(|a| current.contains(&a)));
                for node in outermost {
                    next.extend(node.descendants().skip(1).filter(|n| step.matches(n)));
                }
            }
        }
        current = next;
    }

    current
}

/// First descendant element named `tag`
pub fn first_descendant<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}

/// Attribute value, or the empty string when absent
pub fn attribute_or_empty<'a>(node: Node<'a, '_>, name: &str) -> &'a str {
    node.attribute(name).unwrap_or("")
}
