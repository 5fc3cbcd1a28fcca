use rowan::{TextRange, TextSize};

use crate::syntax::SyntaxTree;
use crate::syntax::ast::AstNode;
use crate::syntax::cst::SyntaxNode;
use crate::syntax::kind::SyntaxKind;

/// Chain of syntax nodes enclosing an offset, outermost (the translation unit) first.
///
/// Every node's range contains the offset and lies inside the range of the node before it. The
/// path is empty when the offset falls outside every construct of the document, e.g. in trailing
/// whitespace or past the end of a stale buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstPath {
    offset: TextSize,
    nodes: Vec<SyntaxNode>,
}

/// Resolve the path of nodes enclosing `offset` in `tree`.
pub fn resolve(
    tree: &SyntaxTree,
    offset: TextSize,
) -> AstPath {
    AstPath::resolve(tree, offset)
}

impl AstPath {
    pub fn resolve(
        tree: &SyntaxTree,
        offset: TextSize,
    ) -> Self {
        let mut nodes = Vec::new();
        let in_root = tree
            .significant_range()
            .is_some_and(|range| range.contains(offset));
        if in_root {
            let root = tree.root();
            debug_assert_eq!(root.kind(), SyntaxKind::Root);
            let mut current = root;
            loop {
                // Sibling ranges are disjoint, so at most one child matches.
                let next = current
                    .children()
                    .find(|child| child.text_range().contains(offset));
                nodes.push(current);
                match next {
                    Some(child) => current = child,
                    None => break,
                }
            }
        }
        Self { offset, nodes }
    }

    pub fn offset(&self) -> TextSize {
        self.offset
    }

    pub fn nodes(&self) -> &[SyntaxNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn outermost(&self) -> Option<&SyntaxNode> {
        self.nodes.first()
    }

    pub fn innermost(&self) -> Option<&SyntaxNode> {
        self.nodes.last()
    }

    /// Nodes from the outermost to the innermost.
    pub fn iter(&self) -> std::slice::Iter<'_, SyntaxNode> {
        self.nodes.iter()
    }

    pub fn kinds(&self) -> Vec<SyntaxKind> {
        self.nodes.iter().map(SyntaxNode::kind).collect()
    }

    pub fn contains_kind(
        &self,
        kind: SyntaxKind,
    ) -> bool {
        self.nodes.iter().any(|node| node.kind() == kind)
    }

    /// Innermost node of type `N` on the path.
    pub fn find_innermost<N: AstNode>(&self) -> Option<N> {
        self.nodes.iter().rev().find_map(|node| N::cast(node.clone()))
    }

    /// Outermost node of type `N` on the path.
    pub fn find_outermost<N: AstNode>(&self) -> Option<N> {
        self.nodes.iter().find_map(|node| N::cast(node.clone()))
    }

    /// Position of the innermost node of `kind`, counted from the outermost node.
    pub fn depth_of(
        &self,
        kind: SyntaxKind,
    ) -> Option<usize> {
        self.nodes.iter().rposition(|node| node.kind() == kind)
    }

    /// Range of the innermost node, if any.
    pub fn innermost_range(&self) -> Option<TextRange> {
        self.innermost().map(SyntaxNode::text_range)
    }
}

impl<'a> IntoIterator for &'a AstPath {
    type Item = &'a SyntaxNode;
    type IntoIter = std::slice::Iter<'a, SyntaxNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/src/quickfix/path_tests.rs"]
mod tests;
