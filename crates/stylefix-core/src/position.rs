//! Printed-position resolution
//!
//! The tree stores no absolute offsets, so a node's (line, column) in
//! printed output is recovered by scanning a lazy print of the tree and
//! stopping at the first step that belongs to the target. The scan is
//! finite and non-restartable; cost is proportional to the text printed
//! before the target, and nothing past the target is ever materialized.

use crate::tree::{Node, NodeId, SourceTree};

/// 1-based line and column of a node's first printed character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// One print step: the owning node, the whitespace emitted before its
/// text, and the text itself.
pub struct ScanStep<'a> {
    pub id: NodeId,
    pub prefix: &'a str,
    pub text: &'a str,
}

enum Frame<'a> {
    Node(&'a Node),
    /// Closing delimiter of a group, owned by the group's id.
    Close(&'a Node),
}

/// Lazy print of a tree in document order. Pulling stops cleanly at any
/// point; no panic-based control flow.
pub struct PrintScan<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> PrintScan<'a> {
    pub fn new(tree: &'a SourceTree) -> Self {
        let mut stack: Vec<Frame<'a>> = tree.top_level().iter().map(Frame::Node).collect();
        stack.reverse();
        PrintScan { stack }
    }
}

impl<'a> Iterator for PrintScan<'a> {
    type Item = ScanStep<'a>;

    fn next(&mut self) -> Option<ScanStep<'a>> {
        match self.stack.pop()? {
            Frame::Node(node) => match node {
                Node::Token { id, prefix, text }
                | Node::Literal {
                    id, prefix, text, ..
                }
                | Node::Comment {
                    id, prefix, text, ..
                } => Some(ScanStep {
                    id: *id,
                    prefix,
                    text,
                }),
                Node::Group {
                    id,
                    prefix,
                    kind,
                    children,
                    ..
                } => {
                    self.stack.push(Frame::Close(node));
                    for child in children.iter().rev() {
                        self.stack.push(Frame::Node(child));
                    }
                    Some(ScanStep {
                        id: *id,
                        prefix,
                        text: kind.open(),
                    })
                }
            },
            Frame::Close(group) => match group {
                Node::Group {
                    id,
                    kind,
                    close_prefix,
                    ..
                } => Some(ScanStep {
                    id: *id,
                    prefix: close_prefix,
                    text: kind.close(),
                }),
                _ => None,
            },
        }
    }
}

fn advance(line: &mut usize, column: &mut usize, text: &str) {
    for ch in text.chars() {
        if ch == '\n' {
            *line += 1;
            *column = 0;
        } else {
            *column += 1;
        }
    }
}

/// Resolves the printed (line, column) of `target`. A group resolves to
/// its opening delimiter. Returns `None` when the node is not in the
/// tree. The scan stops as soon as it reaches the step owned by the
/// target — an enclosing group always emits before its children, so the
/// target's subtree is never printed.
pub fn resolve_position(tree: &SourceTree, target: NodeId) -> Option<Position> {
    let mut line = 1usize;
    let mut column = 0usize;
    for step in PrintScan::new(tree) {
        advance(&mut line, &mut column, step.prefix);
        if step.id == target {
            return Some(Position {
                line,
                column: column + 1,
            });
        }
        advance(&mut line, &mut column, step.text);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::LiteralKind;

    #[test]
    fn test_literal_position_in_fixture() {
        let tree = SourceTree::parse("C.java", "class C {\n  long x = 10l;\n}").unwrap();
        let literal = tree
            .walk()
            .find(|n| n.literal_kind() == Some(LiteralKind::Long))
            .map(|n| n.id())
            .unwrap();
        let pos = resolve_position(&tree, literal).unwrap();
        assert_eq!(pos, Position { line: 2, column: 12 });
    }

    #[test]
    fn test_first_token_is_line_one_column_one() {
        let tree = SourceTree::parse("C.java", "class C {}").unwrap();
        let first = tree.top_level()[0].id();
        assert_eq!(
            resolve_position(&tree, first),
            Some(Position { line: 1, column: 1 })
        );
    }

    #[test]
    fn test_group_resolves_to_opening_delimiter() {
        let tree = SourceTree::parse("C.java", "class C\n{\n}\n").unwrap();
        let group = tree
            .walk()
            .find(|n| matches!(n, Node::Group { .. }))
            .map(|n| n.id())
            .unwrap();
        assert_eq!(
            resolve_position(&tree, group),
            Some(Position { line: 2, column: 1 })
        );
    }

    #[test]
    fn test_scan_stops_at_target() {
        let tree = SourceTree::parse("C.java", "int a = 1; int b = 2;").unwrap();
        let target = tree
            .walk()
            .find(|n| n.text() == Some("1"))
            .map(|n| n.id())
            .unwrap();
        let mut scan = PrintScan::new(&tree);
        let mut steps = 0;
        for step in scan.by_ref() {
            steps += 1;
            if step.id == target {
                break;
            }
        }
        // int a = 1 -> four steps; nothing after the literal was pulled.
        assert_eq!(steps, 4);
        assert!(scan.next().is_some());
    }

    #[test]
    fn test_missing_node_resolves_to_none() {
        // Ids are assigned per tree; the largest id of a bigger tree is
        // out of range for a smaller one.
        let small = SourceTree::parse("C.java", "class C {}").unwrap();
        let big = SourceTree::parse("D.java", "class D { int x = 0; }").unwrap();
        let foreign = big.walk().map(|n| n.id()).max().unwrap();
        assert!(small.walk().all(|n| n.id() != foreign));
        assert_eq!(resolve_position(&small, foreign), None);
    }
}
