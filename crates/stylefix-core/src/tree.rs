//! Lossless concrete source tree
//!
//! Nodes carry the whitespace that precedes them instead of absolute
//! offsets, so an unmodified tree prints back to the exact input text and
//! edits never disturb untouched regions.

use std::path::{Path, PathBuf};

use crate::lexer::{LexError, Lexer, RawKind, RawToken};

/// Identity of a node within one tree, assigned in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    Line,
    Block,
}

/// Semantic kind of a numeric literal, derived from its suffix and shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Brace,
    Paren,
    Bracket,
}

impl GroupKind {
    pub fn open(self) -> &'static str {
        match self {
            GroupKind::Brace => "{",
            GroupKind::Paren => "(",
            GroupKind::Bracket => "[",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            GroupKind::Brace => "}",
            GroupKind::Paren => ")",
            GroupKind::Bracket => "]",
        }
    }

    fn from_open(ch: char) -> Option<Self> {
        match ch {
            '{' => Some(GroupKind::Brace),
            '(' => Some(GroupKind::Paren),
            '[' => Some(GroupKind::Bracket),
            _ => None,
        }
    }

    fn from_close(ch: char) -> Option<Self> {
        match ch {
            '}' => Some(GroupKind::Brace),
            ')' => Some(GroupKind::Paren),
            ']' => Some(GroupKind::Bracket),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    /// Identifier, keyword, operator character or string/char literal.
    Token { id: NodeId, prefix: String, text: String },
    /// Numeric literal with its semantic kind.
    Literal {
        id: NodeId,
        prefix: String,
        text: String,
        kind: LiteralKind,
    },
    Comment {
        id: NodeId,
        prefix: String,
        text: String,
        style: CommentStyle,
    },
    /// Delimited group; the closing delimiter keeps its own prefix.
    Group {
        id: NodeId,
        prefix: String,
        kind: GroupKind,
        children: Vec<Node>,
        close_prefix: String,
    },
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Token { id, .. }
            | Node::Literal { id, .. }
            | Node::Comment { id, .. }
            | Node::Group { id, .. } => *id,
        }
    }

    pub fn prefix(&self) -> &str {
        match self {
            Node::Token { prefix, .. }
            | Node::Literal { prefix, .. }
            | Node::Comment { prefix, .. }
            | Node::Group { prefix, .. } => prefix,
        }
    }

    pub fn set_prefix(&mut self, new_prefix: impl Into<String>) {
        let slot = match self {
            Node::Token { prefix, .. }
            | Node::Literal { prefix, .. }
            | Node::Comment { prefix, .. }
            | Node::Group { prefix, .. } => prefix,
        };
        *slot = new_prefix.into();
    }

    /// Leaf text; `None` for groups.
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Token { text, .. } | Node::Literal { text, .. } | Node::Comment { text, .. } => {
                Some(text)
            }
            Node::Group { .. } => None,
        }
    }

    pub fn literal_kind(&self) -> Option<LiteralKind> {
        match self {
            Node::Literal { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Node::Comment { .. })
    }

    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, Node::Token { text, .. } if text == word)
    }

    fn subtree_contains(&self, id: NodeId) -> bool {
        if self.id() == id {
            return true;
        }
        match self {
            Node::Group { children, .. } => children.iter().any(|c| c.subtree_contains(id)),
            _ => false,
        }
    }

    fn print_into(&self, out: &mut String) {
        out.push_str(self.prefix());
        match self {
            Node::Token { text, .. } | Node::Literal { text, .. } | Node::Comment { text, .. } => {
                out.push_str(text);
            }
            Node::Group {
                kind,
                children,
                close_prefix,
                ..
            } => {
                out.push_str(kind.open());
                for child in children {
                    child.print_into(out);
                }
                out.push_str(close_prefix);
                out.push_str(kind.close());
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("unbalanced closing delimiter `{0}`")]
    UnbalancedClose(char),
    #[error("unclosed delimiter `{0}`")]
    UnclosedOpen(char),
}

/// A whole parsed source file. Printing an unmodified tree reproduces the
/// original text byte for byte.
#[derive(Debug, Clone)]
pub struct SourceTree {
    path: PathBuf,
    children: Vec<Node>,
    /// Whitespace after the last token.
    eof: String,
}

impl SourceTree {
    pub fn parse(path: impl Into<PathBuf>, source: &str) -> Result<Self, TreeError> {
        let tokens = Lexer::tokenize(source)?;
        let mut builder = Builder::new();
        builder.build(tokens)?;
        Ok(SourceTree {
            path: path.into(),
            children: builder.finish()?,
            eof: builder.eof,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn print(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.print_into(&mut out);
        }
        out.push_str(&self.eof);
        out
    }

    /// Preorder walk over every node in document order.
    pub fn walk(&self) -> Walk<'_> {
        let mut stack: Vec<&Node> = self.children.iter().collect();
        stack.reverse();
        Walk { stack }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.walk().find(|n| n.id() == id)
    }

    /// Structural containment: `ancestor` is `node` itself or one of its
    /// enclosing groups.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        match self.node(ancestor) {
            Some(n) => n.subtree_contains(node),
            None => false,
        }
    }

    /// Rewrites the text of a leaf node. Returns false when `id` is
    /// missing or refers to a group.
    pub fn replace_text(&mut self, id: NodeId, new_text: impl Into<String>) -> bool {
        fn visit(nodes: &mut [Node], id: NodeId, new_text: String) -> bool {
            for node in nodes {
                match node {
                    Node::Token { id: nid, text, .. }
                    | Node::Literal { id: nid, text, .. }
                    | Node::Comment { id: nid, text, .. }
                        if *nid == id =>
                    {
                        *text = new_text;
                        return true;
                    }
                    Node::Group { children, .. } => {
                        if visit(children, id, new_text.clone()) {
                            return true;
                        }
                    }
                    _ => {}
                }
            }
            false
        }
        visit(&mut self.children, id, new_text.into())
    }

    /// The run of comments before the first real token of the file.
    pub fn leading_comments(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().take_while(|n| n.is_comment())
    }

    /// Replaces the file's leading whitespace/comment region with `text`.
    /// The first remaining token follows the new text directly.
    pub fn replace_leading(&mut self, text: &str) {
        let kept = self.children.iter().position(|n| !n.is_comment());
        match kept {
            Some(index) => {
                self.children.drain(..index);
                self.children[0].set_prefix(text);
            }
            None => {
                self.children.clear();
                self.eof = text.to_string();
            }
        }
    }

    /// Top-level nodes, for strategies that scan file-scope statements.
    pub fn top_level(&self) -> &[Node] {
        &self.children
    }

    /// Removes the top-level nodes in `range`, deleting the line they
    /// occupied: the first removed node's prefix is kept, and the
    /// following node's prefix loses its leading line break, so blank
    /// lines and indentation around the removal survive.
    pub fn remove_top_level(&mut self, range: std::ops::Range<usize>) {
        if range.start >= range.end || range.end > self.children.len() {
            return;
        }
        let removed_prefix = self.children[range.start].prefix().to_string();
        let start = range.start;
        self.children.drain(range);
        if let Some(next) = self.children.get_mut(start) {
            let folded = match next.prefix().find('\n') {
                Some(i) => format!("{}{}", removed_prefix, &next.prefix()[i + 1..]),
                None => removed_prefix,
            };
            next.set_prefix(folded);
        }
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        if let Node::Group { children, .. } = node {
            for child in children.iter().rev() {
                self.stack.push(child);
            }
        }
        Some(node)
    }
}

struct Builder {
    next_id: u32,
    stack: Vec<(GroupKind, NodeId, String, Vec<Node>)>,
    top: Vec<Node>,
    eof: String,
}

impl Builder {
    fn new() -> Self {
        Self {
            next_id: 0,
            stack: Vec::new(),
            top: Vec::new(),
            eof: String::new(),
        }
    }

    fn fresh_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some((_, _, _, children)) => children.push(node),
            None => self.top.push(node),
        }
    }

    fn build(&mut self, tokens: Vec<RawToken>) -> Result<(), TreeError> {
        for token in tokens {
            if token.text.is_empty() {
                // Trailing whitespace marker from the lexer.
                self.eof = token.prefix;
                continue;
            }
            match token.kind {
                RawKind::Open(ch) => {
                    let kind = GroupKind::from_open(ch).unwrap_or(GroupKind::Brace);
                    let id = self.fresh_id();
                    self.stack.push((kind, id, token.prefix, Vec::new()));
                }
                RawKind::Close(ch) => {
                    let expected = GroupKind::from_close(ch).unwrap_or(GroupKind::Brace);
                    match self.stack.pop() {
                        Some((kind, id, prefix, children)) if kind == expected => {
                            self.push(Node::Group {
                                id,
                                prefix,
                                kind,
                                children,
                                close_prefix: token.prefix,
                            });
                        }
                        _ => return Err(TreeError::UnbalancedClose(ch)),
                    }
                }
                RawKind::Number(kind) => {
                    let id = self.fresh_id();
                    self.push(Node::Literal {
                        id,
                        prefix: token.prefix,
                        text: token.text,
                        kind,
                    });
                }
                RawKind::LineComment | RawKind::BlockComment => {
                    let style = if token.kind == RawKind::LineComment {
                        CommentStyle::Line
                    } else {
                        CommentStyle::Block
                    };
                    let id = self.fresh_id();
                    self.push(Node::Comment {
                        id,
                        prefix: token.prefix,
                        text: token.text,
                        style,
                    });
                }
                RawKind::Word | RawKind::Str | RawKind::Char | RawKind::Punct => {
                    let id = self.fresh_id();
                    self.push(Node::Token {
                        id,
                        prefix: token.prefix,
                        text: token.text,
                    });
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<Node>, TreeError> {
        if let Some((kind, _, _, _)) = self.stack.first() {
            let open = kind.open().chars().next().unwrap_or('{');
            return Err(TreeError::UnclosedOpen(open));
        }
        Ok(std::mem::take(&mut self.top))
    }
}
