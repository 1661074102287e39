//! stylefix-core: Lossless source tree and position resolution
//!
//! This crate provides:
//! - `SourceTree`: a formatting-preserving parse of one source file
//! - `Node` / `NodeId`: prefixed tokens, comments, literals and groups
//! - `PrintScan`: a lazy, cancelable print of a tree in document order
//! - `resolve_position()`: the printed (line, column) of any node

pub mod lexer;
pub mod position;
pub mod tree;

pub use position::{resolve_position, Position, PrintScan, ScanStep};
pub use tree::{CommentStyle, GroupKind, LiteralKind, Node, NodeId, SourceTree, TreeError, Walk};
