//! HexLiteralCase fix: canonical casing for hex literals at reported
//! positions — lowercase `0x` prefix, uppercase digits.

use stylefix_core::{resolve_position, NodeId, SourceTree};
use stylefix_parser::Violation;

use super::{Fix, ViolationSet};

pub struct HexLiteralCaseFix {
    violations: ViolationSet,
}

impl HexLiteralCaseFix {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self {
            violations: ViolationSet::new(violations),
        }
    }
}

/// Canonical form of a hex literal, or `None` when `text` is not hex or
/// already canonical. Any `l`/`L` suffix is kept as written.
fn canonical_hex(text: &str) -> Option<String> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))?;
    let (digits, suffix) = match digits.strip_suffix(['l', 'L']) {
        Some(stripped) => (stripped, &digits[stripped.len()..]),
        None => (digits, ""),
    };
    let canonical = format!("0x{}{}", digits.to_ascii_uppercase(), suffix);
    if canonical == text {
        None
    } else {
        Some(canonical)
    }
}

impl Fix for HexLiteralCaseFix {
    fn name(&self) -> &'static str {
        "hex_literal_case"
    }

    fn description(&self) -> &'static str {
        "Rewrites hex literals to a lowercase prefix and uppercase digits"
    }

    fn apply(&mut self, mut tree: SourceTree) -> SourceTree {
        let path = tree.path().to_path_buf();

        let mut edits: Vec<(NodeId, String)> = Vec::new();
        for node in tree.walk() {
            let Some(text) = node.text() else { continue };
            if node.literal_kind().is_none() {
                continue;
            }
            let Some(canonical) = canonical_hex(text) else { continue };
            let Some(position) = resolve_position(&tree, node.id()) else {
                continue;
            };
            if self
                .violations
                .claim_position(&path, position.line, position.column)
            {
                edits.push((node.id(), canonical));
            }
        }

        for (id, replacement) in edits {
            tree.replace_text(id, replacement);
        }
        tree
    }

    fn violations(&self) -> &ViolationSet {
        &self.violations
    }
}
