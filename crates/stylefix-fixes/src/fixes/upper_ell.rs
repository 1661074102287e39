//! UpperEll fix: rewrite the lowercase `l` suffix of long literals at
//! reported positions to `L`.

use stylefix_core::{resolve_position, LiteralKind, NodeId, SourceTree};
use stylefix_parser::Violation;

use super::{Fix, ViolationSet};

pub struct UpperEllFix {
    violations: ViolationSet,
}

impl UpperEllFix {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self {
            violations: ViolationSet::new(violations),
        }
    }
}

impl Fix for UpperEllFix {
    fn name(&self) -> &'static str {
        "upper_ell"
    }

    fn description(&self) -> &'static str {
        "Replaces the lowercase `l` long-literal suffix with `L`"
    }

    fn apply(&mut self, mut tree: SourceTree) -> SourceTree {
        let path = tree.path().to_path_buf();

        // Filter by literal kind before resolving positions; resolution
        // cost is proportional to the text printed before each target.
        let mut edits: Vec<(NodeId, String)> = Vec::new();
        for node in tree.walk() {
            if node.literal_kind() != Some(LiteralKind::Long) {
                continue;
            }
            let Some(text) = node.text() else { continue };
            let Some(numeric) = text.strip_suffix('l') else { continue };
            let Some(position) = resolve_position(&tree, node.id()) else {
                continue;
            };
            if self
                .violations
                .claim_position(&path, position.line, position.column)
            {
                edits.push((node.id(), format!("{numeric}L")));
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
