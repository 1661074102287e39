//! RedundantImport fix: remove whole `import …;` statements at reported
//! lines.

use stylefix_core::{resolve_position, SourceTree};
use stylefix_parser::Violation;

use super::{Fix, ViolationSet};

pub struct RedundantImportFix {
    violations: ViolationSet,
}

impl RedundantImportFix {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self {
            violations: ViolationSet::new(violations),
        }
    }
}

impl Fix for RedundantImportFix {
    fn name(&self) -> &'static str {
        "redundant_import"
    }

    fn description(&self) -> &'static str {
        "Removes import statements reported as redundant"
    }

    fn apply(&mut self, mut tree: SourceTree) -> SourceTree {
        let path = tree.path().to_path_buf();

        // Each removal is a top-level index range from the `import`
        // keyword through its `;`. Reported columns vary between
        // linters, so imports match on line alone.
        let mut removals: Vec<std::ops::Range<usize>> = Vec::new();
        let nodes = tree.top_level();
        let mut index = 0;
        while index < nodes.len() {
            if !nodes[index].is_word("import") {
                index += 1;
                continue;
            }
            let Some(end) = nodes[index..]
                .iter()
                .position(|n| n.text() == Some(";"))
                .map(|offset| index + offset)
            else {
                break;
            };
            if let Some(position) = resolve_position(&tree, nodes[index].id()) {
                if self.violations.claim_line(&path, position.line) {
                    removals.push(index..end + 1);
                }
            }
            index = end + 1;
        }

        for range in removals.into_iter().rev() {
            tree.remove_top_level(range);
        }
        tree
    }

    fn violations(&self) -> &ViolationSet {
        &self.violations
    }
}
