//! Fix strategy implementations
//!
//! A strategy is bound to the violations of one check group (and, for
//! configured checks, one configuration module) and rewrites one tree at
//! a time. Output is byte-identical outside the regions its matched
//! violations address, and a violation that matches no node is simply
//! left unclaimed.

pub mod header;
pub mod hex_literal_case;
pub mod redundant_import;
pub mod upper_ell;

pub use header::HeaderFix;
pub use hex_literal_case::HexLiteralCaseFix;
pub use redundant_import::RedundantImportFix;
pub use upper_ell::UpperEllFix;

use std::collections::HashSet;
use std::path::Path;

use stylefix_core::SourceTree;
use stylefix_parser::Violation;

/// A violation-driven tree transform.
pub trait Fix {
    /// Internal name for this fix.
    fn name(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str;

    /// Applies the fix to one file's tree. Strategies scanning multiple
    /// files are driven sequentially by one caller; claimed violations
    /// stay claimed across calls.
    fn apply(&mut self, tree: SourceTree) -> SourceTree;

    /// Claim bookkeeping for summaries.
    fn violations(&self) -> &ViolationSet;
}

/// The violations bound to one strategy, with claim markers instead of
/// destructive removal. A violation is claimed by at most one node over
/// the strategy's lifetime.
#[derive(Debug)]
pub struct ViolationSet {
    violations: Vec<Violation>,
    claimed: HashSet<usize>,
}

impl ViolationSet {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self {
            violations,
            claimed: HashSet::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.violations.len()
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    pub fn unclaimed(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.claimed.contains(i))
            .map(|(_, v)| v)
    }

    /// Claims the first unclaimed violation for `file` addressing the
    /// given printed position (absent columns match on line alone).
    pub fn claim_position(&mut self, file: &Path, line: usize, column: usize) -> bool {
        self.claim_where(|v| v.file_name == file && v.addresses(line, column))
    }

    /// Claims the first unclaimed violation for `file` on `line`,
    /// regardless of column.
    pub fn claim_line(&mut self, file: &Path, line: usize) -> bool {
        self.claim_where(|v| v.file_name == file && v.line == line)
    }

    /// Claims every unclaimed violation for `file`; true if any was.
    pub fn claim_file(&mut self, file: &Path) -> bool {
        let mut any = false;
        for (index, violation) in self.violations.iter().enumerate() {
            if !self.claimed.contains(&index) && violation.file_name == file {
                self.claimed.insert(index);
                any = true;
            }
        }
        any
    }

    fn claim_where(&mut self, predicate: impl Fn(&Violation) -> bool) -> bool {
        let found = self
            .violations
            .iter()
            .enumerate()
            .find(|(i, v)| !self.claimed.contains(i) && predicate(v));
        match found {
            Some((index, _)) => {
                self.claimed.insert(index);
                true
            }
            None => false,
        }
    }
}
