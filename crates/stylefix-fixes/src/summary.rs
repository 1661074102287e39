//! Sequential fix application and its machine-readable summary
//!
//! Violations no strategy could locate are not swallowed: they come back
//! in the summary, serializable for surrounding tooling.

use serde::Serialize;

use stylefix_core::SourceTree;
use stylefix_parser::Violation;

use crate::fixes::Fix;
use crate::logging;

#[derive(Debug, Serialize)]
pub struct AppliedFix {
    pub name: String,
    pub claimed: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct FixSummary {
    pub fixes: Vec<AppliedFix>,
    /// Violations that matched no node in any processed file.
    pub unmatched: Vec<Violation>,
}

impl FixSummary {
    pub fn unmatched_count(&self) -> usize {
        self.unmatched.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Applies every strategy to every tree, one file at a time on one
/// thread; claim state carries across files within a strategy.
pub fn apply_fixes(
    fixes: &mut [Box<dyn Fix>],
    mut trees: Vec<SourceTree>,
) -> (Vec<SourceTree>, FixSummary) {
    logging::section("FIX APPLICATION");
    for fix in fixes.iter_mut() {
        trees = trees
            .into_iter()
            .map(|tree| fix.apply(tree))
            .collect();
        logging::log(&format!(
            "applied `{}`: {}/{} violation(s) claimed",
            fix.name(),
            fix.violations().claimed_count(),
            fix.violations().total()
        ));
    }

    let summary = FixSummary {
        fixes: fixes
            .iter()
            .map(|fix| AppliedFix {
                name: fix.name().to_string(),
                claimed: fix.violations().claimed_count(),
                total: fix.violations().total(),
            })
            .collect(),
        unmatched: fixes
            .iter()
            .flat_map(|fix| fix.violations().unclaimed().cloned())
            .collect(),
    };
    logging::log(&format!(
        "{} violation(s) had no applicable fix",
        summary.unmatched_count()
    ));
    (trees, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixes::UpperEllFix;
    use stylefix_parser::Severity;

    fn violation(line: usize, column: usize, file: &str) -> Violation {
        Violation::new(line, Some(column), Severity::Error, "UpperEll", "m", file)
    }

    #[test]
    fn test_apply_fixes_reports_unmatched() {
        let trees = vec![
            SourceTree::parse("A.java", "class A {\n  long x = 1l;\n}\n").unwrap(),
            SourceTree::parse("B.java", "class B {}\n").unwrap(),
        ];
        let mut fixes: Vec<Box<dyn Fix>> = vec![Box::new(UpperEllFix::new(vec![
            violation(2, 12, "A.java"),
            violation(7, 3, "B.java"),
        ]))];

        let (fixed, summary) = apply_fixes(&mut fixes, trees);
        assert_eq!(fixed[0].print(), "class A {\n  long x = 1L;\n}\n");
        assert_eq!(fixed[1].print(), "class B {}\n");

        assert_eq!(summary.fixes.len(), 1);
        assert_eq!(summary.fixes[0].claimed, 1);
        assert_eq!(summary.fixes[0].total, 2);
        assert_eq!(summary.unmatched_count(), 1);
        assert_eq!(summary.unmatched[0].line, 7);

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"unmatched\""));
        assert!(json.contains("upper_ell"));
    }
}
