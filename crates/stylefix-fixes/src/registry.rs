//! Fix registry
//!
//! Groups violations by check id, resolves each group's configuration
//! module, and instantiates the matching fix strategy from a closed
//! factory table. A group with no matching module or no registered
//! strategy yields nothing; only a mandatory-configured check with no
//! module is an error.

use stylefix_parser::{ConfigError, ConfigTree, Violation};

use crate::check::{CheckKind, ConfigModule};
use crate::fixes::{Fix, HeaderFix, HexLiteralCaseFix, RedundantImportFix, UpperEllFix};
use crate::logging;

const HASH_SEPARATOR: char = '#';
/// Container module whose children are per-file-tree checks.
const CONTAINER_MODULE: &str = "TreeWalker";

pub struct FixRegistry;

impl FixRegistry {
    /// Resolves violations against a configuration into fix strategies.
    /// Strategy order follows first-seen group order; callers should
    /// only rely on the set produced.
    pub fn resolve(
        violations: &[Violation],
        config: &ConfigTree,
    ) -> Result<Vec<Box<dyn Fix>>, ConfigError> {
        let candidates = collect_candidates(config);
        logging::log(&format!(
            "registry: {} candidate module(s), {} violation(s)",
            candidates.len(),
            violations.len()
        ));

        let mut fixes: Vec<Box<dyn Fix>> = Vec::new();
        for (check_id, group) in group_by_check_id(violations) {
            let matched = find_matching(&check_id, &candidates);
            logging::log(&format!(
                "registry: group `{}` ({} violation(s)) -> {}",
                check_id,
                group.len(),
                match matched {
                    Some(m) => format!("module `{}`", m.kind),
                    None => "no matching module".to_string(),
                }
            ));

            let Some(module) = matched else {
                // Absence of configuration means no fix is registered
                // for this check, unless the check demands one.
                if let Some(kind) = kind_of_check_id(&check_id) {
                    if kind.mandatory_configured() {
                        return Err(ConfigError::CheckNotConfigured(kind.name().to_string()));
                    }
                }
                continue;
            };

            let fix = build_fix(module, group, config)?;
            logging::log(&format!("registry: built `{}`", fix.name()));
            fixes.push(fix);
        }
        Ok(fixes)
    }
}

/// Closed factory table over check kinds.
fn build_fix(
    module: &ConfigModule,
    group: Vec<Violation>,
    config: &ConfigTree,
) -> Result<Box<dyn Fix>, ConfigError> {
    let fix: Box<dyn Fix> = match module.kind {
        CheckKind::Header => Box::new(HeaderFix::from_config(group, config, module.module)?),
        CheckKind::UpperEll => Box::new(UpperEllFix::new(group)),
        CheckKind::HexLiteralCase => Box::new(HexLiteralCaseFix::new(group)),
        CheckKind::RedundantImport => Box::new(RedundantImportFix::new(group)),
    };
    Ok(fix)
}

/// Groups violations by check id, preserving first-seen group order and
/// report order within a group.
fn group_by_check_id(violations: &[Violation]) -> Vec<(String, Vec<Violation>)> {
    let mut groups: Vec<(String, Vec<Violation>)> = Vec::new();
    for violation in violations {
        match groups.iter_mut().find(|(id, _)| *id == violation.check_id) {
            Some((_, group)) => group.push(violation.clone()),
            None => groups.push((violation.check_id.clone(), vec![violation.clone()])),
        }
    }
    groups
}

/// Candidate modules in search order: direct children of the root, then
/// children one level inside any container module.
fn collect_candidates(config: &ConfigTree) -> Vec<ConfigModule> {
    let mut candidates = Vec::new();
    for child in config.children(config.root()) {
        if let Some(module) = ConfigModule::from_node(config, child) {
            candidates.push(module);
        }
    }
    for child in config.children(config.root()) {
        if config.name(child) == CONTAINER_MODULE {
            for nested in config.children(child) {
                if let Some(module) = ConfigModule::from_node(config, nested) {
                    candidates.push(module);
                }
            }
        }
    }
    candidates
}

fn find_matching<'c>(check_id: &str, candidates: &'c [ConfigModule]) -> Option<&'c ConfigModule> {
    match check_id.split_once(HASH_SEPARATOR) {
        Some((check_part, id_part)) => {
            // Exact kind+id match wins over a loose match on the raw
            // string.
            candidates
                .iter()
                .find(|m| m.matches_check(check_part) && m.matches_id(id_part))
                .or_else(|| {
                    candidates
                        .iter()
                        .find(|m| m.matches_id(check_id) || m.matches_check(check_id))
                })
        }
        None => candidates
            .iter()
            .find(|m| m.matches_id(check_id) || m.matches_check(check_id)),
    }
}

/// Kind implied by a check id alone, used when no module matched.
fn kind_of_check_id(check_id: &str) -> Option<CheckKind> {
    let check_part = check_id
        .split_once(HASH_SEPARATOR)
        .map(|(check, _)| check)
        .unwrap_or(check_id);
    CheckKind::from_source(check_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use stylefix_parser::Severity;

    fn violation(check_id: &str, file: &str) -> Violation {
        Violation::new(5, Some(10), Severity::Error, check_id, "m", file)
    }

    fn config_with_header_and_upper_ell() -> ConfigTree {
        ConfigTree::parse(
            r#"<module name="Checker">
                <module name="Header">
                    <property name="header" value="// H"/>
                </module>
                <module name="TreeWalker">
                    <module name="UpperEll"/>
                </module>
            </module>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_builds_one_fix_per_matched_group() {
        let config = config_with_header_and_upper_ell();
        let violations = vec![
            violation("com.puppycrawl.tools.checkstyle.checks.UpperEllCheck", "A.java"),
            violation("com.puppycrawl.tools.checkstyle.checks.UpperEllCheck", "B.java"),
            violation("header", "C.java"),
        ];
        let fixes = FixRegistry::resolve(&violations, &config).unwrap();

        let names: HashSet<_> = fixes.iter().map(|f| f.name()).collect();
        assert_eq!(names, HashSet::from(["upper_ell", "header"]));

        let upper_ell = fixes.iter().find(|f| f.name() == "upper_ell").unwrap();
        assert_eq!(upper_ell.violations().total(), 2);
    }

    #[test]
    fn test_container_nested_module_found() {
        let config = config_with_header_and_upper_ell();
        let violations = vec![violation("UpperEll", "A.java")];
        let fixes = FixRegistry::resolve(&violations, &config).unwrap();
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].name(), "upper_ell");
    }

    #[test]
    fn test_unknown_check_dropped_silently() {
        let config = config_with_header_and_upper_ell();
        let violations = vec![violation("com.pkg.SomeOtherCheck", "A.java")];
        let fixes = FixRegistry::resolve(&violations, &config).unwrap();
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_unconfigured_optional_check_dropped_silently() {
        let config = ConfigTree::parse(r#"<module name="Checker"/>"#).unwrap();
        let violations = vec![violation("UpperEll", "A.java")];
        let fixes = FixRegistry::resolve(&violations, &config).unwrap();
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_unconfigured_mandatory_check_errors() {
        let config = ConfigTree::parse(r#"<module name="Checker"/>"#).unwrap();
        let violations = vec![violation("header", "A.java")];
        assert!(matches!(
            FixRegistry::resolve(&violations, &config),
            Err(ConfigError::CheckNotConfigured(name)) if name == "Header"
        ));
    }

    #[test]
    fn test_hash_identity_exact_match() {
        let config = ConfigTree::parse(
            r#"<module name="Checker">
                <module name="Header">
                    <property name="id" value="other"/>
                    <property name="header" value="// wrong"/>
                </module>
                <module name="Header">
                    <property name="id" value="licenseBlock"/>
                    <property name="header" value="// right"/>
                </module>
            </module>"#,
        )
        .unwrap();
        let candidates = collect_candidates(&config);
        let matched = find_matching("Header#licenseBlock", &candidates).unwrap();
        assert_eq!(matched.id.as_deref(), Some("licenseBlock"));
    }

    #[test]
    fn test_hash_identity_loose_fallback_on_raw_id() {
        let config = ConfigTree::parse(
            r#"<module name="Checker">
                <module name="UpperEll">
                    <property name="id" value="Header#licenseBlock"/>
                </module>
            </module>"#,
        )
        .unwrap();
        let candidates = collect_candidates(&config);
        let matched = find_matching("Header#licenseBlock", &candidates).unwrap();
        assert_eq!(matched.kind, CheckKind::UpperEll);
    }

    #[test]
    fn test_candidate_order_prefers_root_children() {
        let config = config_with_header_and_upper_ell();
        let candidates = collect_candidates(&config);
        assert_eq!(candidates[0].kind, CheckKind::Header);
        assert_eq!(candidates[1].kind, CheckKind::UpperEll);
    }
}
