//! Check identity
//!
//! A check is named either by a bare (possibly dotted) name where only
//! the final segment counts, or by `<check>#<id>` where the id picks one
//! of several instances of the same check type.

use stylefix_parser::{ConfigId, ConfigTree};

/// Closed set of check kinds with a registered fix strategy. Adding a
/// kind is one variant plus one arm in the registry's factory table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    Header,
    UpperEll,
    HexLiteralCase,
    RedundantImport,
}

impl CheckKind {
    pub const ALL: [CheckKind; 4] = [
        CheckKind::Header,
        CheckKind::UpperEll,
        CheckKind::HexLiteralCase,
        CheckKind::RedundantImport,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CheckKind::Header => "Header",
            CheckKind::UpperEll => "UpperEll",
            CheckKind::HexLiteralCase => "HexLiteralCase",
            CheckKind::RedundantImport => "RedundantImport",
        }
    }

    /// Resolves a check name: keep the final dotted segment, drop a
    /// conventional `Check` suffix, compare case-insensitively.
    pub fn from_source(source: &str) -> Option<Self> {
        let simple = source.rsplit('.').next().unwrap_or(source);
        let len = simple.len();
        let stripped = if len > 5
            && simple.is_char_boundary(len - 5)
            && simple[len - 5..].eq_ignore_ascii_case("Check")
        {
            &simple[..len - 5]
        } else {
            simple
        };
        CheckKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(stripped))
    }

    /// Whether resolution must fail loudly when no configuration module
    /// matches a violation group of this kind.
    pub fn mandatory_configured(self) -> bool {
        matches!(self, CheckKind::Header)
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One candidate configuration module: a check kind, its optional
/// declared instance id, and the module node it came from.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub kind: CheckKind,
    pub id: Option<String>,
    pub module: ConfigId,
}

impl ConfigModule {
    pub fn from_node(tree: &ConfigTree, module: ConfigId) -> Option<Self> {
        let kind = CheckKind::from_source(tree.name(module))?;
        let id = tree.local_property(module, "id").map(str::to_string);
        Some(ConfigModule { kind, id, module })
    }

    pub fn matches_id(&self, input: &str) -> bool {
        self.id.as_deref() == Some(input)
    }

    pub fn matches_check(&self, input: &str) -> bool {
        CheckKind::from_source(input) == Some(self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_source_strips_package_and_suffix() {
        assert_eq!(
            CheckKind::from_source("com.pkg.checks.UpperEllCheck"),
            Some(CheckKind::UpperEll)
        );
        assert_eq!(CheckKind::from_source("UpperEll"), Some(CheckKind::UpperEll));
        assert_eq!(CheckKind::from_source("upperell"), Some(CheckKind::UpperEll));
        assert_eq!(CheckKind::from_source("header"), Some(CheckKind::Header));
        assert_eq!(CheckKind::from_source("HeaderCheck"), Some(CheckKind::Header));
        assert_eq!(CheckKind::from_source("com.pkg.Unknown"), None);
    }

    #[test]
    fn test_bare_check_word_matches_nothing() {
        assert_eq!(CheckKind::from_source("Check"), None);
    }

    #[test]
    fn test_module_matching() {
        let config = r#"<module name="Checker">
            <module name="Header">
                <property name="id" value="licenseBlock"/>
            </module>
        </module>"#;
        let tree = ConfigTree::parse(config).unwrap();
        let header = tree.child(tree.root(), "Header").unwrap();
        let module = ConfigModule::from_node(&tree, header).unwrap();

        assert_eq!(module.kind, CheckKind::Header);
        assert!(module.matches_id("licenseBlock"));
        assert!(!module.matches_id("other"));
        assert!(module.matches_check("com.pkg.HeaderCheck"));
        assert!(!module.matches_check("UpperEll"));
    }
}
