//! End-to-end pipeline: report -> configuration -> registry -> fixes.

use std::fs;

use stylefix_core::SourceTree;
use stylefix_fixes::{apply_fixes, FixRegistry};
use stylefix_parser::{parse_report, ConfigTree};

const MAIN_SOURCE: &str = "package p;\n\nclass Main {\n    long total = 99l;\n}\n";
const UTILS_SOURCE: &str = "// old notice\nclass Utils {}\n";

const CONFIG: &str = r#"<?xml version="1.0"?>
<module name="Checker">
    <module name="Header">
        <property name="header" value="// Copyright&#10;// All rights reserved"/>
    </module>
    <module name="TreeWalker">
        <module name="UpperEll"/>
    </module>
</module>
"#;

const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<checkstyle version="10.0">
    <file name="Main.java">
        <error line="4" column="18" severity="error"
               message="Should use uppercase 'L'."
               source="com.puppycrawl.tools.checkstyle.checks.UpperEllCheck"/>
    </file>
    <file name="Utils.java">
        <error line="1" severity="error"
               message="Missing a header - not enough lines in file."
               source="header"/>
    </file>
</checkstyle>
"#;

#[test]
fn report_and_config_drive_fixes_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("stylefix.log");
    stylefix_fixes::logging::init_logger(Some(&log_path)).unwrap();
    let report_path = dir.path().join("report.xml");
    fs::write(&report_path, REPORT).unwrap();

    let violations = parse_report(&report_path).unwrap();
    assert_eq!(violations.len(), 2);

    let config = ConfigTree::parse(CONFIG).unwrap();
    let mut fixes = FixRegistry::resolve(&violations, &config).unwrap();
    assert_eq!(fixes.len(), 2);

    let trees = vec![
        SourceTree::parse("Main.java", MAIN_SOURCE).unwrap(),
        SourceTree::parse("Utils.java", UTILS_SOURCE).unwrap(),
    ];
    let (fixed, summary) = apply_fixes(&mut fixes, trees);

    assert_eq!(
        fixed[0].print(),
        "package p;\n\nclass Main {\n    long total = 99L;\n}\n"
    );
    assert_eq!(
        fixed[1].print(),
        "// Copyright\n// All rights reserved\nclass Utils {}\n"
    );
    assert_eq!(summary.unmatched_count(), 0);

    let log = fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("registry: built `header`"));
}

#[test]
fn unmatched_violations_surface_in_summary() {
    let config = ConfigTree::parse(CONFIG).unwrap();
    let violations = stylefix_parser::parse_report_text(REPORT).unwrap();
    let mut fixes = FixRegistry::resolve(&violations, &config).unwrap();

    // Only Utils.java is processed; the UpperEll violation for
    // Main.java matches no node and must come back unclaimed.
    let trees = vec![SourceTree::parse("Utils.java", UTILS_SOURCE).unwrap()];
    let (fixed, summary) = apply_fixes(&mut fixes, trees);

    assert_eq!(
        fixed[0].print(),
        "// Copyright\n// All rights reserved\nclass Utils {}\n"
    );
    assert_eq!(summary.unmatched_count(), 1);
    assert_eq!(
        summary.unmatched[0].check_id,
        "com.puppycrawl.tools.checkstyle.checks.UpperEllCheck"
    );
}
