//! Header fix: align a file's leading comment block with the expected
//! license header, line by line.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use stylefix_core::SourceTree;
use stylefix_parser::{ConfigError, ConfigId, ConfigTree, Violation};

use super::{Fix, ViolationSet};

const HEADER_PROPERTY: &str = "header";
const HEADER_FILE_PROPERTY: &str = "headerFile";
const IGNORE_LINES_PROPERTY: &str = "ignoreLines";
const CHARSET_PROPERTY: &str = "charset";
const DEFAULT_CHARSET: &str = "UTF-8";
const LINE_SEPARATOR: &str = "\n";

pub struct HeaderFix {
    violations: ViolationSet,
    expected_lines: Vec<String>,
    ignore_lines: HashSet<i64>,
}

impl HeaderFix {
    /// Builds the strategy from its configuration module. The expected
    /// header comes from the `header` property, or from `headerFile`
    /// read under the configured `charset`.
    pub fn from_config(
        violations: Vec<Violation>,
        config: &ConfigTree,
        module: ConfigId,
    ) -> Result<Self, ConfigError> {
        let header_text = extract_header(config, module)?;
        let ignore_lines = extract_ignore_lines(config, module)?;
        Ok(Self {
            violations: ViolationSet::new(violations),
            expected_lines: header_text
                .split(LINE_SEPARATOR)
                .map(str::to_string)
                .collect(),
            ignore_lines,
        })
    }

    /// Merge of the current leading comment lines with the expected
    /// lines: a non-ignored mismatch is replaced, missing tail lines
    /// are appended, extra current lines are kept.
    fn merge_lines(&self, current: &[String]) -> Vec<String> {
        let mut merged: Vec<String> = current.to_vec();
        for (index, expected) in self.expected_lines.iter().enumerate() {
            let line_number = (index + 1) as i64;
            if index < merged.len() {
                if !self.ignore_lines.contains(&line_number) && &merged[index] != expected {
                    merged[index] = expected.clone();
                }
            } else {
                merged.push(expected.clone());
            }
        }
        merged
    }
}

impl Fix for HeaderFix {
    fn name(&self) -> &'static str {
        "header"
    }

    fn description(&self) -> &'static str {
        "Rewrites the leading comment block to match the expected header"
    }

    fn apply(&mut self, mut tree: SourceTree) -> SourceTree {
        let path = tree.path().to_path_buf();
        if !self.violations.claim_file(&path) {
            return tree;
        }

        let current: Vec<String> = tree
            .leading_comments()
            .filter_map(|node| node.text())
            .collect::<Vec<_>>()
            .join(LINE_SEPARATOR)
            .split(LINE_SEPARATOR)
            .map(str::to_string)
            .collect();

        let merged = self.merge_lines(&current);
        tree.replace_leading(&format!("{}{}", merged.join(LINE_SEPARATOR), LINE_SEPARATOR));
        tree
    }

    fn violations(&self) -> &ViolationSet {
        &self.violations
    }
}

fn extract_header(config: &ConfigTree, module: ConfigId) -> Result<String, ConfigError> {
    if let Some(header) = config.get_property(module, HEADER_PROPERTY) {
        return Ok(header.to_string());
    }
    let file = config
        .get_property(module, HEADER_FILE_PROPERTY)
        .ok_or_else(|| ConfigError::MissingProperty(HEADER_FILE_PROPERTY.to_string()))?;
    let charset = config.get_property_or(module, CHARSET_PROPERTY, DEFAULT_CHARSET);
    let bytes = fs::read(Path::new(file)).map_err(|source| ConfigError::Read {
        path: file.into(),
        source,
    })?;
    decode(bytes, charset)
}

fn extract_ignore_lines(
    config: &ConfigTree,
    module: ConfigId,
) -> Result<HashSet<i64>, ConfigError> {
    if config.local_property(module, IGNORE_LINES_PROPERTY).is_some() {
        Ok(config
            .get_int_array(module, IGNORE_LINES_PROPERTY)?
            .into_iter()
            .collect())
    } else {
        Ok(HashSet::new())
    }
}

/// Decodes header-file bytes under a named charset.
fn decode(bytes: Vec<u8>, charset: &str) -> Result<String, ConfigError> {
    match charset.to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => String::from_utf8(bytes)
            .map_err(|_| ConfigError::Malformed("header file is not valid UTF-8".to_string())),
        "us-ascii" | "ascii" => {
            if bytes.iter().all(u8::is_ascii) {
                Ok(bytes.into_iter().map(char::from).collect())
            } else {
                Err(ConfigError::Malformed(
                    "header file is not valid US-ASCII".to_string(),
                ))
            }
        }
        "iso-8859-1" | "latin-1" | "latin1" => Ok(bytes.into_iter().map(char::from).collect()),
        _ => Err(ConfigError::UnsupportedCharset(charset.to_string())),
    }
}
