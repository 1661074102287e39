//! Violation report ingestor
//!
//! Reads the linter's report stream: `file` elements carry a `name`
//! attribute, nested `error` elements carry the diagnostic attributes.
//! The output preserves report order; each violation remembers its
//! enclosing file.

use std::fs;
use std::path::Path;

use crate::violation::{Severity, Violation};
use crate::xml::{XmlError, XmlEvent, XmlScanner};

const FILE_TAG: &str = "file";
const ERROR_TAG: &str = "error";
const FILENAME_ATTR: &str = "name";
const LINE_ATTR: &str = "line";
const COLUMN_ATTR: &str = "column";
const SEVERITY_ATTR: &str = "severity";
const MESSAGE_ATTR: &str = "message";
const SOURCE_ATTR: &str = "source";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("cannot read report: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error("`{element}` element is missing the `{attribute}` attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("attribute `{attribute}` has non-numeric value `{value}`")]
    InvalidNumber {
        attribute: &'static str,
        value: String,
    },
    #[error("unknown severity `{0}`")]
    InvalidSeverity(String),
    #[error("`error` element outside of a `file` element")]
    ViolationOutsideFile,
}

/// Parses a report file into an ordered violation sequence. Any failure
/// is fatal for the whole report; no partial results are returned.
pub fn parse_report(path: impl AsRef<Path>) -> Result<Vec<Violation>, ParseError> {
    let text = fs::read_to_string(path)?;
    parse_report_text(&text)
}

pub fn parse_report_text(text: &str) -> Result<Vec<Violation>, ParseError> {
    let mut scanner = XmlScanner::new(text);
    let mut violations = Vec::new();
    let mut current_file: Option<String> = None;

    while let Some(event) = scanner.next_event()? {
        match &event {
            XmlEvent::Start { name, .. } if name == FILE_TAG => {
                let file = required(&event, FILE_TAG, FILENAME_ATTR)?;
                current_file = Some(file.to_string());
            }
            XmlEvent::Start { name, .. } if name == ERROR_TAG => {
                let file = current_file
                    .as_deref()
                    .ok_or(ParseError::ViolationOutsideFile)?;
                violations.push(parse_error_element(&event, file)?);
            }
            XmlEvent::End { name } if name == FILE_TAG => {
                current_file = None;
            }
            _ => {}
        }
    }

    Ok(violations)
}

fn parse_error_element(event: &XmlEvent, file: &str) -> Result<Violation, ParseError> {
    let line = parse_number(LINE_ATTR, required(event, ERROR_TAG, LINE_ATTR)?)?;
    let column = match event.attribute(COLUMN_ATTR) {
        Some(value) => Some(parse_number(COLUMN_ATTR, value)?),
        None => None,
    };
    let severity_text = required(event, ERROR_TAG, SEVERITY_ATTR)?;
    let severity = Severity::parse(severity_text)
        .ok_or_else(|| ParseError::InvalidSeverity(severity_text.to_string()))?;
    let message = required(event, ERROR_TAG, MESSAGE_ATTR)?;
    let source = required(event, ERROR_TAG, SOURCE_ATTR)?;

    Ok(Violation::new(line, column, severity, source, message, file))
}

fn required<'e>(
    event: &'e XmlEvent,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'e str, ParseError> {
    event
        .attribute(attribute)
        .ok_or(ParseError::MissingAttribute { element, attribute })
}

fn parse_number(attribute: &'static str, value: &str) -> Result<usize, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        attribute,
        value: value.to_string(),
    })
}
