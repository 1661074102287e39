//! stylefix-parser: violation report and configuration parsing
//!
//! This crate provides the two independent leaves of the pipeline:
//! - `parse_report()`: the report ingestor producing `Violation` records
//! - `ConfigTree`: the configuration model with parent-chain lookup
//!
//! Both inputs share the streaming `xml` scanner.

pub mod config;
pub mod report;
pub mod violation;
pub mod xml;

pub use config::{ConfigError, ConfigId, ConfigTree};
pub use report::{parse_report, parse_report_text, ParseError};
pub use violation::{Severity, Violation};
