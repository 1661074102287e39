//! Configuration model
//!
//! An immutable tree of named modules with string properties. Nodes live
//! in an arena; the parent link is an arena index set once during
//! construction, never reassigned. Property lookup climbs the parent
//! chain, so nested modules inherit values declared on their ancestors.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::xml::{XmlError, XmlEvent, XmlScanner};

const MODULE_TAG: &str = "module";
const PROPERTY_TAG: &str = "property";
const NAME_ATTR: &str = "name";
const VALUE_ATTR: &str = "value";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error("malformed configuration: {0}")]
    Malformed(String),
    #[error("missing required property `{0}`")]
    MissingProperty(String),
    #[error("property `{property}` has an invalid integer value: {token}")]
    InvalidIntElement { property: String, token: String },
    #[error("unsupported charset `{0}`")]
    UnsupportedCharset(String),
    #[error("`{0}` configuration not found")]
    CheckNotConfigured(String),
}

/// Index of a module in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigId(usize);

#[derive(Debug)]
struct ModuleData {
    name: String,
    properties: HashMap<String, String>,
    children: Vec<ConfigId>,
    parent: Option<ConfigId>,
}

/// Immutable configuration tree. Index 0 is the root.
#[derive(Debug)]
pub struct ConfigTree {
    arena: Vec<ModuleData>,
}

impl ConfigTree {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut scanner = XmlScanner::new(text);
        let mut arena: Vec<ModuleData> = Vec::new();
        let mut stack: Vec<ConfigId> = Vec::new();
        let mut root_seen = false;

        while let Some(event) = scanner.next_event()? {
            match &event {
                XmlEvent::Start { name, self_closing, .. } if name == MODULE_TAG => {
                    let module_name = event
                        .attribute(NAME_ATTR)
                        .ok_or_else(|| {
                            ConfigError::Malformed("module element without a name".to_string())
                        })?
                        .to_string();
                    let parent = stack.last().copied();
                    if parent.is_none() {
                        if root_seen {
                            return Err(ConfigError::Malformed(
                                "multiple root modules".to_string(),
                            ));
                        }
                        root_seen = true;
                    }
                    let id = ConfigId(arena.len());
                    arena.push(ModuleData {
                        name: module_name,
                        properties: HashMap::new(),
                        children: Vec::new(),
                        parent,
                    });
                    if let Some(parent) = parent {
                        arena[parent.0].children.push(id);
                    }
                    if !*self_closing {
                        stack.push(id);
                    }
                }
                XmlEvent::Start { name, .. } if name == PROPERTY_TAG => {
                    let owner = stack.last().copied().ok_or_else(|| {
                        ConfigError::Malformed("property element outside a module".to_string())
                    })?;
                    let key = event.attribute(NAME_ATTR).ok_or_else(|| {
                        ConfigError::Malformed("property element without a name".to_string())
                    })?;
                    let value = event.attribute(VALUE_ATTR).ok_or_else(|| {
                        ConfigError::Malformed(format!("property `{key}` without a value"))
                    })?;
                    arena[owner.0]
                        .properties
                        .insert(key.to_string(), value.to_string());
                }
                XmlEvent::End { name } if name == MODULE_TAG => {
                    if stack.pop().is_none() {
                        return Err(ConfigError::Malformed(
                            "unmatched module end tag".to_string(),
                        ));
                    }
                }
                // Metadata and message elements are not part of the model.
                _ => {}
            }
        }

        if arena.is_empty() {
            return Err(ConfigError::Malformed("no root module".to_string()));
        }
        Ok(ConfigTree { arena })
    }

    pub fn root(&self) -> ConfigId {
        ConfigId(0)
    }

    pub fn name(&self, id: ConfigId) -> &str {
        &self.arena[id.0].name
    }

    pub fn children(&self, id: ConfigId) -> impl Iterator<Item = ConfigId> + '_ {
        self.arena[id.0].children.iter().copied()
    }

    /// First direct child with the given name. No recursion; callers
    /// needing nested lookup walk explicitly.
    pub fn child(&self, id: ConfigId, name: &str) -> Option<ConfigId> {
        self.children(id).find(|&c| self.arena[c.0].name == name)
    }

    /// Innermost-defined value for `key`, climbing the parent chain.
    pub fn get_property(&self, id: ConfigId, key: &str) -> Option<&str> {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(value) = self.arena[node.0].properties.get(key) {
                return Some(value);
            }
            current = self.arena[node.0].parent;
        }
        None
    }

    pub fn get_property_or<'s>(&'s self, id: ConfigId, key: &str, default: &'s str) -> &'s str {
        self.get_property(id, key).unwrap_or(default)
    }

    /// Value defined on this module itself, with no parent-chain climb.
    pub fn local_property(&self, id: ConfigId, key: &str) -> Option<&str> {
        self.arena[id.0].properties.get(key).map(String::as_str)
    }

    pub fn has_property(&self, id: ConfigId, key: &str) -> bool {
        self.get_property(id, key).is_some()
    }

    /// Parses a comma-separated local property into integers. Every
    /// element must parse; the error names the property and the token.
    pub fn get_int_array(&self, id: ConfigId, key: &str) -> Result<Vec<i64>, ConfigError> {
        let value = self.arena[id.0]
            .properties
            .get(key)
            .ok_or_else(|| ConfigError::MissingProperty(key.to_string()))?;
        value
            .split(',')
            .map(|part| {
                let token = part.trim();
                token
                    .parse::<i64>()
                    .map_err(|_| ConfigError::InvalidIntElement {
                        property: key.to_string(),
                        token: token.to_string(),
                    })
            })
            .collect()
    }
}
