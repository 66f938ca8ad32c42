//! Core data models for marginalia
//!
//! This module contains the fundamental data structures used throughout the
//! reader: annotations and the declarations they are attached to.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// A structured, typed piece of metadata attached to a source declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation type name (e.g. "Route", "Inject")
    pub name: String,
    /// Key/value arguments parsed out of the annotation body
    #[serde(default)]
    pub arguments: HashMap<String, String>,
}

impl Annotation {
    /// Create a new annotation with no arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: HashMap::new(),
        }
    }

    /// Add an argument (builder style)
    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Look up an argument by key
    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).map(|v| v.as_str())
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Kind of source declaration an annotation can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationKind {
    Class,
    Method,
    Property,
}

impl DeclarationKind {
    /// Stable lowercase label, used in cache keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Method => "method",
            Self::Property => "property",
        }
    }
}

/// A class, method, or property definition that may carry annotations
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Fully qualified identifier (e.g. "app::users::UserService::find")
    pub identifier: String,
    /// What kind of declaration this is
    pub kind: DeclarationKind,
    /// The raw doc block attached to the declaration
    pub doc: String,
    /// Source modification time (seconds since epoch), metadata only
    pub mtime: u64,
}

impl Declaration {
    /// Create a new declaration
    pub fn new(
        identifier: impl Into<String>,
        kind: DeclarationKind,
        doc: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            doc: doc.into(),
            mtime: 0,
        }
    }

    /// Set the source modification time (builder style)
    pub fn with_mtime(mut self, mtime: u64) -> Self {
        self.mtime = mtime;
        self
    }

    /// Cache identity for this declaration
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.kind.as_str(), self.identifier)
    }

    /// Content fingerprint of the doc block, used for staleness detection
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.doc.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
