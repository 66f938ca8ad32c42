//! Ignored-name registry and loadable-type predicate
//!
//! Annotation parsers consult this registry lazily, at arbitrary points
//! after assembly, so both sets are append-only for the life of the process:
//! installing a name is idempotent and there is no uninstall.
//!
//! The registry is an ordinary owned type shared via `Arc` so callers
//! control its lifetime; `IgnoredNames::global()` provides the process-wide
//! instance most assemblies share.

use lazy_static::lazy_static;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// Annotation names skipped by every assembled reader
///
/// These are conventional documentation tags, not typed annotations.
pub const BUILTIN_IGNORED_NAMES: [&str; 8] = [
    "author",
    "api",
    "copyright",
    "date",
    "version",
    "package",
    "method",
    "deprecated",
];

lazy_static! {
    static ref GLOBAL_REGISTRY: Arc<IgnoredNames> = Arc::new(IgnoredNames::new());
}

/// Process-wide, append-only annotation name policy
#[derive(Debug, Default)]
pub struct IgnoredNames {
    ignored: RwLock<HashSet<String>>,
    loadable: RwLock<HashSet<String>>,
}

impl IgnoredNames {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide shared registry
    pub fn global() -> Arc<IgnoredNames> {
        GLOBAL_REGISTRY.clone()
    }

    /// Install annotation names to ignore
    ///
    /// Idempotent: installing the same set repeatedly is a no-op after the
    /// first call. Names are never removed within a process lifetime.
    pub fn install<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut ignored) = self.ignored.write() {
            ignored.extend(names.into_iter().map(Into::into));
        }
    }

    /// Install the built-in ignored name set
    pub fn install_builtin(&self) {
        self.install(BUILTIN_IGNORED_NAMES);
    }

    /// Whether a name is ignored (queried by parser collaborators)
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored
            .read()
            .map(|ignored| ignored.contains(name))
            .unwrap_or(false)
    }

    /// Number of installed ignored names
    pub fn ignored_count(&self) -> usize {
        self.ignored.read().map(|ignored| ignored.len()).unwrap_or(0)
    }

    /// Register an identifier as a concretely defined annotation type
    pub fn register_type(&self, identifier: impl Into<String>) {
        if let Ok(mut loadable) = self.loadable.write() {
            loadable.insert(identifier.into());
        }
    }

    /// Whether an identifier resolves to a registered annotation type
    ///
    /// Used by autoload collaborators (and the default parser) to avoid
    /// attempting to parse annotations referencing types that are not
    /// present.
    pub fn is_loadable(&self, identifier: &str) -> bool {
        self.loadable
            .read()
            .map(|loadable| loadable.contains(identifier))
            .unwrap_or(false)
    }
}
