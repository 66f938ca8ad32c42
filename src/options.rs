//! Options resolver for the reader factory
//!
//! The factory accepts a configuration bag with three recognized keys:
//! - `cache`: a cache-backend handle (default: fresh `MemoryCache`)
//! - `debug`: staleness detection on cached entries (default: true)
//! - `indexed`: name-keyed result shape (default: false)
//!
//! Unrecognized keys and values of the wrong shape are configuration bugs
//! and fail the `create` call immediately.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::core::cache::{verify_capability, Cache, MemoryCache};
use crate::core::error::{ReaderError, Result};

/// Recognized configuration keys
const RECOGNIZED_KEYS: [&str; 3] = ["cache", "debug", "indexed"];

/// A value in the raw configuration bag
#[derive(Clone)]
pub enum OptionValue {
    /// Boolean flag (`debug`, `indexed`)
    Bool(bool),
    /// Cache backend handle (`cache`)
    Cache(Arc<dyn Cache>),
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "Bool({value})"),
            Self::Cache(_) => write!(f, "Cache(..)"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Arc<dyn Cache>> for OptionValue {
    fn from(cache: Arc<dyn Cache>) -> Self {
        Self::Cache(cache)
    }
}

/// Raw configuration bag supplied by the caller
pub type RawOptions = HashMap<String, OptionValue>;

/// Validated, defaulted configuration for one factory call
#[derive(Clone)]
pub struct ResolvedOptions {
    /// Cache backend the assembled reader writes through
    pub cache: Arc<dyn Cache>,
    /// Staleness detection on cached entries
    pub debug: bool,
    /// Name-keyed result shape
    pub indexed: bool,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            cache: Arc::new(MemoryCache::new()),
            debug: true,
            indexed: false,
        }
    }
}

impl fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("cache", &"..")
            .field("debug", &self.debug)
            .field("indexed", &self.indexed)
            .finish()
    }
}

/// Validates and defaults raw configuration bags
///
/// Holds no mutable state beyond the recognized-key table fixed at
/// construction; one resolver is safely reusable across many calls.
#[derive(Debug, Default)]
pub struct OptionsResolver;

impl OptionsResolver {
    /// Create a resolver
    pub fn new() -> Self {
        Self
    }

    /// Validate a raw bag and fill in defaults
    pub fn resolve(&self, raw: &RawOptions) -> Result<ResolvedOptions> {
        for key in raw.keys() {
            if !RECOGNIZED_KEYS.contains(&key.as_str()) {
                return Err(ReaderError::unknown_option(key.as_str()));
            }
        }

        let mut options = ResolvedOptions::default();

        match raw.get("cache") {
            Some(OptionValue::Cache(cache)) => {
                if !verify_capability(cache.as_ref()) {
                    return Err(ReaderError::invalid_config(
                        "cache backend failed the capability probe",
                    ));
                }
                options.cache = cache.clone();
            }
            Some(_) => {
                return Err(ReaderError::invalid_config(
                    "`cache` must be a cache backend handle",
                ))
            }
            None => {}
        }

        match raw.get("debug") {
            Some(OptionValue::Bool(debug)) => options.debug = *debug,
            Some(_) => return Err(ReaderError::invalid_config("`debug` must be a boolean")),
            None => {}
        }

        match raw.get("indexed") {
            Some(OptionValue::Bool(indexed)) => options.indexed = *indexed,
            Some(_) => return Err(ReaderError::invalid_config("`indexed` must be a boolean")),
            None => {}
        }

        Ok(options)
    }
}
