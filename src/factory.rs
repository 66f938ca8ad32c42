//! Reader assembly
//!
//! `ReaderFactory::create` wires the collaborators into the final reader:
//! resolve the options bag, install the built-in ignored names, bind a
//! `RawReader` to the parser collaborator, wrap it in a `CachedReader`, and
//! optionally wrap that in an `IndexedReader`. Construction never touches
//! the underlying declarations; parsing is deferred to the first `parse`.

use std::sync::Arc;

use crate::core::cache::verify_capability;
use crate::core::error::{ReaderError, Result};
use crate::core::reader::{AssembledReader, CachedReader, IndexedReader, RawReader};
use crate::core::registry::IgnoredNames;
use crate::options::{OptionsResolver, RawOptions, ResolvedOptions};
use crate::parsers::{AnnotationParser, DocCommentParser};

/// Builds composed annotation readers
pub struct ReaderFactory {
    resolver: OptionsResolver,
    registry: Arc<IgnoredNames>,
    parser: Option<Arc<dyn AnnotationParser>>,
}

impl ReaderFactory {
    /// Create a factory backed by the process-wide registry
    pub fn new() -> Self {
        Self::with_registry(IgnoredNames::global())
    }

    /// Create a factory backed by a caller-owned registry
    pub fn with_registry(registry: Arc<IgnoredNames>) -> Self {
        Self {
            resolver: OptionsResolver::new(),
            registry,
            parser: None,
        }
    }

    /// Substitute the parser collaborator (default: `DocCommentParser`)
    pub fn with_parser(mut self, parser: Arc<dyn AnnotationParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// The registry this factory installs names into
    pub fn registry(&self) -> Arc<IgnoredNames> {
        self.registry.clone()
    }

    /// Assemble a reader from a raw configuration bag
    pub fn create(&self, raw: &RawOptions) -> Result<AssembledReader> {
        let options = self.resolver.resolve(raw)?;
        self.create_resolved(options)
    }

    /// Assemble a reader from pre-resolved options
    ///
    /// Callers may hand-build `ResolvedOptions` and bypass the resolver, so
    /// the cache capability check runs again here.
    pub fn create_resolved(&self, options: ResolvedOptions) -> Result<AssembledReader> {
        if !verify_capability(options.cache.as_ref()) {
            return Err(ReaderError::invalid_config(
                "cache backend failed the capability probe",
            ));
        }

        self.registry.install_builtin();

        let parser = match &self.parser {
            Some(parser) => parser.clone(),
            None => Arc::new(DocCommentParser::new(self.registry.clone())) as Arc<dyn AnnotationParser>,
        };

        let raw = RawReader::new(parser);
        let cached = CachedReader::new(Box::new(raw), options.cache, options.debug);

        if options.indexed {
            Ok(AssembledReader::Indexed(IndexedReader::new(Box::new(cached))))
        } else {
            Ok(AssembledReader::Sequential(cached))
        }
    }
}

impl Default for ReaderFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::{Cache, CacheEntry, MemoryCache};
    use crate::core::registry::BUILTIN_IGNORED_NAMES;
    use crate::options::OptionValue;

    fn isolated_factory() -> ReaderFactory {
        ReaderFactory::with_registry(Arc::new(IgnoredNames::new()))
    }

    #[test]
    fn test_create_with_empty_bag() {
        let factory = isolated_factory();
        let reader = factory.create(&RawOptions::new()).unwrap();
        assert!(!reader.is_indexed());
    }

    #[test]
    fn test_create_installs_builtin_ignored_names() {
        let factory = isolated_factory();
        factory.create(&RawOptions::new()).unwrap();

        let registry = factory.registry();
        assert_eq!(registry.ignored_count(), BUILTIN_IGNORED_NAMES.len());
        assert!(registry.is_ignored("deprecated"));
    }

    #[test]
    fn test_create_twice_installs_once() {
        let factory = isolated_factory();
        factory.create(&RawOptions::new()).unwrap();
        factory.create(&RawOptions::new()).unwrap();

        assert_eq!(
            factory.registry().ignored_count(),
            BUILTIN_IGNORED_NAMES.len()
        );
    }

    #[test]
    fn test_indexed_option_changes_shape() {
        let factory = isolated_factory();

        let mut raw = RawOptions::new();
        raw.insert("indexed".to_string(), OptionValue::Bool(true));
        assert!(factory.create(&raw).unwrap().is_indexed());

        raw.insert("indexed".to_string(), OptionValue::Bool(false));
        assert!(!factory.create(&raw).unwrap().is_indexed());
    }

    #[test]
    fn test_unknown_option_propagates() {
        let factory = isolated_factory();
        let mut raw = RawOptions::new();
        raw.insert("cahce".to_string(), OptionValue::Bool(true));

        let err = factory.create(&raw).unwrap_err();
        assert!(matches!(err, ReaderError::UnknownOption { .. }));
    }

    #[test]
    fn test_create_resolved_reprobes_cache() {
        struct DropsWrites;
        impl Cache for DropsWrites {
            fn get(&self, _key: &str) -> Option<CacheEntry> {
                None
            }
            fn set(&self, _key: &str, _entry: CacheEntry) {}
            fn contains(&self, _key: &str) -> bool {
                false
            }
        }

        let factory = isolated_factory();
        let options = ResolvedOptions {
            cache: Arc::new(DropsWrites),
            debug: true,
            indexed: false,
        };

        let err = factory.create_resolved(options).unwrap_err();
        assert!(matches!(err, ReaderError::InvalidConfig { .. }));
    }

    #[test]
    fn test_create_resolved_accepts_hand_built_options() {
        let factory = isolated_factory();
        let options = ResolvedOptions {
            cache: Arc::new(MemoryCache::new()),
            debug: false,
            indexed: true,
        };

        let reader = factory.create_resolved(options).unwrap();
        assert!(reader.is_indexed());
    }

    #[test]
    fn test_default_factory_uses_global_registry() {
        let factory = ReaderFactory::default();
        assert!(Arc::ptr_eq(&factory.registry(), &IgnoredNames::global()));
    }
}
