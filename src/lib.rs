//! marginalia - annotation reader assembly
//!
//! This library builds a single collaborator object, a metadata reader,
//! that extracts structured annotations (author, version, custom markers)
//! attached to source-level declarations, filters out a configurable set of
//! noise-annotations, and caches parsed results.
//!
//! # Architecture
//!
//! - **core**: data model, errors, cache backends, registry, reader variants
//! - **parsers**: the `AnnotationParser` collaborator seam and the default
//!   regex-based `DocCommentParser`
//! - **options**: validation and defaulting of the factory configuration bag
//! - **factory**: wires parser, cache decorator and optional indexing
//!   decorator into the final reader
//!
//! # Example
//!
//! ```
//! use marginalia::{Declaration, DeclarationKind, OptionValue, RawOptions, ReaderFactory};
//!
//! let factory = ReaderFactory::new();
//! factory.registry().register_type("Route");
//!
//! let mut options = RawOptions::new();
//! options.insert("indexed".to_string(), OptionValue::Bool(true));
//! let reader = factory.create(&options).unwrap();
//!
//! let declaration = Declaration::new(
//!     "app::UserService::find",
//!     DeclarationKind::Method,
//!     "/// @Route(path=/users)\n/// @deprecated",
//! );
//! let annotations = reader.parse(&declaration).unwrap();
//! assert_eq!(annotations.len(), 1);
//! assert_eq!(annotations.get("Route").unwrap().argument("path"), Some("/users"));
//! ```

pub mod core;
pub mod factory;
pub mod options;
pub mod parsers;

pub use crate::core::{
    Annotation, Annotations, AssembledReader, Cache, CacheEntry, CachedReader, Declaration,
    DeclarationKind, FileCache, IgnoredNames, IndexedReader, MemoryCache, RawReader, Reader,
    ReaderError, Result, BUILTIN_IGNORED_NAMES,
};
pub use crate::factory::ReaderFactory;
pub use crate::options::{OptionValue, OptionsResolver, RawOptions, ResolvedOptions};
pub use crate::parsers::{AnnotationParser, DocCommentParser};

/// Returns the version of the marginalia library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
