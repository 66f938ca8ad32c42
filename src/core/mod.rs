//! Core module for the marginalia reader kernel
//!
//! This module provides the foundational types and traits for reader
//! assembly. It follows a modular architecture for testability.
//!
//! # Architecture
//!
//! - `models`: Core data structures (Annotation, Declaration)
//! - `error`: Error types using thiserror
//! - `cache`: Cache capability trait + MemoryCache/FileCache backends
//! - `registry`: Process-wide ignored-name and loadable-type registry
//! - `reader`: Reader trait and the Raw/Cached/Indexed variants

pub mod cache;
pub mod error;
pub mod models;
pub mod reader;
pub mod registry;

// Re-export commonly used types
pub use cache::{verify_capability, Cache, CacheEntry, FileCache, MemoryCache, CACHE_VERSION};
pub use error::{ReaderError, Result};
pub use models::{Annotation, Declaration, DeclarationKind};
pub use reader::{Annotations, AssembledReader, CachedReader, IndexedReader, RawReader, Reader};
pub use registry::{IgnoredNames, BUILTIN_IGNORED_NAMES};
