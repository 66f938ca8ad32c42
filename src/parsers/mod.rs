//! Annotation parser collaborators
//!
//! The reader core never defines its own annotation syntax: it talks to
//! anything implementing `AnnotationParser`. The default collaborator is
//! `DocCommentParser`, a regex-based tokenizer over doc blocks.

pub mod doc_comment;

pub use doc_comment::DocCommentParser;

use crate::core::error::Result;
use crate::core::models::{Annotation, Declaration};

#[cfg(test)]
use mockall::automock;

/// Capability contract for annotation parsers
///
/// This trait allows for mocking in tests and alternative implementations
/// (e.g. attribute-based or AST-backed parsers).
#[cfg_attr(test, automock)]
pub trait AnnotationParser: Send + Sync {
    /// Parse a declaration's metadata into an ordered sequence of annotations
    fn parse_declaration(&self, declaration: &Declaration) -> Result<Vec<Annotation>>;
}
