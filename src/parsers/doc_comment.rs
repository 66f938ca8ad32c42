//! Regex-based doc-comment annotation parser
//!
//! Tokenizes `@Name`, `@Name(...)` and `@Name(key=value, ...)` forms out of
//! a declaration's doc block. The shared `IgnoredNames` registry, handed in
//! at construction, decides which names are plain documentation and which
//! must resolve to a registered annotation type.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

use super::AnnotationParser;
use crate::core::error::{ReaderError, Result};
use crate::core::models::{Annotation, Declaration};
use crate::core::registry::IgnoredNames;

lazy_static! {
    /// Matches an annotation at line start or after whitespace; captures the
    /// name and an optional parenthesized argument body. The leading guard
    /// keeps email-like text (`mail@example.com`) from matching.
    static ref ANNOTATION_PATTERN: Regex =
        Regex::new(r"(?:^|\s)@([A-Za-z_][A-Za-z0-9_]*)(?:\(([^)]*)\))?").unwrap();

    /// Matches `key=value` pairs inside an argument body; values may be
    /// double-quoted or bare
    static ref ARGUMENT_PATTERN: Regex =
        Regex::new(r#"([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?:"([^"]*)"|([^,\s)]+))"#).unwrap();
}

/// Default annotation parser over doc-comment blocks
pub struct DocCommentParser {
    registry: Arc<IgnoredNames>,
}

impl DocCommentParser {
    /// Create a parser bound to a shared ignored-name registry
    pub fn new(registry: Arc<IgnoredNames>) -> Self {
        Self { registry }
    }

    /// Strip comment leaders (`///`, `//!`, `*`, `#`) from a doc line
    fn strip_leader(line: &str) -> &str {
        line.trim_start()
            .trim_start_matches(|c: char| c == '/' || c == '*' || c == '!' || c == '#')
            .trim()
    }

    /// Parse a parenthesized argument body into key/value pairs
    ///
    /// A body with no `key=value` pairs becomes the default `value` argument
    /// (e.g. `@Since("1.2")` parses as `value = 1.2`).
    fn parse_arguments(body: &str) -> HashMap<String, String> {
        let mut arguments = HashMap::new();

        for caps in ARGUMENT_PATTERN.captures_iter(body) {
            let key = caps[1].to_string();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            arguments.insert(key, value);
        }

        if arguments.is_empty() {
            let bare = body.trim().trim_matches('"');
            if !bare.is_empty() {
                arguments.insert("value".to_string(), bare.to_string());
            }
        }

        arguments
    }
}

impl AnnotationParser for DocCommentParser {
    fn parse_declaration(&self, declaration: &Declaration) -> Result<Vec<Annotation>> {
        let mut annotations = Vec::new();

        for line in declaration.doc.lines() {
            let line = Self::strip_leader(line);

            for caps in ANNOTATION_PATTERN.captures_iter(line) {
                let name = &caps[1];

                if self.registry.is_ignored(name) {
                    continue;
                }
                if !self.registry.is_loadable(name) {
                    return Err(ReaderError::UnknownAnnotation {
                        name: name.to_string(),
                        declaration: declaration.identifier.clone(),
                    });
                }

                let mut annotation = Annotation::new(name);
                if let Some(body) = caps.get(2) {
                    annotation.arguments = Self::parse_arguments(body.as_str());
                }
                annotations.push(annotation);
            }
        }

        Ok(annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::DeclarationKind;

    fn parser_with(types: &[&str]) -> DocCommentParser {
        let registry = Arc::new(IgnoredNames::new());
        registry.install_builtin();
        for t in types {
            registry.register_type(*t);
        }
        DocCommentParser::new(registry)
    }

    fn class_decl(doc: &str) -> Declaration {
        Declaration::new("app::UserService", DeclarationKind::Class, doc)
    }

    #[test]
    fn test_parses_bare_annotation() {
        let parser = parser_with(&["Entity"]);
        let annotations = parser
            .parse_declaration(&class_decl("/// @Entity"))
            .unwrap();

        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].name, "Entity");
        assert!(annotations[0].arguments.is_empty());
    }

    #[test]
    fn test_parses_key_value_arguments() {
        let parser = parser_with(&["Route"]);
        let annotations = parser
            .parse_declaration(&class_decl(r#"/// @Route(path="/users", priority=10)"#))
            .unwrap();

        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].argument("path"), Some("/users"));
        assert_eq!(annotations[0].argument("priority"), Some("10"));
    }

    #[test]
    fn test_bare_body_becomes_default_value() {
        let parser = parser_with(&["Since"]);
        let annotations = parser
            .parse_declaration(&class_decl(r#"/// @Since("1.2")"#))
            .unwrap();

        assert_eq!(annotations[0].argument("value"), Some("1.2"));
    }

    #[test]
    fn test_skips_ignored_names() {
        let parser = parser_with(&["Entity"]);
        let doc = "/// @author Jordan Example\n/// @deprecated\n/// @Entity";
        let annotations = parser.parse_declaration(&class_decl(doc)).unwrap();

        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].name, "Entity");
    }

    #[test]
    fn test_unknown_name_is_a_hard_failure() {
        let parser = parser_with(&[]);
        let err = parser
            .parse_declaration(&class_decl("/// @Route(path=/users)"))
            .unwrap_err();

        match err {
            ReaderError::UnknownAnnotation { name, declaration } => {
                assert_eq!(name, "Route");
                assert_eq!(declaration, "app::UserService");
            }
            other => panic!("expected UnknownAnnotation, got {other}"),
        }
    }

    #[test]
    fn test_email_addresses_do_not_match() {
        let parser = parser_with(&[]);
        // @author is ignored; the address after it must not token as @example
        let doc = "/// @author Jordan <jordan@example.com>";
        let annotations = parser.parse_declaration(&class_decl(doc)).unwrap();
        assert!(annotations.is_empty());
    }

    #[test]
    fn test_preserves_declaration_order() {
        let parser = parser_with(&["Route", "Inject"]);
        let doc = "/// @Route(path=/a)\n/// @Inject(service=mailer)";
        let annotations = parser.parse_declaration(&class_decl(doc)).unwrap();

        assert_eq!(annotations[0].name, "Route");
        assert_eq!(annotations[1].name, "Inject");
    }

    #[test]
    fn test_handles_block_comment_leaders() {
        let parser = parser_with(&["Entity"]);
        let doc = "/**\n * @Entity\n * @author someone\n */";
        let annotations = parser.parse_declaration(&class_decl(doc)).unwrap();

        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].name, "Entity");
    }

    #[test]
    fn test_empty_doc_yields_no_annotations() {
        let parser = parser_with(&["Entity"]);
        let annotations = parser.parse_declaration(&class_decl("")).unwrap();
        assert!(annotations.is_empty());
    }
}
