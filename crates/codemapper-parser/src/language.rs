// ABOUTME: The tree-sitter parser boundary (§4.B): maps a `LanguageTag` to its
// ABOUTME: grammar and hands out a configured `Parser`, caching one per language.

use codemapper_core::LanguageTag;
use std::cell::RefCell;
use std::collections::HashMap;
use tree_sitter::{Parser, Tree};

fn grammar_for(tag: &LanguageTag) -> Option<tree_sitter::Language> {
    let language = match tag {
        LanguageTag::Rust => tree_sitter_rust::LANGUAGE.into(),
        LanguageTag::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        LanguageTag::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        LanguageTag::Python => tree_sitter_python::LANGUAGE.into(),
        LanguageTag::Go => tree_sitter_go::LANGUAGE.into(),
        LanguageTag::Java => tree_sitter_java::LANGUAGE.into(),
        LanguageTag::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        LanguageTag::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
        LanguageTag::Ruby => tree_sitter_ruby::LANGUAGE.into(),
        LanguageTag::Php => tree_sitter_php::LANGUAGE_PHP.into(),
        _ => return None,
    };
    Some(language)
}

thread_local! {
    /// One parser per language per rayon worker thread. A `Mutex`-guarded
    /// shared cache would serialize every parse across the pool; tree-sitter
    /// parsers are cheap to build and don't need to cross thread boundaries.
    static PARSERS: RefCell<HashMap<LanguageTag, Parser>> = RefCell::new(HashMap::new());
}

/// Parses `source` for `tag`. Returns `None` when the tag has no grammar in
/// this workspace (§4.A: Kotlin/Swift/Scala/Lua/Proto/Dockerfile, plus the
/// always-raw-text families) or when tree-sitter fails to produce a tree.
pub struct ParserProvider;

impl ParserProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, tag: &LanguageTag, source: &str) -> Option<Tree> {
        if !tag.has_tree_sitter_grammar() {
            return None;
        }

        PARSERS.with(|cell| {
            let mut parsers = cell.borrow_mut();
            let parser = parsers.entry(tag.clone()).or_insert_with(|| {
                let mut parser = Parser::new();
                if let Some(language) = grammar_for(tag) {
                    let _ = parser.set_language(&language);
                }
                parser
            });
            parser.parse(source, None)
        })
    }
}

impl Default for ParserProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rust_source_without_error() {
        let provider = ParserProvider::new();
        let tree = provider.parse(&LanguageTag::Rust, "fn main() {}").unwrap();
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn returns_none_for_ungrammared_language() {
        let provider = ParserProvider::new();
        assert!(provider.parse(&LanguageTag::Kotlin, "fun main() {}").is_none());
    }
}
