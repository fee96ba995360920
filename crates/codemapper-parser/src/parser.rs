// ABOUTME: Single-file extraction (§4.C step 2): read, detect language, parse
// ABOUTME: with tree-sitter when a grammar exists, then dispatch to a strategy.

use crate::language::ParserProvider;
use codemapper_core::LanguageTag;
use codemapper_strategies::{dispatch, AnalysisContext, ExtractionResult};
use std::fs;
use std::path::Path;
use tracing::warn;

/// One file's extraction plus whether it degraded: the file's language has a
/// tree-sitter grammar in this workspace but parsing it still failed (or the
/// file couldn't be read at all). Used to drive `--strict` (B2).
pub struct FileExtraction {
    pub result: ExtractionResult,
    pub degraded: bool,
}

/// Extracts one file relative to `root`. Never returns `Err` for parse
/// failures -- those degrade to a File-node-only `ExtractionResult` (B2) so a
/// single bad file can't abort the whole scan outside `--strict` mode, which
/// is enforced by the caller counting `degraded` flags, not by this function.
pub fn extract_file(root: &Path, absolute_path: &Path, provider: &ParserProvider) -> FileExtraction {
    let relative = absolute_path.strip_prefix(root).unwrap_or(absolute_path);
    let file_path = codemapper_core::normalize_path(&relative.to_string_lossy());

    let source = match fs::read_to_string(absolute_path) {
        Ok(s) => s,
        Err(err) => {
            warn!("failed to read {file_path}: {err}");
            return FileExtraction { result: ExtractionResult::default(), degraded: true };
        }
    };

    let language = absolute_path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(LanguageTag::from_extension)
        .unwrap_or(LanguageTag::NotApplicable);

    let has_grammar = language.has_tree_sitter_grammar();
    let tree = provider.parse(&language, &source);
    let degraded = has_grammar && tree.is_none();

    let ctx = AnalysisContext {
        file_path: &file_path,
        language,
        source: &source,
        tree: tree.as_ref(),
    };

    FileExtraction { result: dispatch(&ctx), degraded }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    #[test]
    fn extracts_a_rust_file_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("lib.rs"), "fn hello() {}").unwrap();
        let provider = ParserProvider::new();

        let extraction = extract_file(dir.path(), &dir.path().join("lib.rs"), &provider);
        assert!(!extraction.degraded);
        assert!(extraction.result.nodes.iter().any(|n| n.file_path == "lib.rs"));
    }
}
