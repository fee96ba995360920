// ABOUTME: File discovery (§4.C orchestrator step 1): `ignore::WalkBuilder` +
// ABOUTME: `globset` include/exclude filtering, honouring size and count caps.

use codemapper_core::{CodeMapError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub max_file_size_kb: u64,
    pub max_files: usize,
    /// When non-empty, restricts the scan to exactly these paths (the CLI's
    /// repeatable `--only-file` flag) instead of walking the whole tree.
    pub only_files: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec![],
            exclude_patterns: vec![],
            max_file_size_kb: 2048,
            max_files: 50_000,
            only_files: vec![],
        }
    }
}

const DEFAULT_EXCLUDES: &[&str] = &[
    "**/node_modules/**",
    "**/.git/**",
    "**/target/**",
    "**/dist/**",
    "**/build/**",
    "**/.next/**",
    "**/.nuxt/**",
    "**/coverage/**",
    "**/__pycache__/**",
    "**/.venv/**",
    "**/vendor/**",
];

/// Walks `root` and returns every file path worth analyzing, sorted so two
/// runs over the same tree discover files in the same order (I3 determinism).
pub fn discover_files(root: &Path, config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(CodeMapError::RootNotFound(root.display().to_string()));
    }

    if !config.only_files.is_empty() {
        let mut paths: Vec<PathBuf> = config.only_files.iter().map(|p| root.join(p)).collect();
        paths.sort();
        return Ok(paths);
    }

    let mut excludes: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
    excludes.extend(config.exclude_patterns.iter().cloned());
    let exclude_set = build_globset(&excludes);
    let include_set = if config.include_patterns.is_empty() {
        None
    } else {
        build_globset(&config.include_patterns)
    };

    let mut walker = WalkBuilder::new(root);
    walker.hidden(false).git_ignore(true).git_exclude(true).ignore(true);

    let max_size_bytes = config.max_file_size_kb.saturating_mul(1024);
    let mut discovered = Vec::new();

    for entry in walker.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("file discovery walk error: {err}");
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        if let Some(set) = &exclude_set {
            if set.is_match(path) {
                continue;
            }
        }
        if let Some(set) = &include_set {
            if !set.is_match(path) {
                continue;
            }
        }

        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if codemapper_core::LanguageTag::from_extension(ext).is_none() {
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        if size > max_size_bytes {
            debug!("skipping {} ({size} bytes > {max_size_bytes} cap)", path.display());
            continue;
        }

        discovered.push(path.to_path_buf());
        if discovered.len() >= config.max_files {
            warn!("max_files cap of {} reached, truncating discovery", config.max_files);
            break;
        }
    }

    discovered.sort();
    Ok(discovered)
}

fn build_globset<S: AsRef<str>>(patterns: &[S]) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let mut added = false;
    for pattern in patterns {
        match Glob::new(pattern.as_ref()) {
            Ok(glob) => {
                builder.add(glob);
                added = true;
            }
            Err(err) => warn!("invalid glob pattern '{}': {err}", pattern.as_ref()),
        }
    }
    if added {
        builder.build().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn discovers_recognized_extensions_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "fn main() {}").unwrap();
        fs::write(dir.path().join("b.unknownext"), "noop").unwrap();

        let files = discover_files(dir.path(), &DiscoveryConfig::default()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.rs"));
    }

    #[test]
    fn errors_on_missing_root() {
        let result = discover_files(Path::new("/does/not/exist"), &DiscoveryConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn only_files_bypasses_the_walk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "fn main() {}").unwrap();
        fs::write(dir.path().join("b.rs"), "fn other() {}").unwrap();

        let config = DiscoveryConfig {
            only_files: vec!["b.rs".to_string()],
            ..Default::default()
        };
        let files = discover_files(dir.path(), &config).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("b.rs"));
    }
}
