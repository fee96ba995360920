// ABOUTME: Deterministic node id hashing (SHA-1 over UTF-8 bytes, forward-slash paths).
// ABOUTME: Also hosts the fixed pseudo-ids used by synthetic nodes.

use sha1::{Digest, Sha1};

/// Normalize a path to forward slashes, as required before any hashing happens.
/// All node `filePath` values and every id computed from a path go through this.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// `SHA-1(kind:key:filePath[:offset])` hex, per the id contract in §3/§9.
pub fn node_id(kind: &str, key: &str, file_path: &str, offset: Option<u64>) -> String {
    let file_path = normalize_path(file_path);
    let mut hasher = Sha1::new();
    match offset {
        Some(off) => hasher.update(format!("{kind}:{key}:{file_path}:{off}").as_bytes()),
        None => hasher.update(format!("{kind}:{key}:{file_path}").as_bytes()),
    }
    hex::encode(hasher.finalize())
}

/// The id for a File node: `SHA-1("file:<path>:<path>")` would be redundant, so
/// File nodes use `kind="file"` with the path itself as the key.
pub fn file_node_id(file_path: &str) -> String {
    node_id("file", &normalize_path(file_path), file_path, None)
}

/// Pseudo-ids for synthetic nodes: fixed strings, not hashes, so that
/// "created at most once per key" (invariant 5) is trivial to enforce by
/// simple string equality.
pub const DB_GENERIC_ID: &str = "db:generic";
pub const GRAPHQL_SCHEMA_ID: &str = "graphql:schema";

pub fn image_id(image_ref: &str) -> String {
    format!("image:{image_ref}")
}

pub fn table_id(table_name: &str) -> String {
    format!("table:{table_name}")
}

pub fn module_id(module_name: &str) -> String {
    format!("module:{module_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_backslashes() {
        assert_eq!(normalize_path("a\\b\\c.rs"), "a/b/c.rs");
    }

    #[test]
    fn node_id_is_deterministic() {
        let a = node_id("function", "foo", "src/a.rs", None);
        let b = node_id("function", "foo", "src/a.rs", None);
        assert_eq!(a, b);
    }

    #[test]
    fn node_id_changes_with_file_path() {
        let a = node_id("function", "foo", "src/a.rs", None);
        let b = node_id("function", "foo", "src/b.rs", None);
        assert_ne!(a, b);
    }

    #[test]
    fn node_id_is_hex_sha1_length() {
        let id = node_id("function", "foo", "src/a.rs", None);
        assert_eq!(id.len(), 40);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
