use thiserror::Error;

/// Errors that can escape the core. These are reserved for genuinely exceptional
/// conditions (a missing discovery root, an unwritable sink, a malformed
/// configuration) -- per-file parse/strategy failures are swallowed by design
/// and never surface here (see the failure policy in SPEC_FULL.md §7).
#[derive(Error, Debug)]
pub enum CodeMapError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("discovery root not found: {0}")]
    RootNotFound(String),

    #[error("strict mode: {0} file(s) failed to parse")]
    StrictModeParseFailures(usize),
}

pub type Result<T> = std::result::Result<T, CodeMapError>;
