use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use codemapper_analysis::{AnalysisConfig, InteractionRule};
use codemapper_parser::{build_raw_code_map, DiscoveryConfig, ScanConfig};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codemapper")]
#[command(about = "Polyglot source code map generator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project root and emit a code map as JSON.
    Scan {
        /// Project root to analyze.
        root: PathBuf,

        /// Destination file for the code map (default stdout).
        #[arg(long)]
        out: Option<PathBuf>,

        /// Path to a `codemapper.toml` config file (default `<root>/codemapper.toml`).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Worker count for the extraction phase.
        #[arg(long)]
        concurrency: Option<usize>,

        /// Exit non-zero if any file failed to parse.
        #[arg(long)]
        strict: bool,

        /// Log discovery/extraction limits as they're applied.
        #[arg(long)]
        diagnostics: bool,

        /// Restrict the scan to this path, bypassing glob discovery. Repeatable.
        #[arg(long = "only-file")]
        only_file: Vec<String>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileConfig {
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
    max_files: Option<usize>,
    max_file_size_kb: Option<u64>,
    concurrency: Option<usize>,
    #[serde(default)]
    only_files: Vec<String>,
    #[serde(default)]
    interaction_rules: Vec<InteractionRule>,
    strict: Option<bool>,
    diagnostics: Option<bool>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Scan { root, out, config, concurrency, strict, diagnostics, only_file, pretty } => {
            run_scan(&root, out.as_deref(), config.as_deref(), concurrency, strict, diagnostics, only_file, pretty)
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:?}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn run_scan(
    root: &Path,
    out: Option<&Path>,
    config_path: Option<&Path>,
    concurrency: Option<usize>,
    strict: bool,
    diagnostics: bool,
    only_file: Vec<String>,
    pretty: bool,
) -> Result<()> {
    let file_config = load_file_config(config_path, root)?;

    let discovery = DiscoveryConfig {
        include_patterns: file_config.include.clone(),
        exclude_patterns: file_config.exclude.clone(),
        max_file_size_kb: file_config.max_file_size_kb.unwrap_or(2048),
        max_files: file_config.max_files.unwrap_or(50_000),
        only_files: if only_file.is_empty() { file_config.only_files.clone() } else { only_file },
    };

    let scan_config = ScanConfig {
        discovery,
        concurrency: concurrency.or(file_config.concurrency).unwrap_or(4),
        strict: strict || file_config.strict.unwrap_or(false),
    };

    if diagnostics || file_config.diagnostics.unwrap_or(false) {
        tracing::info!(
            "scanning {} (concurrency={}, strict={}, maxFiles={}, maxFileSizeKb={})",
            root.display(),
            scan_config.concurrency,
            scan_config.strict,
            scan_config.discovery.max_files,
            scan_config.discovery.max_file_size_kb,
        );
    }

    let raw = build_raw_code_map(root, &scan_config).with_context(|| format!("failed to scan {}", root.display()))?;

    let analysis_config = AnalysisConfig { interaction_rules: file_config.interaction_rules };
    let code_map = codemapper_analysis::finalize(raw, root, &analysis_config);

    let json = if pretty { serde_json::to_string_pretty(&code_map) } else { serde_json::to_string(&code_map) }
        .context("failed to serialize code map")?;

    match out {
        Some(path) => fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}

fn load_file_config(config_path: Option<&Path>, root: &Path) -> Result<FileConfig> {
    let candidate = config_path.map(Path::to_path_buf).unwrap_or_else(|| root.join("codemapper.toml"));
    if !candidate.exists() {
        if config_path.is_some() {
            bail!("config file not found: {}", candidate.display());
        }
        return Ok(FileConfig::default());
    }

    let settings = config::Config::builder()
        .add_source(config::File::from(candidate.clone()))
        .build()
        .with_context(|| format!("failed to load {}", candidate.display()))?;

    settings.try_deserialize().with_context(|| format!("invalid configuration in {}", candidate.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_default_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_file_config(None, dir.path()).unwrap();
        assert!(config.include.is_empty());
        assert_eq!(config.concurrency, None);
    }

    #[test]
    fn explicit_missing_config_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_file_config(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn loads_overrides_from_a_codemapper_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("codemapper.toml"),
            "concurrency = 8\nstrict = true\nexclude = [\"**/fixtures/**\"]\n",
        )
        .unwrap();

        let config = load_file_config(None, dir.path()).unwrap();
        assert_eq!(config.concurrency, Some(8));
        assert_eq!(config.strict, Some(true));
        assert_eq!(config.exclude, vec!["**/fixtures/**".to_string()]);
    }
}
