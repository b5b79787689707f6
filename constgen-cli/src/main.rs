//! constgen CLI - generate Rust enums and bitflags from C header constants.
//!
//! Features:
//! - Files and directories as inputs, walked in a stable order
//! - Enumeration (default) or bitflag output
//! - Text or JSON output, to stdout or a file
//! - Optional constgen.toml for repeatable runs

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use constgen_core::{
    format_output, gather_inputs, init_structured_logging, init_verbose_logging, load_config,
    load_config_file, read_corpus_lines, write_output, Constgen, ConstgenConfig,
    DEFAULT_EXTENSIONS,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate Rust enums and bitflags from C header constants")]
pub struct Cli {
    /// Identifier prefix to extract (e.g. EM, SHT, R_X86_64)
    prefix: Option<String>,

    /// Header files or directories to scan
    inputs: Vec<PathBuf>,

    /// Emit bitflag constants instead of enum variants
    #[arg(long)]
    bitflags: bool,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Write output to a file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    output: Option<String>,

    /// Configuration file (defaults to ./constgen.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Header file extensions to scan in directories
    #[arg(long = "ext", num_args = 1..)]
    extensions: Vec<String>,

    /// Directory names to skip while scanning
    #[arg(long, num_args = 1..)]
    exclude: Vec<String>,

    /// Human-readable progress logs on stderr instead of JSON logs
    #[arg(long, short)]
    verbose: bool,
}

/// Settings after merging CLI flags over the configuration file.
#[derive(Debug, PartialEq)]
struct Settings {
    prefix: String,
    bitflags: bool,
    json: bool,
    inputs: Vec<PathBuf>,
    extensions: Vec<String>,
    exclude: Vec<String>,
    output: Option<PathBuf>,
}

impl Settings {
    fn merge(cli: Cli, cfg: ConstgenConfig) -> Result<Self> {
        let json = cli.json || cfg.wants_json();
        let config_output = cfg.output.and_then(|o| o.path);

        let prefix = cli
            .prefix
            .or(cfg.prefix)
            .ok_or_else(|| anyhow!("No prefix given (pass one or set `prefix` in the config)"))?;

        let inputs = if cli.inputs.is_empty() {
            cfg.inputs.unwrap_or_default()
        } else {
            cli.inputs
        };
        if inputs.is_empty() {
            return Err(anyhow!("No inputs given (pass files/directories or set `inputs`)"));
        }

        let extensions = if cli.extensions.is_empty() {
            cfg.extensions
                .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect())
        } else {
            cli.extensions
        };

        let mut exclude = cfg.exclude.unwrap_or_default();
        exclude.extend(cli.exclude);

        let output = match cli.output {
            Some(path) => Some(validate_output_path(&path)?),
            None => config_output,
        };

        Ok(Self {
            prefix,
            bitflags: cli.bitflags || cfg.bitflags.unwrap_or(false),
            json,
            inputs,
            extensions,
            exclude,
            output,
        })
    }
}

/// Validates an output file path.
///
/// Rejects paths with null bytes and paths naming an existing directory.
fn validate_output_path(path: &str) -> Result<PathBuf> {
    if path.contains('\0') {
        return Err(anyhow!("Output path contains null bytes"));
    }
    let p = PathBuf::from(path);
    if p.is_dir() {
        return Err(anyhow!("Output path is a directory: {}", path));
    }
    Ok(p)
}

fn load_settings_config(explicit: Option<&Path>) -> Result<ConstgenConfig> {
    match explicit {
        Some(path) => load_config_file(path),
        None => Ok(load_config(Path::new("."))?.unwrap_or_default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        init_verbose_logging();
    } else {
        init_structured_logging();
    }

    let cfg = load_settings_config(cli.config.as_deref())?;
    let settings = Settings::merge(cli, cfg)?;

    // 1. Collect the corpus in a stable order
    let extensions: Vec<&str> = settings.extensions.iter().map(String::as_str).collect();
    let exclude: Vec<&str> = settings.exclude.iter().map(String::as_str).collect();
    let files = gather_inputs(&settings.inputs, &extensions, &exclude)?;
    if files.is_empty() {
        return Err(anyhow!("No header files found in the given inputs"));
    }
    let lines = read_corpus_lines(&files)?;

    // 2. Run the pipeline; nothing is written unless it fully succeeds
    let generated = Constgen::new(&settings.prefix)
        .bitflags(settings.bitflags)
        .generate(&lines)
        .with_context(|| format!("Failed to generate constants for prefix {}", settings.prefix))?;

    if generated.is_empty() {
        eprintln!(
            "[WARN] No definitions matched prefix {} in {} file(s)",
            settings.prefix,
            files.len()
        );
    }

    // 3. Deliver
    let text = format_output(&generated, settings.json)?;
    write_output(&text, settings.output.as_deref())
}
