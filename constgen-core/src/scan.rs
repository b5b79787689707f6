//! Corpus discovery and loading.
//!
//! Performance characteristics:
//! - Early directory pruning via `WalkDir::filter_entry` (O(1) subtree skip)
//! - Files read in parallel via Rayon; results keep input order
//!
//! The core pipeline is order sensitive (first definition wins), so every
//! file list produced here is sorted before it is read.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::IoResultExt;

/// Directories excluded by default.
const EXCLUDED_DIRS: &[&str] = &[".git", "target", "node_modules"];

/// Extensions treated as headers when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["h"];

/// Checks if a directory entry should be pruned (excluded from traversal).
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Gathers header files under `root`, sorted by path.
///
/// A `root` that is itself a file is returned as-is, whatever its extension.
pub fn gather_header_files(
    root: &Path,
    extensions: &[&str],
    excludes: &[&str],
) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let all_excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(excludes.iter().copied())
        .collect();

    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &all_excludes))
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if e.file_type().is_file() && has_extension(path, extensions) {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Failed to gather header files from {}", root.display()))?;

    files.sort();
    Ok(files)
}

/// Gathers headers from several inputs, keeping input order and dropping
/// files listed twice.
pub fn gather_inputs(
    inputs: &[PathBuf],
    extensions: &[&str],
    excludes: &[&str],
) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for input in inputs {
        if !input.exists() {
            anyhow::bail!("Input does not exist: {}", input.display());
        }
        for file in gather_header_files(input, extensions, excludes)? {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }
    Ok(files)
}

/// Reads every file and concatenates their lines in file order.
///
/// Non-UTF-8 bytes are replaced rather than rejected; vendor headers are
/// not always clean.
pub fn read_corpus_lines(files: &[PathBuf]) -> Result<Vec<String>> {
    let per_file = files
        .par_iter()
        .map(|path| -> Result<Vec<String>> {
            let bytes = fs::read(path).with_path(path)?;
            Ok(String::from_utf8_lossy(&bytes)
                .lines()
                .map(str::to_string)
                .collect::<Vec<_>>())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(per_file.into_iter().flatten().collect())
}
