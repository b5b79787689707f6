//! constgen-core: turn C header constants into Rust enums and bitflags
//!
//! Scans header text for integer constant definitions sharing a prefix,
//! resolves their value expressions (including references between them),
//! groups names that alias the same value and renders Rust declarations.
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use constgen_core::prelude::*;
//!
//! let files = gather_header_files(Path::new("/usr/include"), DEFAULT_EXTENSIONS, &[])?;
//! let lines = read_corpus_lines(&files)?;
//! let generated = Constgen::new("EM").generate(&lines)?;
//! print!("{}", generated.text);
//! ```
//!
//! # Module Organization
//!
//! - [`scanner`]: Line-continuation joining
//! - [`extract`]: Definition matching and the symbol table
//! - [`naming`]: Identifier fixup and casing
//! - [`resolve`]: Reference substitution in dependency order
//! - [`eval`]: Constant integer expression evaluation
//! - [`group`]: Alias grouping and collision detection
//! - [`emit`]: Rust declaration rendering
//! - [`builder`]: Fluent builder API over the pipeline
//! - [`scan`]: Corpus discovery and loading
//! - [`report`]: Text and JSON output
//! - [`error`]: Typed error handling

pub mod builder;
pub mod config;
pub mod emit;
pub mod error;
pub mod eval;
pub mod extract;
pub mod group;
pub mod logging;
pub mod naming;
pub mod prelude;
pub mod report;
pub mod resolve;
pub mod scan;
pub mod scanner;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{ConstgenError, ConstgenResult, IoResultExt};

// Builder API
pub use builder::{Constgen, Generated};

// Configuration
pub use config::{load_config, load_config_file, ConstgenConfig, OutputConfig, CONFIG_FILE};

// Logging
pub use logging::{init_structured_logging, init_verbose_logging};

// Pipeline stages
pub use emit::{hex, render};
pub use eval::evaluate;
pub use extract::{
    extract_definitions, normalize_expression, Alias, DefinitionPatterns, DefinitionSyntax,
    RawDefinition, SymbolEntry, SymbolTable, LEGACY_MARKER,
};
pub use group::{
    build_records, check_collisions, group, group_by_value, AliasConst, OutputRecord, ValueGroup,
};
pub use naming::{canonical_name, constant_name, fixup_fragment, OutputMode};
pub use resolve::{resolve, strip_literal_suffixes, ResolvedEntry, ResolvedTable};
pub use scanner::{logical_lines, LogicalLines};

// Corpus loading and output
pub use report::{format_output, to_json, write_output};
pub use scan::{gather_header_files, gather_inputs, read_corpus_lines, DEFAULT_EXTENSIONS};

#[cfg(test)]
mod tests;
