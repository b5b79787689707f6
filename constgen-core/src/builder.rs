//! Builder pattern API for constant generation.
//!
//! Provides a fluent interface over the whole pipeline:
//!
//! ```rust,ignore
//! use constgen_core::prelude::*;
//!
//! let generated = Constgen::new("EM")
//!     .bitflags(false)
//!     .generate(lines)?;
//!
//! print!("{}", generated.text);
//! ```

use serde::Serialize;
use tracing::info;

use crate::emit::render;
use crate::error::{ConstgenError, ConstgenResult};
use crate::extract::{extract_definitions, SymbolTable};
use crate::group::{group, OutputRecord};
use crate::naming::OutputMode;
use crate::resolve::resolve;
use crate::scanner::logical_lines;

/// Builder for configuring one generation run.
///
/// # Example
///
/// ```rust,ignore
/// let generated = Constgen::new("PF").bitflags(true).generate(lines)?;
/// ```
#[derive(Debug, Clone)]
pub struct Constgen {
    /// Identifier prefix selecting which definitions to extract
    prefix: String,

    /// Output flavor
    mode: OutputMode,
}

impl Constgen {
    /// Create a new builder for the given prefix (`EM`, `SHT`, `R_X86_64`...).
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            mode: OutputMode::Enumeration,
        }
    }

    /// Emit bitflag constants instead of enum variants.
    pub fn bitflags(mut self, enabled: bool) -> Self {
        self.mode = OutputMode::from_bitflags(enabled);
        self
    }

    /// Set the output mode directly.
    pub fn mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn output_mode(&self) -> OutputMode {
        self.mode
    }

    /// Reject prefixes that cannot start a C identifier.
    fn validate(&self) -> ConstgenResult<()> {
        let mut chars = self.prefix.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ConstgenError::invalid_argument(format!(
                "prefix '{}' is not a C identifier",
                self.prefix
            )));
        }
        Ok(())
    }

    /// Scan and extract definitions without resolving them.
    pub fn extract<I, S>(&self, lines: I) -> ConstgenResult<SymbolTable>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.validate()?;
        let table = extract_definitions(logical_lines(lines), &self.prefix, self.mode)?;
        info!(prefix = %self.prefix, expressions = table.len(), "extracted definitions");
        Ok(table)
    }

    /// Run the whole pipeline. Any failure aborts without output.
    pub fn generate<I, S>(&self, lines: I) -> ConstgenResult<Generated>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let table = self.extract(lines)?;
        let resolved = resolve(&table)?;
        let records = group(resolved, self.mode)?;
        let text = render(&records, self.mode);

        Ok(Generated {
            prefix: self.prefix.clone(),
            mode: self.mode,
            records,
            text,
        })
    }
}

/// Result of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct Generated {
    /// Prefix the run extracted
    pub prefix: String,

    /// Output flavor
    pub mode: OutputMode,

    /// Declarations in encounter order
    pub records: Vec<OutputRecord>,

    /// Rendered Rust text
    pub text: String,
}

impl Generated {
    /// Check if anything matched the prefix.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
