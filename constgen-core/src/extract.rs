//! Definition extraction from logical lines.
//!
//! Recognizes three statement shapes, in priority order:
//! - `#define PREFIX_NAME expr /* comment */`
//! - `#define OLD_PREFIX_NAME expr /* comment */` (legacy alias)
//! - `PREFIX_NAME = expr,` (enumerator list entry)
//!
//! Matching definitions are folded into a [`SymbolTable`] keyed by their
//! unresolved expression text.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use tracing::debug;

use crate::error::{ConstgenError, ConstgenResult};
use crate::naming::{canonical_name, constant_name, fixup_fragment, OutputMode};

/// Marker identifying the legacy spelling of a constant family.
pub const LEGACY_MARKER: &str = "OLD";

/// Name fragment used by headers for a count sentinel rather than a value.
const SENTINEL_FRAGMENT: &str = "num";

/// Which statement shape produced a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionSyntax {
    Macro,
    LegacyMacro,
    Enumerator,
}

/// A scanned definition statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDefinition {
    /// Name fragment after the prefix, before fixup.
    pub identifier: String,
    /// Unresolved right-hand side.
    pub expression_text: String,
    /// Trailing documentation comment, trimmed.
    pub comment: Option<String>,
    pub syntax: DefinitionSyntax,
}

impl RawDefinition {
    pub fn is_legacy(&self) -> bool {
        self.syntax == DefinitionSyntax::LegacyMacro
    }
}

/// Pre-compiled patterns for one prefix.
pub struct DefinitionPatterns {
    define: Regex,
    legacy_define: Regex,
    enumerator: Regex,
}

impl DefinitionPatterns {
    /// Compile the patterns for `prefix`.
    pub fn for_prefix(prefix: &str) -> ConstgenResult<Self> {
        let p = regex::escape(prefix);
        let m = regex::escape(LEGACY_MARKER);
        // Expression runs up to the first `/`, which opens the comment.
        let tail = r"\s+([^/\s][^/]*)(?:/\*+\s*(.*?)\s*\*+/|//\s*(.*))?";
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|e| ConstgenError::invalid_argument(e.to_string()))
        };
        Ok(Self {
            define: compile(format!(r"^\s*#\s*define\s+{}_([A-Za-z0-9_]+){}", p, tail))?,
            legacy_define: compile(format!(
                r"^\s*#\s*define\s+{}_{}_([A-Za-z0-9_]+){}",
                m, p, tail
            ))?,
            enumerator: compile(format!(r"^\s*{}_([A-Za-z0-9_]+)\s*=\s*([^=\s].*)$", p))?,
        })
    }

    /// Match one logical line. Returns `None` for non-definitions and for
    /// the `num` sentinel.
    pub fn match_line(&self, line: &str) -> Option<RawDefinition> {
        let (caps, syntax) = if let Some(c) = self.define.captures(line) {
            (c, DefinitionSyntax::Macro)
        } else if let Some(c) = self.legacy_define.captures(line) {
            (c, DefinitionSyntax::LegacyMacro)
        } else {
            (self.enumerator.captures(line)?, DefinitionSyntax::Enumerator)
        };

        let identifier = caps.get(1)?.as_str();
        if identifier.eq_ignore_ascii_case(SENTINEL_FRAGMENT) {
            debug!(identifier, "skipping sentinel definition");
            return None;
        }

        let comment = match syntax {
            DefinitionSyntax::Enumerator => None,
            _ => caps
                .get(3)
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().trim())
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        };

        Some(RawDefinition {
            identifier: identifier.to_string(),
            expression_text: caps.get(2)?.as_str().to_string(),
            comment,
            syntax,
        })
    }
}

/// Trims an expression and removes a trailing comment and trailing comma.
pub fn normalize_expression(text: &str) -> String {
    let mut text = text;
    if let Some(pos) = text.find("//") {
        text = &text[..pos];
    }
    if let Some(pos) = text.find("/*") {
        text = &text[..pos];
    }
    let text = text.trim();
    text.strip_suffix(',').unwrap_or(text).trim_end().to_string()
}

/// One recorded name under an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// Name in the output naming scheme.
    pub canonical_name: String,
    /// Always-uppercase alias-constant name.
    pub constant_name: String,
    pub comment: Option<String>,
    /// Legacy definitions resolve references but never reach the output.
    pub legacy: bool,
}

/// All names sharing one unresolved expression text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub expression: String,
    pub aliases: Vec<Alias>,
}

/// Symbol table keyed by normalized expression text, in first-seen order.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    prefix: String,
    mode: OutputMode,
    entries: Vec<SymbolEntry>,
    by_expression: HashMap<String, usize>,
    /// (legacy, canonical name) pairs already recorded.
    seen: HashSet<(bool, String)>,
    /// (legacy, source fragment) → entry, first definition wins.
    by_fragment: HashMap<(bool, String), usize>,
    /// (legacy, canonical name) → entry.
    by_canonical: HashMap<(bool, String), usize>,
}

impl SymbolTable {
    pub fn new(prefix: impl Into<String>, mode: OutputMode) -> Self {
        Self {
            prefix: prefix.into(),
            mode,
            entries: Vec::new(),
            by_expression: HashMap::new(),
            seen: HashSet::new(),
            by_fragment: HashMap::new(),
            by_canonical: HashMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a definition. Duplicates are dropped silently, first-seen wins.
    pub fn insert(&mut self, def: RawDefinition) -> ConstgenResult<()> {
        let legacy = def.is_legacy();
        let fixed = fixup_fragment(&def.identifier, def.comment.as_deref())?;
        let canonical = canonical_name(&fixed, self.mode);

        if !self.seen.insert((legacy, canonical.clone())) {
            debug!(name = %canonical, legacy, "skipping duplicate definition");
            return Ok(());
        }

        let expression = normalize_expression(&def.expression_text);
        let next = self.entries.len();
        let idx = *self.by_expression.entry(expression.clone()).or_insert(next);
        if idx == next {
            self.entries.push(SymbolEntry {
                expression,
                aliases: Vec::new(),
            });
        }

        self.by_fragment
            .entry((legacy, def.identifier))
            .or_insert(idx);
        self.by_canonical.insert((legacy, canonical.clone()), idx);
        self.entries[idx].aliases.push(Alias {
            constant_name: constant_name(&canonical),
            canonical_name: canonical,
            comment: def.comment,
            legacy,
        });
        Ok(())
    }

    /// Find the entry defining a referenced name fragment.
    ///
    /// Legacy references prefer the legacy definition and fall back to the
    /// primary one. Lookup goes by the fragment as written first, then by
    /// its canonical form.
    pub fn lookup(&self, fragment: &str, legacy: bool) -> Option<usize> {
        let find = |legacy: bool| {
            self.by_fragment
                .get(&(legacy, fragment.to_string()))
                .or_else(|| {
                    self.by_canonical
                        .get(&(legacy, canonical_name(fragment, self.mode)))
                })
                .copied()
        };
        if legacy {
            find(true).or_else(|| find(false))
        } else {
            find(false)
        }
    }
}

/// Scan logical lines and fold every matching definition into a table.
pub fn extract_definitions<I, S>(
    lines: I,
    prefix: &str,
    mode: OutputMode,
) -> ConstgenResult<SymbolTable>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let patterns = DefinitionPatterns::for_prefix(prefix)?;
    let mut table = SymbolTable::new(prefix, mode);
    for line in lines {
        if let Some(def) = patterns.match_line(line.as_ref()) {
            table.insert(def)?;
        }
    }
    Ok(table)
}
