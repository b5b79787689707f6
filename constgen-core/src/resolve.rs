//! Expression resolution.
//!
//! Every symbol table entry is rewritten until it is a plain literal
//! expression, then evaluated. References to other constants are replaced
//! by their already-resolved values, so entries are processed in
//! topological order of the reference graph:
//!
//! ```text
//!   EM_Y = 1 ──┐
//!              ├──▶ EM_X = EM_Y | EM_Z  ──▶ 3
//!   EM_Z = 2 ──┘
//! ```
//!
//! A reference cycle cannot be resolved and is reported as such.

use std::sync::OnceLock;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use regex::{Captures, Regex};
use tracing::{debug, info};

use crate::error::{ConstgenError, ConstgenResult};
use crate::eval::evaluate;
use crate::extract::{Alias, SymbolTable, LEGACY_MARKER};

/// An expression entry with its concrete value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub expression: String,
    pub value: i128,
    pub aliases: Vec<Alias>,
}

/// Resolved entries, in symbol table order.
#[derive(Debug, Clone, Default)]
pub struct ResolvedTable {
    pub entries: Vec<ResolvedEntry>,
}

/// Pre-compiled regex for C integer literal suffixes (`U`, `L`, `UL`, `LL`, `ULL`...).
fn suffix_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and covered by unit tests.
    REGEX.get_or_init(|| {
        Regex::new(r"\b(0[xX][0-9A-Fa-f]+|0[bB][01]+|[0-9]+)(?:[uU](?:ll|LL|[lL])?|(?:ll|LL|[lL])[uU]?)\b")
            .expect("Hardcoded regex pattern is valid")
    })
}

/// Matches `OLD_PREFIX_NAME` and `PREFIX_NAME`; group 1 is set for the
/// legacy form, group 2 is the name fragment.
fn reference_regex(prefix: &str) -> ConstgenResult<Regex> {
    Regex::new(&format!(
        r"\b({}_)?{}_([A-Za-z0-9_]+)\b",
        regex::escape(LEGACY_MARKER),
        regex::escape(prefix)
    ))
    .map_err(|e| ConstgenError::invalid_argument(e.to_string()))
}

/// Remove integer literal suffixes: `1U << 3L` → `1 << 3`.
pub fn strip_literal_suffixes(text: &str) -> String {
    suffix_regex().replace_all(text, "$1").into_owned()
}

/// Resolve every entry of `table` to an integer.
pub fn resolve(table: &SymbolTable) -> ConstgenResult<ResolvedTable> {
    let refs = reference_regex(table.prefix())?;
    let entries = table.entries();

    // Edge from each referenced entry to the entry that uses it.
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(entries.len(), entries.len());
    let nodes: Vec<NodeIndex> = (0..entries.len()).map(|i| graph.add_node(i)).collect();
    for (idx, entry) in entries.iter().enumerate() {
        for caps in refs.captures_iter(&entry.expression) {
            let target = lookup_reference(table, &caps)
                .ok_or_else(|| ConstgenError::unresolved(&caps[0], &entry.expression))?;
            graph.update_edge(nodes[target], nodes[idx], ());
        }
    }

    let order = toposort(&graph, None).map_err(|cycle| {
        let entry = &entries[graph[cycle.node_id()]];
        let identifier = entry
            .aliases
            .first()
            .map(|a| a.canonical_name.clone())
            .unwrap_or_default();
        ConstgenError::cycle(identifier, &entry.expression)
    })?;

    let mut values: Vec<Option<i128>> = vec![None; entries.len()];
    for node in order {
        let idx = graph[node];
        let value = resolve_expression(&entries[idx].expression, table, &refs, &values)?;
        debug!(expression = %entries[idx].expression, value = %value, "resolved expression");
        values[idx] = Some(value);
    }

    let entries: Vec<ResolvedEntry> = entries
        .iter()
        .zip(values)
        .filter_map(|(entry, value)| {
            value.map(|value| ResolvedEntry {
                expression: entry.expression.clone(),
                value,
                aliases: entry.aliases.clone(),
            })
        })
        .collect();

    info!(count = entries.len(), "resolved all expressions");
    Ok(ResolvedTable { entries })
}

fn lookup_reference(table: &SymbolTable, caps: &Captures<'_>) -> Option<usize> {
    table.lookup(&caps[2], caps.get(1).is_some())
}

/// Substitute to a fixpoint, then evaluate.
fn resolve_expression(
    expression: &str,
    table: &SymbolTable,
    refs: &Regex,
    values: &[Option<i128>],
) -> ConstgenResult<i128> {
    let mut text = expression.to_string();
    loop {
        let next = substitute_round(&text, expression, table, refs, values)?;
        if next == text {
            break;
        }
        text = next;
    }
    evaluate(&text)
}

/// One substitution round: references to values, then literal suffixes.
fn substitute_round(
    text: &str,
    expression: &str,
    table: &SymbolTable,
    refs: &Regex,
    values: &[Option<i128>],
) -> ConstgenResult<String> {
    let mut failure = None;
    let substituted = refs.replace_all(text, |caps: &Captures<'_>| {
        match lookup_reference(table, caps).and_then(|idx| values[idx]) {
            Some(v) if v < 0 => format!("({})", v),
            Some(v) => v.to_string(),
            None => {
                failure.get_or_insert_with(|| ConstgenError::unresolved(&caps[0], expression));
                caps[0].to_string()
            }
        }
    });
    if let Some(err) = failure {
        return Err(err);
    }
    Ok(strip_literal_suffixes(&substituted))
}
