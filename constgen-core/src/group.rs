//! Value grouping and naming.
//!
//! Expressions that evaluate to the same integer are aliases of one
//! another. In enumeration mode they become a single variant whose name
//! joins every member (`_FooOrBar`) plus one alias constant per member; in
//! bitflag mode every name keeps its own constant.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::error::{ConstgenError, ConstgenResult};
use crate::extract::Alias;
use crate::naming::{OutputMode, GROUP_MARKER, GROUP_SEPARATOR};
use crate::resolve::ResolvedTable;

/// Alias constant pointing at a grouped enumeration variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasConst {
    pub name: String,
    pub comment: Option<String>,
}

/// One rendered declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub display_name: String,
    pub comment: Option<String>,
    pub value: i128,
    pub aliases: Vec<AliasConst>,
}

/// Names sharing one resolved value, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueGroup {
    pub value: i128,
    pub members: Vec<Alias>,
}

/// Merge resolved entries by value. Legacy names are dropped here: they
/// only ever feed reference resolution.
pub fn group_by_value(resolved: ResolvedTable) -> Vec<ValueGroup> {
    let mut groups: Vec<ValueGroup> = Vec::new();
    let mut index: HashMap<i128, usize> = HashMap::new();

    for entry in resolved.entries {
        let members: Vec<Alias> = entry.aliases.into_iter().filter(|a| !a.legacy).collect();
        if members.is_empty() {
            continue;
        }
        let idx = *index.entry(entry.value).or_insert_with(|| {
            groups.push(ValueGroup {
                value: entry.value,
                members: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[idx];
        for member in members {
            if !group
                .members
                .iter()
                .any(|m| m.canonical_name == member.canonical_name)
            {
                group.members.push(member);
            }
        }
    }

    groups
}

/// Fail if two distinct names share an alias-constant name.
pub fn check_collisions(groups: &[ValueGroup]) -> ConstgenResult<()> {
    let mut owners: HashMap<&str, (&str, i128)> = HashMap::new();
    for group in groups {
        for member in &group.members {
            let owner = owners
                .entry(member.constant_name.as_str())
                .or_insert((member.canonical_name.as_str(), group.value));
            if owner.0 != member.canonical_name {
                return Err(ConstgenError::collision(
                    &member.constant_name,
                    owner.1,
                    group.value,
                ));
            }
        }
    }
    Ok(())
}

/// Turn value groups into output records for `mode`.
pub fn build_records(groups: Vec<ValueGroup>, mode: OutputMode) -> Vec<OutputRecord> {
    match mode {
        OutputMode::Bitflags => groups
            .into_iter()
            .flat_map(|group| {
                let value = group.value;
                group.members.into_iter().map(move |m| OutputRecord {
                    display_name: m.canonical_name,
                    comment: m.comment,
                    value,
                    aliases: Vec::new(),
                })
            })
            .collect(),
        OutputMode::Enumeration => groups.into_iter().map(enumeration_record).collect(),
    }
}

fn enumeration_record(mut group: ValueGroup) -> OutputRecord {
    if group.members.len() == 1 {
        let member = group.members.remove(0);
        return OutputRecord {
            display_name: member.canonical_name,
            comment: member.comment,
            value: group.value,
            aliases: Vec::new(),
        };
    }

    let joined = group
        .members
        .iter()
        .map(|m| m.canonical_name.as_str())
        .collect::<Vec<_>>()
        .join(GROUP_SEPARATOR);

    let comment = group.members.iter().any(|m| m.comment.is_some()).then(|| {
        group
            .members
            .iter()
            .map(|m| {
                m.comment
                    .as_deref()
                    .unwrap_or(&m.canonical_name)
                    .trim()
                    .trim_end_matches('.')
            })
            .collect::<Vec<_>>()
            .join(" Or ")
    });

    let aliases = group
        .members
        .into_iter()
        .map(|m| AliasConst {
            name: m.constant_name,
            comment: m.comment,
        })
        .collect();

    OutputRecord {
        display_name: format!("{}{}", GROUP_MARKER, joined),
        comment,
        value: group.value,
        aliases,
    }
}

/// Group, check and name in one step.
pub fn group(resolved: ResolvedTable, mode: OutputMode) -> ConstgenResult<Vec<OutputRecord>> {
    let groups = group_by_value(resolved);
    check_collisions(&groups)?;
    let records = build_records(groups, mode);
    info!(records = records.len(), ?mode, "grouped constants by value");
    Ok(records)
}
