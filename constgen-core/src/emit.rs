//! Rust declaration rendering.

use crate::group::OutputRecord;
use crate::naming::OutputMode;

/// Corpus-specific capitalization fixes applied to the final text.
const CAPITALIZATION_FIXES: &[(&str, &str)] = &[("Aarch64", "AArch64")];

/// Render a value as `0x..`, negative values as `-0x..`.
pub fn hex(value: i128) -> String {
    if value < 0 {
        format!("-{:#x}", value.unsigned_abs())
    } else {
        format!("{:#x}", value)
    }
}

fn doc_line(out: &mut String, comment: Option<&str>) {
    if let Some(comment) = comment {
        out.push_str(&format!("/// {}\n", comment));
    }
}

/// Render records as enum variants or bitflag constants.
///
/// Enumeration output lists the variants first, followed by a block of
/// `pub const` aliases for every member of a grouped variant.
pub fn render(records: &[OutputRecord], mode: OutputMode) -> String {
    let mut out = String::new();

    for record in records {
        doc_line(&mut out, record.comment.as_deref());
        let line = match mode {
            OutputMode::Bitflags => {
                format!("const {} = {};\n", record.display_name, hex(record.value))
            }
            OutputMode::Enumeration => {
                format!("{} = {},\n", record.display_name, hex(record.value))
            }
        };
        out.push_str(&line);
    }

    if mode == OutputMode::Enumeration && records.iter().any(|r| !r.aliases.is_empty()) {
        out.push('\n');
        for record in records {
            for alias in &record.aliases {
                doc_line(&mut out, alias.comment.as_deref());
                out.push_str(&format!(
                    "pub const {}: Self = Self::{};\n",
                    alias.name, record.display_name
                ));
            }
        }
    }

    CAPITALIZATION_FIXES
        .iter()
        .fold(out, |text, (from, to)| text.replace(*from, to))
}
