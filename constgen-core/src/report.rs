//! Output formatting - plain text and JSON.

use anyhow::{Context, Result};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::builder::Generated;
use crate::emit::hex;
use crate::error::IoResultExt;

/// Builds the JSON document for a run.
///
/// Values are emitted as the hex strings used in the text output; i128
/// does not survive every JSON consumer as a number.
pub fn to_json(generated: &Generated) -> serde_json::Value {
    let records: Vec<_> = generated
        .records
        .iter()
        .map(|r| {
            json!({
                "name": r.display_name,
                "value": hex(r.value),
                "comment": r.comment,
                "aliases": r.aliases,
            })
        })
        .collect();

    json!({
        "prefix": generated.prefix,
        "mode": generated.mode,
        "count": generated.records.len(),
        "records": records,
    })
}

/// Renders a run in the requested format.
pub fn format_output(generated: &Generated, as_json: bool) -> Result<String> {
    if as_json {
        let mut text = serde_json::to_string_pretty(&to_json(generated))
            .context("JSON serialization failed")?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(generated.text.clone())
    }
}

/// Writes output to `path`, or to stdout when no path is given.
pub fn write_output(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => Ok(fs::write(path, text).with_path(path)?),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write to stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Constgen;

    #[test]
    fn test_json_shape() {
        let generated = Constgen::new("EM")
            .generate(["#define EM_A 1 /* first */", "#define EM_B 1"])
            .unwrap();
        let value = to_json(&generated);
        assert_eq!(value["prefix"], "EM");
        assert_eq!(value["mode"], "enumeration");
        assert_eq!(value["count"], 1);
        assert_eq!(value["records"][0]["name"], "_AOrB");
        assert_eq!(value["records"][0]["value"], "0x1");
        assert_eq!(value["records"][0]["comment"], "first Or B");
        assert_eq!(value["records"][0]["aliases"][0]["name"], "A");
    }

    #[test]
    fn test_text_format_is_rendered_text() {
        let generated = Constgen::new("EM").generate(["#define EM_A 1"]).unwrap();
        assert_eq!(format_output(&generated, false).unwrap(), "A = 0x1,\n");
        assert!(format_output(&generated, true).unwrap().ends_with("}\n"));
    }

    #[test]
    fn test_write_output_to_file() {
        let path = std::env::temp_dir().join(format!("constgen_report_{}.rs", std::process::id()));
        write_output("A = 0x1,\n", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "A = 0x1,\n");
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_write_output_error_names_path() {
        let path = std::env::temp_dir()
            .join(format!("constgen_no_such_dir_{}", std::process::id()))
            .join("out.rs");
        let err = write_output("A = 0x1,\n", Some(&path)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<crate::error::ConstgenError>(),
            Some(crate::error::ConstgenError::Io { .. })
        ));
    }
}
