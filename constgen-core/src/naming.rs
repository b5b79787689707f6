//! Identifier fixup and casing rules.
//!
//! Rust identifiers cannot start with a digit, so names such as `386` or
//! `68HC11` need a leading word before they can become variants. Known
//! architecture codes get a fixed letter; anything else borrows the vendor
//! word from the definition's comment, or the definition is rejected.

use serde::{Deserialize, Serialize};

use crate::error::{ConstgenError, ConstgenResult};

/// Architecture codes and the letter prepended to names starting with them.
/// Matched case-insensitively.
const ARCH_PREFIXES: &[(&str, &str)] = &[("68k", "m"), ("386", "i"), ("390", "s")];

/// Vendor words accepted from the first word of a comment.
const VENDOR_WORDS: &[&str] = &["intel", "motorola", "renesas", "freescale"];

/// Separator joining canonical names of an enumeration alias group.
pub const GROUP_SEPARATOR: &str = "Or";

/// Marker prepended to grouped variant names so they never clash with a
/// single-member variant.
pub const GROUP_MARKER: &str = "_";

/// Output flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// One variant per value, `PascalCase` names, alias groups merged.
    #[default]
    Enumeration,
    /// One `const` per name, uppercase names.
    Bitflags,
}

impl OutputMode {
    pub fn from_bitflags(bitflags: bool) -> Self {
        if bitflags {
            Self::Bitflags
        } else {
            Self::Enumeration
        }
    }

    pub fn is_bitflags(self) -> bool {
        self == Self::Bitflags
    }
}

/// Makes a digit-leading name fragment representable as an identifier.
///
/// Fragments that do not start with a digit are returned unchanged.
pub fn fixup_fragment(fragment: &str, comment: Option<&str>) -> ConstgenResult<String> {
    if !fragment.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(fragment.to_string());
    }

    let lowered = fragment.to_ascii_lowercase();
    if let Some((_, letter)) = ARCH_PREFIXES
        .iter()
        .find(|(code, _)| lowered.starts_with(*code))
    {
        return Ok(format!("{}{}", letter, fragment));
    }

    let Some(comment) = comment else {
        return Err(ConstgenError::ambiguous(fragment, None));
    };

    let first_word = comment
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();
    if VENDOR_WORDS.contains(&first_word.as_str()) {
        Ok(format!("{}_{}", first_word, fragment))
    } else {
        Err(ConstgenError::ambiguous(fragment, Some(comment)))
    }
}

/// Renders a fixed-up fragment in the naming scheme of `mode`.
pub fn canonical_name(fragment: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Bitflags => fragment.to_uppercase(),
        OutputMode::Enumeration => pascal_case(fragment),
    }
}

/// The always-uppercase alias-constant name of a canonical name.
///
/// Two canonical names differing only in case (`FooBar`, `Foobar`) share
/// this name, which is what the collision check looks for.
pub fn constant_name(canonical: &str) -> String {
    canonical.to_uppercase()
}

/// `SOME_FLAG` → `SomeFlag`, `X86_64` → `X8664`, `m68k` → `M68K`.
///
/// Underscores are dropped. A cased character is uppercased when it follows
/// an uncased one (digit, underscore, start) and lowercased otherwise.
fn pascal_case(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut prev_cased = false;
    for c in fragment.chars() {
        if c == '_' {
            prev_cased = false;
            continue;
        }
        let cased = c.is_lowercase() || c.is_uppercase();
        if cased && !prev_cased {
            out.extend(c.to_uppercase());
        } else if cased {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev_cased = cased;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("SOME_FLAG"), "SomeFlag");
        assert_eq!(pascal_case("X86_64"), "X8664");
        assert_eq!(pascal_case("m68k"), "M68K");
        assert_eq!(pascal_case("AARCH64"), "Aarch64");
        assert_eq!(pascal_case("intel_86_SOMETHING"), "Intel86Something");
    }

    #[test]
    fn test_canonical_name_modes() {
        assert_eq!(canonical_name("Some_Flag", OutputMode::Bitflags), "SOME_FLAG");
        assert_eq!(canonical_name("Some_Flag", OutputMode::Enumeration), "SomeFlag");
    }

    #[test]
    fn test_constant_name() {
        assert_eq!(constant_name("FooBar"), "FOOBAR");
        assert_eq!(constant_name("Foobar"), "FOOBAR");
    }

    #[test]
    fn test_non_digit_fragment_unchanged() {
        assert_eq!(fixup_fragment("SPARC", None).unwrap(), "SPARC");
    }

    #[test]
    fn test_architecture_codes() {
        assert_eq!(fixup_fragment("68K", None).unwrap(), "m68K");
        assert_eq!(fixup_fragment("68k_FOO", None).unwrap(), "m68k_FOO");
        assert_eq!(fixup_fragment("386", None).unwrap(), "i386");
        assert_eq!(fixup_fragment("390_X", Some("ignored")).unwrap(), "s390_X");
    }

    #[test]
    fn test_vendor_from_comment() {
        let fixed = fixup_fragment("86_SOMETHING", Some("Intel 8086 thing")).unwrap();
        assert_eq!(fixed, "intel_86_SOMETHING");
        assert_eq!(canonical_name(&fixed, OutputMode::Enumeration), "Intel86Something");
        assert_eq!(canonical_name(&fixed, OutputMode::Bitflags), "INTEL_86_SOMETHING");

        let fixed = fixup_fragment("56800EX", Some("Freescale 56800EX DSC")).unwrap();
        assert_eq!(fixed, "freescale_56800EX");
    }

    #[test]
    fn test_ambiguous_without_comment() {
        let err = fixup_fragment("86_SOMETHING", None).unwrap_err();
        assert!(matches!(err, ConstgenError::AmbiguousIdentifier { comment: None, .. }));
    }

    #[test]
    fn test_ambiguous_with_unknown_vendor() {
        let err = fixup_fragment("88K", Some("Acme 88000")).unwrap_err();
        assert!(matches!(err, ConstgenError::AmbiguousIdentifier { comment: Some(_), .. }));
    }

    #[test]
    fn test_mode_from_flag() {
        assert_eq!(OutputMode::from_bitflags(true), OutputMode::Bitflags);
        assert_eq!(OutputMode::from_bitflags(false), OutputMode::Enumeration);
        assert_eq!(OutputMode::default(), OutputMode::Enumeration);
    }
}
