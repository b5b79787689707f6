//! End-to-end test suite for constgen-core.

use crate::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_file(file: &Path, content: &str) {
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn setup_temp_corpus() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("constgen_tests")
        .join(format!("{}_{}", timestamp, id));

    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

const MACHINE_HEADER: &str = r#"
/* Legal values for e_machine (architecture).  */

#define EM_NONE		 0	/* No machine */
#define EM_M32		 1	/* AT&T WE 32100 */
#define EM_SPARC	 2	/* SUN SPARC */
#define EM_386		 3	/* Intel 80386 */
#define EM_68K		 4	/* Motorola m68k family */
#define EM_860		 7	/* Intel 80860 */
#define EM_S390		22	/* IBM S390 */
#define EM_AARCH64	183	/* ARM AARCH64 */
#define EM_CSKY		252     /* C-SKY */
#define EM_ARCV2	252	/* Synopsys ARCv2 Cores */
#define EM_NUM		253

/* Old spelling kept for compatibility.  */
#define OLD_EM_ALPHA	41
#define EM_ALPHA	0x9026
"#;

fn generate(lines: &[&str], bitflags: bool) -> ConstgenResult<Generated> {
    Constgen::new("EM").bitflags(bitflags).generate(lines.iter().copied())
}

// End-to-end: realistic header through files on disk
#[test]
fn test_machine_header_from_disk() {
    let root = setup_temp_corpus();
    write_file(&root.join("elf.h"), MACHINE_HEADER);

    let files = gather_header_files(&root, DEFAULT_EXTENSIONS, &[]).unwrap();
    let lines = read_corpus_lines(&files).unwrap();
    let generated = Constgen::new("EM").generate(&lines).unwrap();

    let expected = "\
/// No machine
None = 0x0,
/// AT&T WE 32100
M32 = 0x1,
/// SUN SPARC
Sparc = 0x2,
/// Intel 80386
I386 = 0x3,
/// Motorola m68k family
M68K = 0x4,
/// Intel 80860
Intel860 = 0x7,
/// IBM S390
S390 = 0x16,
/// ARM AARCH64
AArch64 = 0xb7,
/// C-SKY Or Synopsys ARCv2 Cores
_CskyOrArcv2 = 0xfc,
Alpha = 0x9026,

/// C-SKY
pub const CSKY: Self = Self::_CskyOrArcv2;
/// Synopsys ARCv2 Cores
pub const ARCV2: Self = Self::_CskyOrArcv2;
";
    assert_eq!(generated.text, expected);
}

// Determinism: identical input gives byte-identical output
#[test]
fn test_deterministic_output() {
    let lines: Vec<&str> = MACHINE_HEADER.lines().collect();
    let first = generate(&lines, false).unwrap();
    for _ in 0..5 {
        assert_eq!(generate(&lines, false).unwrap().text, first.text);
    }
}

// Idempotent grouping: single-member values keep their canonical name
#[test]
fn test_single_member_names_are_untouched() {
    let generated = generate(&["#define EM_ONE 1", "#define EM_TWO 2"], false).unwrap();
    let names: Vec<_> = generated.records.iter().map(|r| r.display_name.as_str()).collect();
    assert_eq!(names, vec!["One", "Two"]);
    assert!(generated.records.iter().all(|r| r.aliases.is_empty()));
}

// Alias symmetry: grouped names contain every member once
#[test]
fn test_alias_group_contains_every_member() {
    let generated = generate(
        &["#define EM_A 4", "#define EM_B (1 << 2)", "#define EM_C (EM_A)"],
        false,
    )
    .unwrap();
    assert_eq!(generated.records.len(), 1);
    let record = &generated.records[0];
    assert!(record.display_name.starts_with('_'));
    let members: Vec<_> = record.display_name[1..].split("Or").collect();
    assert_eq!(members, vec!["A", "B", "C"]);
    assert_eq!(record.value, 4);
}

// Reference resolution regardless of definition order
#[test]
fn test_reference_resolution_out_of_order() {
    let generated = generate(
        &["#define EM_X (EM_Y | EM_Z)", "#define EM_Y 1", "#define EM_Z 2"],
        false,
    )
    .unwrap();
    let x = generated.records.iter().find(|r| r.display_name == "X").unwrap();
    assert_eq!(x.value, 3);
}

// Enumerator lists are recognized alongside macros
#[test]
fn test_enumerator_list() {
    let generated = generate(
        &[
            "enum {",
            "    EM_FIRST = 1,",
            "    EM_SECOND = EM_FIRST << 1,",
            "    EM_THIRD = 0x4U /* trailing */",
            "};",
        ],
        false,
    )
    .unwrap();
    assert_eq!(generated.text, "First = 0x1,\nSecond = 0x2,\nThird = 0x4,\n");
}

// Digit-leading fixup
#[test]
fn test_digit_leading_vendor_fixup() {
    let generated =
        generate(&["#define EM_86_SOMETHING 9 /* Intel thing */"], false).unwrap();
    assert_eq!(generated.records[0].display_name, "Intel86Something");

    let generated =
        generate(&["#define EM_86_SOMETHING 9 /* Intel thing */"], true).unwrap();
    assert_eq!(generated.records[0].display_name, "INTEL_86_SOMETHING");

    let err = generate(&["#define EM_86_SOMETHING 9"], false).unwrap_err();
    assert!(matches!(err, ConstgenError::AmbiguousIdentifier { .. }));
}

// Collision detection across equal and distinct values
#[test]
fn test_name_collisions() {
    let err = generate(&["#define EM_FOO_BAR 1", "#define EM_FOOBAR (0 + 1)"], false).unwrap_err();
    assert!(matches!(err, ConstgenError::NameCollision { .. }));

    let err = generate(&["#define EM_FOO_BAR 1", "#define EM_FOOBAR 2"], false).unwrap_err();
    match err {
        ConstgenError::NameCollision {
            name,
            first_value,
            second_value,
        } => {
            assert_eq!(name, "FOOBAR");
            assert_eq!((first_value, second_value), (1, 2));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

// Sentinel skip
#[test]
fn test_num_sentinel_never_emitted() {
    let generated = generate(&["#define EM_A 1", "#define EM_NUM 2", "EM_num = 3,"], false).unwrap();
    assert_eq!(generated.text, "A = 0x1,\n");
}

// Suffix stripping
#[test]
fn test_suffix_stripping() {
    let generated = generate(&["#define EM_BIT 1U << 3L"], false).unwrap();
    assert_eq!(generated.records[0].value, 8);
}

// Empty comments produce no doc line and do not count as comments
#[test]
fn test_empty_comment_renders_bare() {
    let generated = generate(&["#define EM_A 1 /**/"], false).unwrap();
    assert_eq!(generated.text, "A = 0x1,\n");

    let generated = generate(&["#define EM_A 1 /**/", "#define EM_B 1"], false).unwrap();
    assert_eq!(generated.records[0].comment, None);
}

// Pathologically nested expressions fail cleanly instead of overflowing
#[test]
fn test_deeply_nested_definition_aborts() {
    let line = format!("#define EM_A {}1{}", "(".repeat(10_000), ")".repeat(10_000));
    let err = generate(&[line.as_str()], false).unwrap_err();
    assert!(matches!(err, ConstgenError::MalformedExpression { .. }));
}

// Bitflag mode: per-name constants, no grouping
#[test]
fn test_bitflags_output() {
    let lines = [
        "#define PF_X		(1 << 0)	/* Segment is executable */",
        "#define PF_W		(1 << 1)	/* Segment is writable */",
        "#define PF_R		(1 << 2)	/* Segment is readable */",
        "#define PF_MASKOS	0x0ff00000	/* OS-specific */",
        "#define PF_MIPS_LOCAL	0x10000000",
        "#define PF_ARM_SB	0x10000000	/* Segment contains the location",
        "					   addressed by the static base. */",
    ];
    let generated = Constgen::new("PF").bitflags(true).generate(lines).unwrap();
    let expected = "\
/// Segment is executable
const X = 0x1;
/// Segment is writable
const W = 0x2;
/// Segment is readable
const R = 0x4;
/// OS-specific
const MASKOS = 0xff00000;
const MIPS_LOCAL = 0x10000000;
const ARM_SB = 0x10000000;
";
    assert_eq!(generated.text, expected);
}

// Legacy names resolve references but never reach the output
#[test]
fn test_legacy_definitions_are_resolution_only() {
    let generated = generate(
        &[
            "#define OLD_EM_ALPHA 41",
            "#define EM_ALPHA_COMPAT (OLD_EM_ALPHA + 1)",
        ],
        false,
    )
    .unwrap();
    assert_eq!(generated.text, "AlphaCompat = 0x2a,\n");
}

// Failures abort the whole run
#[test]
fn test_unresolved_reference_aborts() {
    let err = generate(&["#define EM_A 1", "#define EM_B (EM_C + 1)"], false).unwrap_err();
    assert!(matches!(err, ConstgenError::UnresolvedReference { .. }));
    assert!(err.to_string().contains("EM_C"));
}

#[test]
fn test_malformed_expression_aborts() {
    let err = generate(&["#define EM_A ((Elf32_Half) 3)"], false).unwrap_err();
    assert!(matches!(err, ConstgenError::MalformedExpression { .. }));
}

#[test]
fn test_cycle_aborts() {
    let err = generate(&["#define EM_A (EM_B)", "#define EM_B (EM_A)"], false).unwrap_err();
    assert!(matches!(err, ConstgenError::CycleDetected { .. }));
}

// Corpus order across files decides first-seen semantics
#[test]
fn test_first_file_wins() {
    let root = setup_temp_corpus();
    write_file(&root.join("a.h"), "#define EM_DUP 1 /* from a */\n");
    write_file(&root.join("b.h"), "#define EM_DUP 2 /* from b */\n");

    let files = gather_header_files(&root, DEFAULT_EXTENSIONS, &[]).unwrap();
    let lines = read_corpus_lines(&files).unwrap();
    let generated = Constgen::new("EM").generate(&lines).unwrap();
    assert_eq!(generated.text, "/// from a\nDup = 0x1,\n");
}
