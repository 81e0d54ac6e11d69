//! Stridx layout of the loaded fixture strings

use crate::fixtures::loader_with;
use builtin_meta::{latin1, Target};

fn stridx_order(target: Target) -> Vec<String> {
    loader_with(&[])
        .load(target)
        .unwrap()
        .stridx_strings()
        .map(|s| latin1::to_text(&s.bytes))
        .collect()
}

/// Narrow-index strings first, plain strings next, reserved words last
#[test]
fn test_category_order() {
    assert_eq!(
        stridx_order(Target::Ram),
        vec!["Object", "length", "\u{ff}Value", "break", "case", "let"]
    );
}

/// Loading the same documents twice yields the same order
#[test]
fn test_layout_is_stable() {
    assert_eq!(stridx_order(Target::Ram), stridx_order(Target::Ram));
    assert_eq!(stridx_order(Target::Ram), stridx_order(Target::Rom));
}

/// Reserved word range follows the keyword block
#[test]
fn test_reserved_range() {
    let graph = loader_with(&[]).load(Target::Ram).unwrap();
    let range = graph.reserved_range();
    assert_eq!(range.start, 3);
    assert_eq!(range.strict_start, 5);
    assert_eq!(range.end, 6);
}

/// Define names come from the special map or the camel case split
#[test]
fn test_define_names() {
    let graph = loader_with(&[]).load(Target::Ram).unwrap();
    let defines: Vec<_> = graph
        .stridx_strings()
        .map(|s| s.define.clone().unwrap())
        .collect();
    assert_eq!(
        defines,
        vec![
            "DUK_STRIDX_OBJECT",
            "DUK_STRIDX_LENGTH",
            "DUK_STRIDX_INT_VALUE",
            "DUK_STRIDX_BREAK",
            "DUK_STRIDX_CASE",
            "DUK_STRIDX_LET"
        ]
    );
}
