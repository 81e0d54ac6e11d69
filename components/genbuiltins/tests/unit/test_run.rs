//! End to end runs writing real files

use crate::fixtures::Workspace;
use genbuiltins::{run, GenError};

/// Every output file is written
#[test]
fn test_run_writes_outputs() {
    let ws = Workspace::new();
    let ram = ws.path("ram.json").display().to_string();
    let rom = ws.path("rom.json").display().to_string();
    let cli = ws.cli(&[
        "--rom-support",
        "--dev-dump-final-ram-metadata",
        &ram,
        "--dev-dump-final-rom-metadata",
        &rom,
    ]);
    run(&cli).unwrap();

    assert!(ws.read("duk_builtins.h").contains("DUK_BUILTINS_H_INCLUDED"));
    assert!(ws.read("duk_builtins.c").contains("#include \"duk_internal.h\""));
    assert!(ws.read("genbuiltins_metadata.json").contains("Metadata for Duktape build"));
    assert!(ws.read("ram.json").contains("\"objects\""));
    assert!(ws.read("rom.json").contains("\"objects\""));
}

/// A failing load leaves no outputs behind
#[test]
fn test_run_failure_writes_nothing() {
    let ws = Workspace::new();
    ws.write("objects.yaml", "objects: []\nbuiltins:\n  - id: bi_missing\n");
    let err = run(&ws.cli(&[])).unwrap_err();

    assert!(matches!(err, GenError::Metadata(_)));
    assert!(!ws.path("duk_builtins.h").exists());
    assert!(!ws.path("duk_builtins.c").exists());
    assert!(!ws.path("genbuiltins_metadata.json").exists());
}

/// Missing input files report the path
#[test]
fn test_run_missing_input() {
    let ws = Workspace::new();
    std::fs::remove_file(ws.path("buildinfo.json")).unwrap();
    let err = run(&ws.cli(&[])).unwrap_err();
    match err {
        GenError::Io { path, .. } => assert!(path.ends_with("buildinfo.json")),
        other => panic!("unexpected error: {}", other),
    }
}
