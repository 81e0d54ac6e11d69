//! End-to-End CLI Integration Tests
//!
//! Runs the generator from a parsed command line against files on disk.

use clap::Parser as ClapParser;
use genbuiltins::{run, Cli};
use integration_tests::{BUILDINFO_JSON, OBJECTS_YAML, STRINGS_YAML, USED_STRIDX_JSON, USER_YAML};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, text) in [
        ("buildinfo.json", BUILDINFO_JSON),
        ("strings.yaml", STRINGS_YAML),
        ("objects.yaml", OBJECTS_YAML),
        ("used.json", USED_STRIDX_JSON),
        ("user.yaml", USER_YAML),
        ("init.js", "Object.defineProperty(this, 'x', {value: 1});\n"),
    ] {
        fs::write(dir.path().join(name), text).unwrap();
    }
    dir
}

fn cli(dir: &Path, extra: &[&str]) -> Cli {
    let p = |name: &str| dir.join(name).display().to_string();
    let mut args = vec![
        "genbuiltins".to_string(),
        "--buildinfo".to_string(),
        p("buildinfo.json"),
        "--used-stridx-metadata".to_string(),
        p("used.json"),
        "--strings-metadata".to_string(),
        p("strings.yaml"),
        "--objects-metadata".to_string(),
        p("objects.yaml"),
        "--out-header".to_string(),
        p("out.h"),
        "--out-source".to_string(),
        p("out.c"),
        "--out-metadata-json".to_string(),
        p("out.json"),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::try_parse_from(args).unwrap()
}

/// Test: RAM-only build
#[test]
fn test_e2e_ram_only() {
    let dir = setup();
    run(&cli(dir.path(), &[])).unwrap();

    let header = fs::read_to_string(dir.path().join("out.h")).unwrap();
    assert!(header.contains("#define DUK_STRIDX_MATH 1  /* 'Math' */"));
    assert!(header.contains("#define DUK_BIDX_MATH 3"));
    assert!(header.contains("#define DUK_NUM_BUILTINS 4"));
    assert!(header.contains("DUK_INTERNAL_DECL const duk_c_function duk_bi_native_functions[3];"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out.json")).unwrap()).unwrap();
    assert_eq!(json["duk_version"], 20501);
    assert_eq!(json["duk_version_string"], "2.5.1");
    assert_eq!(json["builtin_strings"].as_array().unwrap().len(), 6);
}

/// Test: ROM build with user metadata, InitJS and dumps
#[test]
fn test_e2e_rom_full() {
    let dir = setup();
    let user = dir.path().join("user.yaml").display().to_string();
    let initjs = dir.path().join("init.js").display().to_string();
    let ram_dump = dir.path().join("ram_dump.json").display().to_string();
    let rom_dump = dir.path().join("rom_dump.json").display().to_string();
    run(&cli(
        dir.path(),
        &[
            "--rom-support",
            "--user-builtin-metadata",
            &user,
            "--initjs-data",
            &initjs,
            "--dev-dump-final-ram-metadata",
            &ram_dump,
            "--dev-dump-final-rom-metadata",
            &rom_dump,
        ],
    ))
    .unwrap();

    let header = fs::read_to_string(dir.path().join("out.h")).unwrap();
    assert!(header.contains("extern duk_ret_t user_greet(duk_context *ctx);"));
    assert!(header.contains("duk_rom_strings_stridx[6];"));
    let init_len = "Object.defineProperty(this, 'x', {value: 1});\n".len() + 1;
    assert!(header.contains(&format!("#define DUK_BUILTIN_INITJS_DATA_LENGTH {}", init_len)));

    let source = fs::read_to_string(dir.path().join("out.c")).unwrap();
    assert!(source.contains("duk_rom_strings"));
    assert!(source.contains("duk_builtins_data"));

    let rom: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&rom_dump).unwrap()).unwrap();
    assert_eq!(rom["target"], "rom");
}

/// Test: Invalid metadata fails before any output is written
#[test]
fn test_e2e_invalid_metadata() {
    let dir = setup();
    fs::write(dir.path().join("objects.yaml"), "objects: [").unwrap();
    assert!(run(&cli(dir.path(), &[])).is_err());
    assert!(!dir.path().join("out.h").exists());
    assert!(!dir.path().join("out.json").exists());
}
