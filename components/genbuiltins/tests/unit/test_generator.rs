//! Rendered header, source and summary

use crate::fixtures::Workspace;
use genbuiltins::{GeneratedOutputs, Generator, Inputs};

fn generate(ws: &Workspace, extra: &[&str]) -> GeneratedOutputs {
    let cli = ws.cli(extra);
    Generator::new(Inputs::read(&cli).unwrap())
        .with_rom_support(cli.rom_support)
        .with_dumps(
            cli.dev_dump_final_ram_metadata.is_some(),
            cli.dev_dump_final_rom_metadata.is_some(),
        )
        .generate()
        .unwrap()
}

/// Stridx defines come with heap and thread accessors
#[test]
fn test_header_stridx_defines() {
    let ws = Workspace::new();
    let out = generate(&ws, &[]);
    let header = &out.header;

    assert!(header.contains("#define DUK_STRIDX_OBJECT 0  /* 'Object' */"));
    assert!(header.contains("#define DUK_STRIDX_LENGTH 1  /* 'length' */"));
    assert!(header
        .contains("#define DUK_HEAP_STRING_LENGTH(heap) DUK_HEAP_GET_STRING((heap),DUK_STRIDX_LENGTH)"));
    assert!(header.contains(
        "#define DUK_HTHREAD_STRING_INT_VALUE(thr) DUK_HTHREAD_GET_STRING((thr),DUK_STRIDX_INT_VALUE)"
    ));
    assert!(header.contains("#define DUK_HEAP_NUM_STRINGS 5"));
    assert!(header.contains("#define DUK_STRIDX_START_RESERVED 3"));
    assert!(header.contains("#define DUK_STRIDX_START_STRICT_RESERVED 4"));
    assert!(header.contains("#define DUK_STRIDX_END_RESERVED 5  /* exclusive endpoint */"));
    assert!(!header.contains("DUK_STRIDX_NAME "));
}

/// Without ROM support the ROM branches are `#error` stubs
#[test]
fn test_rom_branches_stubbed() {
    let ws = Workspace::new();
    let out = generate(&ws, &[]);
    let stub = "#error ROM support not enabled, rerun genbuiltins with --rom-support";

    assert_eq!(out.source.matches(stub).count(), 2);
    assert_eq!(out.header.matches(stub).count(), 2);
    assert!(!out.source.contains("duk_rom_strings"));
    assert!(out.source.contains("duk_strings_data"));
    assert!(out.source.contains("duk_bi_native_functions"));
    assert!(out.header.starts_with("/*"));
    assert!(out.header.contains("#ifndef DUK_BUILTINS_H_INCLUDED"));
    assert!(out.header.trim_end().ends_with("#endif  /* DUK_BUILTINS_H_INCLUDED */"));
}

/// ROM support fills in both ROM branches
#[test]
fn test_rom_support_sections() {
    let ws = Workspace::new();
    let out = generate(&ws, &["--rom-support"]);

    assert!(!out.source.contains("rerun genbuiltins with --rom-support"));
    assert!(out.source.contains("duk_rom_strings"));
    assert!(out
        .source
        .contains("#error DUK_USE_ROM_OBJECTS requires DUK_USE_ROM_STRINGS"));
    assert!(out.header.contains("#if (DUK_USE_ROM_PTRCOMP_FIRST != 63488L)"));
    assert!(out
        .header
        .contains("DUK_INTERNAL_DECL const duk_hobject * const duk_rom_builtins_bidx[4];"));

    let rom_strings = out.header.find("#if defined(DUK_USE_ROM_STRINGS)").unwrap();
    let ram_strings = out.header.find("#else  /* DUK_USE_ROM_STRINGS */").unwrap();
    assert!(out.header[rom_strings..ram_strings].contains("#define DUK_HEAP_NUM_STRINGS"));
}

/// Native prototypes are listed once each
#[test]
fn test_native_declarations() {
    let ws = Workspace::new();
    let out = generate(&ws, &[]);
    let decl = "DUK_INTERNAL_DECL duk_ret_t duk_bi_object_constructor(duk_context *ctx);";
    assert_eq!(out.header.matches(decl).count(), 1);
    assert!(out
        .header
        .contains("DUK_INTERNAL_DECL duk_ret_t duk_bi_object_prototype_to_string(duk_context *ctx);"));
}

/// User natives outside the runtime namespace are declared extern
#[test]
fn test_user_native_declared_extern() {
    let ws = Workspace::new();
    ws.write(
        "user.yaml",
        r#"
objects:
  - id: bi_global
    modify: true
    properties:
      - key: hello
        value: { type: function, native: my_hello, length: 0 }
"#,
    );
    let user = ws.path("user.yaml").display().to_string();
    let out = generate(&ws, &["--user-builtin-metadata", &user]);
    assert!(out.header.contains("extern duk_ret_t my_hello(duk_context *ctx);"));
}

/// InitJS data is NUL terminated and sized in the header
#[test]
fn test_initjs_embedded() {
    let ws = Workspace::new();
    ws.write("init.js", "x=1;");
    let initjs = ws.path("init.js").display().to_string();
    let out = generate(&ws, &["--initjs-data", &initjs]);
    assert!(out.header.contains("#define DUK_BUILTIN_INITJS_DATA_LENGTH 5"));
    assert!(out.source.contains("duk_initjs_data"));
}

/// Summary is sorted, indented by four and ASCII only
#[test]
fn test_metadata_json() {
    let ws = Workspace::new();
    let out = generate(&ws, &[]);
    let json = &out.metadata_json;

    assert!(json.is_ascii());
    assert!(json.contains("\\u00ffValue"));
    assert!(json.contains("\n    \"builtin_strings\": ["));
    let keys = [
        "\"builtin_strings\"",
        "\"builtin_strings_base64\"",
        "\"builtin_strings_info\"",
        "\"comment\"",
        "\"duk_version\"",
        "\"duk_version_string\"",
        "\"git_describe\"",
    ];
    let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let value: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(value["duk_version_string"], "2.2.0");
    assert_eq!(value["git_describe"], "v2.2.0-test");
    assert_eq!(value["builtin_strings"][1], "length");
    assert_eq!(value["builtin_strings_base64"][1], "bGVuZ3Ro");
    assert_eq!(value["builtin_strings_info"][2]["define"], "DUK_STRIDX_INT_VALUE");
    assert_eq!(value["builtin_strings_info"][2]["plain"], "\u{ff}Value");
}

/// Dumps are only rendered on request
#[test]
fn test_dumps_on_request() {
    let ws = Workspace::new();
    assert!(generate(&ws, &[]).ram_dump.is_none());

    let ram = ws.path("ram.json").display().to_string();
    let out = generate(&ws, &["--dev-dump-final-ram-metadata", &ram]);
    let dump: serde_json::Value = serde_json::from_str(out.ram_dump.as_deref().unwrap()).unwrap();
    assert!(dump["objects"].is_array());
    assert!(out.rom_dump.is_none());
}
