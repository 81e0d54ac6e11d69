//! Input files written to a temporary directory

use clap::Parser as ClapParser;
use genbuiltins::Cli;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const BUILDINFO: &str = r#"{"version": 20200, "git_describe": "v2.2.0-test"}"#;

pub const USED_STRIDX: &str = r#"{
    "used_stridx_defines": ["DUK_STRIDX_LENGTH", "DUK_STRIDX_OBJECT", "DUK_STRIDX_INT_VALUE"]
}"#;

pub const STRINGS: &str = r#"
strings:
  - str: "Object"
    class_name: true
  - str: "length"
  - str: "name"
  - str: "ÿValue"
  - str: "break"
    reserved_word: true
  - str: "let"
    reserved_word: true
    future_reserved_word_strict: true
special_define_names:
  "ÿValue": "INT_VALUE"
reserved_word_token_order:
  - "break"
  - "let"
"#;

pub const OBJECTS: &str = r#"
objects:
  - id: bi_global
    class: global
    internal_prototype: bi_object_prototype
    properties:
      - key: Object
        value: { type: object, id: bi_object_constructor }
  - id: bi_object_constructor
    class: Function
    internal_prototype: bi_function_prototype
    native: duk_bi_object_constructor
    callable: true
    constructable: true
    properties:
      - key: length
        value: 1
        attributes: ""
      - key: name
        value: "Object"
        attributes: ""
      - key: prototype
        value: { type: object, id: bi_object_prototype }
        attributes: ""
  - id: bi_object_prototype
    class: Object
    properties:
      - key: constructor
        value: { type: object, id: bi_object_constructor }
      - key: toString
        value: { type: function, native: duk_bi_object_prototype_to_string, length: 0 }
  - id: bi_function_prototype
    class: Function
    internal_prototype: bi_object_prototype
    native: duk_bi_function_prototype
    callable: true
    nargs: 0
    properties:
      - key: length
        value: 0
        attributes: ""
      - key: name
        value: ""
        attributes: "w"
builtins:
  - id: bi_global
  - id: bi_object_constructor
  - id: bi_object_prototype
  - id: bi_function_prototype
"#;

/// Temporary directory holding a complete input set
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let ws = Workspace {
            dir: TempDir::new().unwrap(),
        };
        ws.write("buildinfo.json", BUILDINFO);
        ws.write("used_stridx.json", USED_STRIDX);
        ws.write("strings.yaml", STRINGS);
        ws.write("objects.yaml", OBJECTS);
        ws
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, text: &str) {
        fs::write(self.path(name), text).unwrap();
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).unwrap()
    }

    /// Command line with every required option plus `extra`
    pub fn args(&self, extra: &[&str]) -> Vec<String> {
        let p = |name: &str| self.path(name).display().to_string();
        let mut args = vec![
            "genbuiltins".to_string(),
            "--buildinfo".to_string(),
            p("buildinfo.json"),
            "--used-stridx-metadata".to_string(),
            p("used_stridx.json"),
            "--strings-metadata".to_string(),
            p("strings.yaml"),
            "--objects-metadata".to_string(),
            p("objects.yaml"),
            "--out-header".to_string(),
            p("duk_builtins.h"),
            "--out-source".to_string(),
            p("duk_builtins.c"),
            "--out-metadata-json".to_string(),
            p("genbuiltins_metadata.json"),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        args
    }

    pub fn cli(&self, extra: &[&str]) -> Cli {
        Cli::try_parse_from(self.args(extra)).unwrap()
    }
}
