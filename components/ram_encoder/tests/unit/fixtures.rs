//! Shared RAM fixtures

use builtin_meta::{
    Attributes, BaseDocument, FinalizedGraph, MetadataLoader, ObjectClass, ObjectEntry,
    PropertyEntry, PropertyValue, Target, UsedStridxDocument,
};

const STRINGS: &str = r#"
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

const OBJECTS: &str = r#"
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

/// RAM graph over the fixture documents
pub fn ram_graph() -> FinalizedGraph {
    let bases = vec![
        BaseDocument::from_yaml_str("strings.yaml", STRINGS).unwrap(),
        BaseDocument::from_yaml_str("objects.yaml", OBJECTS).unwrap(),
    ];
    let used = UsedStridxDocument::from_json_str(
        "used.json",
        r#"{"used_stridx_defines": ["DUK_STRIDX_LENGTH", "DUK_STRIDX_OBJECT", "DUK_STRIDX_INT_VALUE"]}"#,
    )
    .unwrap();
    MetadataLoader::new(bases)
        .with_used_stridx(used)
        .with_build_version(20200)
        .load(Target::Ram)
        .unwrap()
}

/// Graph with a single index-bearing object holding `properties`
pub fn single_object_graph(mut object: ObjectEntry) -> FinalizedGraph {
    object.bidx_used = true;
    FinalizedGraph::new(Target::Ram, vec![object], Vec::new(), Vec::new()).unwrap()
}

/// Plain data property with default attributes
pub fn data_property(key: &str, value: PropertyValue) -> PropertyEntry {
    PropertyEntry::new(key, value, Attributes::DATA_DEFAULT)
}

/// Index-bearing native function with `length` and `name`
pub fn native_function(id: &str, native: &str, length: i64) -> ObjectEntry {
    let mut f = ObjectEntry::new(id, ObjectClass::Function);
    f.native = Some(native.to_string());
    f.callable = true;
    f.properties.push(PropertyEntry::new(
        "length",
        PropertyValue::from_integer(length),
        Attributes::NONE,
    ));
    f.properties.push(PropertyEntry::new(
        "name",
        PropertyValue::String(b"f".to_vec()),
        Attributes::NONE,
    ));
    f
}
