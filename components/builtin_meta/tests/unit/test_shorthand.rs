//! Shorthand expansion through the full load pipeline

use crate::fixtures::loader_with;
use builtin_meta::{ObjectClass, PropertyValue, Target};

/// An inline function with length 2 and no nargs gets nargs 2, a length
/// property of 2 and a name equal to the property key
#[test]
fn test_inline_function_expansion() {
    let graph = loader_with(&[r#"
objects:
  - id: bi_object_prototype
    modify: true
    properties:
      - key: frob
        value: { type: function, native: duk_bi_frob, length: 2 }
"#])
    .load(Target::Ram)
    .unwrap();

    let proto = graph.object("bi_object_prototype").unwrap();
    let target = match &proto.property(b"frob").unwrap().value {
        PropertyValue::Object(id) => id.clone(),
        other => panic!("unexpected value {:?}", other),
    };
    let func = graph.object(&target).unwrap();
    assert!(func.synthetic);
    assert_eq!(func.class, ObjectClass::Function);
    assert_eq!(func.nargs, Some(2));
    assert_eq!(func.native.as_deref(), Some("duk_bi_frob"));
    assert_eq!(
        func.internal_prototype.as_deref(),
        Some("bi_function_prototype")
    );
    assert_eq!(
        func.property(b"length").unwrap().value,
        PropertyValue::from_integer(2)
    );
    assert_eq!(
        func.property(b"name").unwrap().value,
        PropertyValue::String(b"frob".to_vec())
    );
}

/// Accessor shorthand produces two functions and carries the accessor flag
#[test]
fn test_accessor_shorthand_gets_accessor_flag() {
    let graph = loader_with(&[r#"
objects:
  - id: bi_object_prototype
    modify: true
    properties:
      - key: __proto__
        value:
          type: accessor
          getter: duk_bi_proto_getter
          setter: duk_bi_proto_setter
        attributes: "c"
"#])
    .load(Target::Ram)
    .unwrap();

    let prop = graph
        .object("bi_object_prototype")
        .unwrap()
        .property(b"__proto__")
        .unwrap();
    assert_eq!(prop.attributes.canonical(), "ca");
    let PropertyValue::Accessor { getter, setter } = &prop.value else {
        panic!("expected accessor, got {:?}", prop.value);
    };
    let getter = graph.object(getter.as_deref().unwrap()).unwrap();
    let setter = graph.object(setter.as_deref().unwrap()).unwrap();
    assert_eq!(getter.nargs, Some(0));
    assert_eq!(setter.nargs, Some(1));
    assert!(getter.property(b"length").is_none());
}

/// Date.prototype.toGMTString is a separate property cloned from toUTCString
#[test]
fn test_to_gmt_string_is_cloned() {
    let graph = loader_with(&[r#"
objects:
  - id: bi_date_prototype
    class: Date
    properties:
      - key: toGMTString
        value: { type: object, id: bi_object_prototype }
      - key: toUTCString
        value: { type: function, native: duk_bi_date_to_utc_string, length: 0 }
  - id: bi_global
    modify: true
    properties:
      - key: DatePrototype
        value: { type: object, id: bi_date_prototype }
"#])
    .load(Target::Ram)
    .unwrap();

    let date = graph.object("bi_date_prototype").unwrap();
    let keys: Vec<_> = date.properties.iter().map(|p| p.key.clone()).collect();
    assert_eq!(keys, vec![b"toUTCString".to_vec(), b"toGMTString".to_vec()]);
    assert_eq!(date.properties[0].value, date.properties[1].value);
}

/// Unsupported value kinds are rejected rather than coerced
#[test]
fn test_buffer_value_rejected() {
    let err = loader_with(&[r#"
objects:
  - id: bi_global
    modify: true
    properties:
      - key: buf
        value: { type: buffer }
"#])
    .load(Target::Ram)
    .unwrap_err();
    assert!(matches!(
        err,
        builtin_meta::MetadataError::UnsupportedValueShape { .. }
    ));
}
