//! Bit-packed object stream

use crate::fixtures::{data_property, native_function, ram_graph, single_object_graph};
use builtin_meta::{Attributes, ObjectClass, ObjectEntry, PropertyEntry, PropertyValue};
use gen_support::BitDecoder;
use ram_encoder::objects::*;
use ram_encoder::{encode_objects, ByteOrder, EncodeError, PropType, RamEncoder, RamLayout};

/// Skip the header and refs of a lone non-function object without length
fn skip_to_first_value(dec: &mut BitDecoder<'_>) {
    dec.bits(CLASS_BITS + 1).unwrap();
    dec.bits(3 * BIDX_BITS).unwrap();
    assert_eq!(dec.bits(NUM_NORMAL_PROPS_BITS).unwrap(), 1);
}

/// Top level list skips inline natives and keeps bidx order
#[test]
fn test_layout_top_level() {
    let graph = ram_graph();
    let layout = RamLayout::new(&graph);
    let ids: Vec<_> = layout.top_level(&graph).map(|o| o.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "bi_global",
            "bi_object_constructor",
            "bi_object_prototype",
            "bi_function_prototype"
        ]
    );
    assert_eq!(layout.ramidx_of("bi_object_prototype"), Some(2));
    assert_eq!(
        layout.natives(),
        &[
            "duk_bi_function_prototype".to_string(),
            "duk_bi_object_constructor".to_string(),
            "duk_bi_object_prototype_to_string".to_string(),
        ]
    );
}

/// Pass one creates each object with its class and function data
#[test]
fn test_pass_one_headers() {
    let graph = ram_graph();
    let layout = RamLayout::new(&graph);
    let (data, stats) = encode_objects(&graph, &layout, ByteOrder::Little).unwrap();
    assert_eq!(stats.objects, 4);
    let mut dec = BitDecoder::new(&data);

    // bi_global
    assert_eq!(dec.bits(CLASS_BITS).unwrap(), ObjectClass::Global.number());
    assert!(!dec.flag().unwrap());

    // bi_object_constructor
    assert_eq!(dec.bits(CLASS_BITS).unwrap(), ObjectClass::Function.number());
    assert!(dec.flag().unwrap());
    assert_eq!(dec.bits(LENGTH_PROP_BITS).unwrap(), 1);
    assert_eq!(dec.bits(NATIDX_BITS).unwrap(), 1);
    assert!(!dec.flag().unwrap(), "nargs equals length");
    assert!(!dec.flag().unwrap(), "name has a stridx");
    assert_eq!(
        dec.bits(STRIDX_BITS).unwrap() as usize,
        graph.stridx_of(b"Object").unwrap()
    );
    assert!(dec.flag().unwrap(), "constructable");
    assert!(!dec.flag().unwrap(), "no magic");

    // bi_object_prototype
    assert_eq!(dec.bits(CLASS_BITS).unwrap(), ObjectClass::Object.number());
    assert!(!dec.flag().unwrap());

    // bi_function_prototype, empty name is a literal
    assert_eq!(dec.bits(CLASS_BITS).unwrap(), ObjectClass::Function.number());
    assert!(dec.flag().unwrap());
    assert_eq!(dec.bits(LENGTH_PROP_BITS).unwrap(), 0);
    assert_eq!(dec.bits(NATIDX_BITS).unwrap(), 0);
    assert!(!dec.flag().unwrap());
    assert!(dec.flag().unwrap());
    assert_eq!(dec.bits(STRING_LENGTH_BITS).unwrap(), 0);
    assert!(!dec.flag().unwrap());
    assert!(!dec.flag().unwrap());

    // pass two, bi_global
    assert_eq!(dec.bits(BIDX_BITS).unwrap(), 2);
    assert_eq!(dec.bits(BIDX_BITS).unwrap(), NO_BIDX_MARKER);
    assert_eq!(dec.bits(BIDX_BITS).unwrap(), NO_BIDX_MARKER);
    assert_eq!(dec.bits(NUM_NORMAL_PROPS_BITS).unwrap(), 1);
    assert!(!dec.flag().unwrap());
    assert_eq!(
        dec.bits(STRIDX_BITS).unwrap() as usize,
        graph.stridx_of(b"Object").unwrap()
    );
    assert!(!dec.flag().unwrap(), "default attributes");
    assert_eq!(dec.bits(PROP_TYPE_BITS).unwrap(), PropType::Builtin as u32);
    assert_eq!(dec.bits(BIDX_BITS).unwrap(), 1);
    assert_eq!(dec.bits(NUM_FUNC_PROPS_BITS).unwrap(), 0);
}

/// Inline natives are written as function properties
#[test]
fn test_function_property_counts() {
    let graph = ram_graph();
    let data = RamEncoder::new(&graph).encode().unwrap();
    assert_eq!(data.objects.len(), 3);
    assert_eq!(data.top_level_count, 4);
    let (_, stats) = encode_objects(&graph, &RamLayout::new(&graph), ByteOrder::Big).unwrap();
    assert_eq!(stats.function_props, 1);
    // global.Object only; prototype and constructor are encoded as refs
    assert_eq!(stats.normal_props, 1);
}

/// Byte order only changes the embedded doubles
#[test]
fn test_double_payload_byte_order() {
    let mut o = ObjectEntry::new("bi_math", ObjectClass::Math);
    o.properties
        .push(data_property("x", PropertyValue::from_integer(1)));
    let graph = single_object_graph(o);
    let layout = RamLayout::new(&graph);

    let payload = |order| {
        let (data, _) = encode_objects(&graph, &layout, order).unwrap();
        let mut dec = BitDecoder::new(&data);
        skip_to_first_value(&mut dec);
        assert!(dec.flag().unwrap(), "key is a literal");
        assert_eq!(dec.bits(STRING_LENGTH_BITS).unwrap(), 1);
        assert_eq!(dec.bits(STRING_CHAR_BITS).unwrap(), u32::from(b'x'));
        assert!(!dec.flag().unwrap());
        assert_eq!(dec.bits(PROP_TYPE_BITS).unwrap(), PropType::Double as u32);
        dec.bytes(8).unwrap()
    };
    let be = 1.0f64.to_be_bytes().to_vec();
    assert_eq!(payload(ByteOrder::Big), be);
    assert_eq!(payload(ByteOrder::Little), 1.0f64.to_le_bytes().to_vec());
    assert_eq!(
        payload(ByteOrder::Mixed),
        vec![be[3], be[2], be[1], be[0], be[7], be[6], be[5], be[4]]
    );
}

/// Null has no RAM encoding and becomes undefined
#[test]
fn test_null_written_as_undefined() {
    let mut o = ObjectEntry::new("bi_thing", ObjectClass::Object);
    let mut p = data_property("n", PropertyValue::Null);
    p.attributes = Attributes::parse("w").unwrap();
    o.properties.push(p);
    let graph = single_object_graph(o);
    let (data, _) = encode_objects(&graph, &RamLayout::new(&graph), ByteOrder::Little).unwrap();

    let mut dec = BitDecoder::new(&data);
    skip_to_first_value(&mut dec);
    dec.bits(1 + STRING_LENGTH_BITS + STRING_CHAR_BITS).unwrap();
    assert!(dec.flag().unwrap(), "custom attributes");
    assert_eq!(dec.bits(PROP_FLAGS_BITS).unwrap(), 1);
    assert_eq!(dec.bits(PROP_TYPE_BITS).unwrap(), PropType::Undefined as u32);
}

/// Only arrays may carry a non-default length attribute
#[test]
fn test_length_attributes_checked() {
    let mut o = ObjectEntry::new("bi_thing", ObjectClass::Object);
    o.properties.push(PropertyEntry::new(
        "length",
        PropertyValue::from_integer(0),
        Attributes::parse("w").unwrap(),
    ));
    let graph = single_object_graph(o.clone());
    let err = encode_objects(&graph, &RamLayout::new(&graph), ByteOrder::Little).unwrap_err();
    assert!(matches!(err, EncodeError::UnexpectedAttributes { .. }));

    o.class = ObjectClass::Array;
    let graph = single_object_graph(o);
    assert!(encode_objects(&graph, &RamLayout::new(&graph), ByteOrder::Little).is_ok());
}

/// Argument counts must stay below the varargs marker
#[test]
fn test_nargs_overflow() {
    let mut f = native_function("bi_f", "duk_bi_f", 0);
    f.nargs = Some(9);
    let graph = single_object_graph(f);
    let err = encode_objects(&graph, &RamLayout::new(&graph), ByteOrder::Little).unwrap_err();
    assert!(matches!(err, EncodeError::CapacityOverflow { value: 9, .. }));
}

/// Varargs functions carry the marker regardless of nargs
#[test]
fn test_varargs_marker() {
    let mut f = native_function("bi_f", "duk_bi_f", 2);
    f.varargs = true;
    let graph = single_object_graph(f);
    let (data, _) = encode_objects(&graph, &RamLayout::new(&graph), ByteOrder::Little).unwrap();
    let mut dec = BitDecoder::new(&data);
    dec.bits(CLASS_BITS + 1 + LENGTH_PROP_BITS + NATIDX_BITS)
        .unwrap();
    assert!(dec.flag().unwrap());
    assert_eq!(dec.bits(NARGS_BITS).unwrap(), NARGS_VARARGS_MARKER);
}

/// Function objects must be callable
#[test]
fn test_uncallable_function_rejected() {
    let mut f = native_function("bi_f", "duk_bi_f", 0);
    f.callable = false;
    let graph = single_object_graph(f);
    let err = encode_objects(&graph, &RamLayout::new(&graph), ByteOrder::Little).unwrap_err();
    assert!(matches!(err, EncodeError::MalformedFunction { .. }));
}
