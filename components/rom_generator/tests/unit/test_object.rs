//! Object records, property tables and pointer compression

use crate::fixtures::{rom_graph, rom_source, str_symbol};
use builtin_meta::{
    Attributes, FinalizedGraph, ObjectClass, ObjectEntry, PropertyEntry, PropertyValue, Target,
};
use gen_support::CSourceWriter;
use rom_generator::{RomError, RomGenerator, ROMPTR_FIRST};

fn obj_symbol(graph: &FinalizedGraph, id: &str) -> String {
    format!("duk_obj_{}", graph.object_position(id).unwrap())
}

/// Functions, arrays and plain objects use their own record types
#[test]
fn test_record_kinds() {
    let graph = rom_graph();
    let source = rom_source(&graph);

    let ctor = obj_symbol(&graph, "bi_object_constructor");
    assert!(source.contains(&format!("DUK_EXTERNAL_DECL const duk_romfun {};", ctor)));
    let line = source
        .lines()
        .find(|l| l.starts_with(&format!("DUK_EXTERNAL const duk_romfun {} = ", ctor)))
        .unwrap();
    assert!(line.contains("DUK_HOBJECT_FLAG_NATFUNC|DUK_HOBJECT_FLAG_STRICT|DUK_HOBJECT_FLAG_NEWENV|DUK_HOBJECT_FLAG_CONSTRUCTABLE"));
    assert!(line.ends_with(",duk_bi_object_constructor,1,0);"));

    let arr = obj_symbol(&graph, "bi_array_prototype");
    let line = source
        .lines()
        .find(|l| l.starts_with(&format!("DUK_EXTERNAL const duk_romarr {} = DUK__ROMARR_INIT(", arr)))
        .unwrap();
    assert!(line.contains("DUK_HOBJECT_FLAG_EXOTIC_ARRAY|DUK_HOBJECT_CLASS_AS_FLAGS(2)"));

    let global = obj_symbol(&graph, "bi_global");
    let proto = obj_symbol(&graph, "bi_object_prototype");
    let line = source
        .lines()
        .find(|l| l.starts_with(&format!("DUK_EXTERNAL const duk_romobj {} = DUK__ROMOBJ_INIT(", global)))
        .unwrap();
    assert!(line.contains(&format!(
        "DUK_HOBJECT_CLASS_AS_FLAGS({}),1,&duk_prop_0,",
        ObjectClass::Global.number()
    )));
    assert!(line.contains(&format!(",&{},", proto)));
    assert!(line.ends_with(",1,1,0,0);"));
}

/// Layout 1 puts keys first, layouts 2 and 3 values first
#[test]
fn test_property_table_layouts() {
    let graph = rom_graph();
    let source = rom_source(&graph);
    let key = format!("(const duk_hstring *)&{}", str_symbol(&graph, b"Object"));
    let value = format!(
        "DUK__TVAL_OBJECT(&{})",
        obj_symbol(&graph, "bi_object_constructor")
    );
    let layout1 = format!(
        "DUK_EXTERNAL const duk_romprops_0 duk_prop_0 = {{{},{},DUK_PROPDESC_FLAGS_W}};",
        key, value
    );
    let layout2 = format!(
        "DUK_EXTERNAL const duk_romprops_0 duk_prop_0 = {{{},{},DUK_PROPDESC_FLAGS_W}};",
        value, key
    );
    assert_eq!(source.matches(&layout1).count(), 1);
    assert_eq!(source.matches(&layout2).count(), 2);
    assert_eq!(source.matches("typedef struct duk_romprops_0 ").count(), 3);
    assert!(source.contains("#error invalid object layout"));
}

/// Accessor, number and boolean values
#[test]
fn test_value_initializers() {
    let graph = rom_graph();
    let source = rom_source(&graph);
    let proto = graph.object("bi_object_prototype").unwrap();
    let PropertyValue::Accessor { getter, setter } = &proto.property(b"__proto__").unwrap().value
    else {
        panic!("expected accessor");
    };
    let accessor = format!(
        "{{ (const duk_hobject *) &{}, (const duk_hobject *) &{} }}",
        obj_symbol(&graph, getter.as_deref().unwrap()),
        obj_symbol(&graph, setter.as_deref().unwrap())
    );
    assert!(source.contains(&accessor));
    assert!(source.contains("DUK_PROPDESC_FLAGS_NONE|DUK_PROPDESC_FLAG_ACCESSOR"));
    assert!(source.contains("DUK__TVAL_NUMBER(DUK__DBLBYTES(64,69,0,0,0,0,0,0))"));
    assert!(source.contains("DUK__TVAL_BOOLEAN(1)"));
    assert!(source.contains("duk_rom_tval_accessor val0; "));
}

/// Strings by content, objects by id, then property tables
#[test]
fn test_compressed_pointer_order() {
    let graph = rom_graph();
    let source = rom_source(&graph);
    let start = source
        .find("DUK_EXTERNAL const void * const duk_rom_compressed_pointers[")
        .unwrap();
    let entries: Vec<&str> = source[start..]
        .lines()
        .skip(1)
        .take_while(|l| *l != "\tNULL")
        .collect();

    let tables = graph
        .objects()
        .iter()
        .filter(|o| !o.properties.is_empty())
        .count();
    assert_eq!(entries.len(), graph.strings().len() + graph.objects().len() + tables);

    let smallest = graph.strings().iter().map(|s| &s.bytes).min().unwrap();
    assert_eq!(
        entries[0],
        format!(
            "\t(const void *) &{},  /* 0x{:04x} */",
            str_symbol(&graph, smallest),
            ROMPTR_FIRST
        )
    );
    let mut ids: Vec<&str> = graph.objects().iter().map(|o| o.id.as_str()).collect();
    ids.sort();
    assert!(entries[graph.strings().len()].contains(&format!("&{},", obj_symbol(&graph, ids[0]))));
    assert!(entries[entries.len() - 1].contains("&duk_prop_"));
    assert!(source.contains(&format!(
        "duk_rom_compressed_pointers[{}] = {{",
        entries.len() + 1
    )));
}

/// Bidx table, helper undefs and the header
#[test]
fn test_bidx_table_and_header() {
    let graph = rom_graph();
    let source = rom_source(&graph);
    assert!(source.contains(&format!(
        "DUK_INTERNAL const duk_hobject * const duk_rom_builtins_bidx[4] = {{\n\t(const duk_hobject *) &{},\n",
        obj_symbol(&graph, "bi_global")
    )));
    assert!(source.ends_with("#undef DUK__ROMARR_INIT\n#undef DUK__ROMFUN_INIT\n"));

    let mut w = CSourceWriter::new();
    RomGenerator::new(&graph).emit_objects_header(&mut w);
    let header = w.into_string();
    assert!(header.starts_with("#define DUK_BIDX_GLOBAL 0\n"));
    assert!(header.contains("#define DUK_BIDX_ARRAY_PROTOTYPE 3\n"));
    assert!(header.contains("#define DUK_NUM_BIDX_BUILTINS 4\n"));
    assert!(header.contains(&format!(
        "#define DUK_NUM_ALL_BUILTINS {}\n",
        graph.objects().len()
    )));
    assert!(header.contains("DUK_INTERNAL_DECL const duk_hobject * const duk_rom_builtins_bidx[4];"));
}

/// Keys without a string record are an error
#[test]
fn test_missing_key_string() {
    let mut o = ObjectEntry::new("bi_thing", ObjectClass::Object);
    o.bidx_used = true;
    o.properties.push(PropertyEntry::new(
        "nokey",
        PropertyValue::Undefined,
        Attributes::NONE,
    ));
    let graph = FinalizedGraph::new(Target::Rom, vec![o], Vec::new(), Vec::new()).unwrap();
    let mut w = CSourceWriter::new();
    let err = RomGenerator::new(&graph).emit_source(&mut w).unwrap_err();
    assert!(matches!(err, RomError::MissingString { string, .. } if string == "nokey"));
}
