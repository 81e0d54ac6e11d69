//! Generated C sections

use crate::fixtures::ram_graph;
use gen_support::CSourceWriter;
use ram_encoder::emit::{emit_initjs_header, emit_initjs_source};
use ram_encoder::RamEncoder;

fn render(f: impl FnOnce(&mut CSourceWriter)) -> String {
    let mut w = CSourceWriter::new();
    f(&mut w);
    w.into_string()
}

/// Native table lists every native in sorted order
#[test]
fn test_native_table() {
    let graph = ram_graph();
    let data = RamEncoder::new(&graph).encode().unwrap();
    let text = render(|w| data.emit_natives_source(w));
    assert_eq!(
        text,
        "/* native functions: 3 */\n\
         DUK_INTERNAL const duk_c_function duk_bi_native_functions[3] = {\n\
         \tduk_bi_function_prototype,\n\
         \tduk_bi_object_constructor,\n\
         \tduk_bi_object_prototype_to_string,\n\
         };\n"
    );
}

/// Bidx defines and counts
#[test]
fn test_bidx_header() {
    let graph = ram_graph();
    let data = RamEncoder::new(&graph).encode().unwrap();
    let text = render(|w| data.emit_bidx_header(w));
    assert!(text.starts_with("#define DUK_BIDX_GLOBAL 0\n#define DUK_BIDX_OBJECT_CONSTRUCTOR 1\n"));
    assert!(text.contains("#define DUK_NUM_BUILTINS 4\n"));
    assert!(text.contains("#define DUK_NUM_BIDX_BUILTINS 4\n"));
    assert!(text.contains("#define DUK_NUM_ALL_BUILTINS 4\n"));
}

/// One object data variant per byte order, with a fallback error
#[test]
fn test_objects_per_byte_order() {
    let graph = ram_graph();
    let data = RamEncoder::new(&graph).encode().unwrap();
    let text = render(|w| data.emit_objects_source(w));
    assert!(text.starts_with("#if defined(DUK_USE_DOUBLE_LE)\n"));
    assert!(text.contains("#elif defined(DUK_USE_DOUBLE_BE)\n"));
    assert!(text.contains("#elif defined(DUK_USE_DOUBLE_ME)\n"));
    assert!(text.ends_with("#else\n#error invalid endianness defines\n#endif\n"));
    assert_eq!(text.matches("duk_builtins_data[").count(), 3);

    let header = render(|w| data.emit_objects_header(w));
    assert_eq!(header.matches("#define DUK_BUILTINS_DATA_LENGTH").count(), 3);
    assert_eq!(header.matches("#if !defined(DUK_SINGLE_FILE)").count(), 3);
}

/// String data header carries the size defines
#[test]
fn test_strings_header() {
    let graph = ram_graph();
    let data = RamEncoder::new(&graph).encode().unwrap();
    let text = render(|w| data.emit_strings_header(w));
    let len = data.strings.data.len();
    assert_eq!(
        text,
        format!(
            "#if !defined(DUK_SINGLE_FILE)\n\
             DUK_INTERNAL_DECL const duk_uint8_t duk_strings_data[{len}];\n\
             #endif  /* !DUK_SINGLE_FILE */\n\
             #define DUK_STRDATA_MAX_STRLEN {}\n\
             #define DUK_STRDATA_DATA_LENGTH {len}\n",
            data.strings.max_len
        )
    );
}

/// InitJS sections are guarded by the config option
#[test]
fn test_initjs_sections() {
    let source = render(|w| emit_initjs_source(w, b"x;\0"));
    assert_eq!(
        source,
        "#if defined(DUK_USE_BUILTIN_INITJS)\n\
         DUK_INTERNAL const duk_uint8_t duk_initjs_data[3] = {\n\
         120,59,0,\n\
         };\n\
         #endif  /* DUK_USE_BUILTIN_INITJS */\n"
    );
    let header = render(|w| emit_initjs_header(w, b"x;\0"));
    assert!(header.contains("DUK_INTERNAL_DECL const duk_uint8_t duk_initjs_data[3];"));
    assert!(header.contains("#define DUK_BUILTIN_INITJS_DATA_LENGTH 3\n"));
}
