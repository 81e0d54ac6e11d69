//! Header and source sections for RAM init data

use crate::objects::ByteOrder;
use crate::strings::EncodedStrings;
use builtin_meta::FinalizedGraph;
use gen_support::{ArrayDecl, CSourceWriter};

/// Everything the RAM sections of the generated files need
#[derive(Debug, Clone)]
pub struct RamInitData {
    /// 5-bit string stream
    pub strings: EncodedStrings,
    /// Native function table, sorted
    pub natives: Vec<String>,
    /// Object stream per double byte order, in [`ByteOrder::ALL`] order
    pub objects: Vec<(ByteOrder, Vec<u8>)>,
    /// `DUK_BIDX_xxx` names in bidx order
    pub bidx_defines: Vec<String>,
    /// Number of RAM top level objects
    pub top_level_count: usize,
}

/// Emit `#if defined(X) ... #elif ... #else #error` over the byte orders
fn per_byte_order<F>(w: &mut CSourceWriter, objects: &[(ByteOrder, Vec<u8>)], mut body: F)
where
    F: FnMut(&mut CSourceWriter, &[u8]),
{
    for (i, (order, data)) in objects.iter().enumerate() {
        let kw = if i == 0 { "#if" } else { "#elif" };
        w.emit_line(format!("{} defined({})", kw, order.define()));
        body(w, data);
    }
    w.emit_line("#else");
    w.emit_line("#error invalid endianness defines");
    w.emit_line("#endif");
}

fn internal_decl(w: &mut CSourceWriter, decl: String) {
    w.emit_line("#if !defined(DUK_SINGLE_FILE)");
    w.emit_line(decl);
    w.emit_line("#endif  /* !DUK_SINGLE_FILE */");
}

impl RamInitData {
    /// `duk_strings_data` array
    pub fn emit_strings_source(&self, w: &mut CSourceWriter) {
        w.emit_array("duk_strings_data", &self.strings.data, ArrayDecl::default());
    }

    /// String data declaration and size defines
    pub fn emit_strings_header(&self, w: &mut CSourceWriter) {
        internal_decl(
            w,
            format!(
                "DUK_INTERNAL_DECL const duk_uint8_t duk_strings_data[{}];",
                self.strings.data.len()
            ),
        );
        w.emit_define("DUK_STRDATA_MAX_STRLEN", self.strings.max_len);
        w.emit_define("DUK_STRDATA_DATA_LENGTH", self.strings.data.len());
    }

    /// Native function table
    pub fn emit_natives_source(&self, w: &mut CSourceWriter) {
        w.emit_line(format!("/* native functions: {} */", self.natives.len()));
        w.emit_line(format!(
            "DUK_INTERNAL const duk_c_function duk_bi_native_functions[{}] = {{",
            self.natives.len()
        ));
        for name in &self.natives {
            w.emit_line(format!("\t{},", name));
        }
        w.emit_line("};");
    }

    /// Native function table declaration
    pub fn emit_natives_header(&self, w: &mut CSourceWriter) {
        internal_decl(
            w,
            format!(
                "DUK_INTERNAL_DECL const duk_c_function duk_bi_native_functions[{}];",
                self.natives.len()
            ),
        );
    }

    /// `duk_builtins_data`, one variant per byte order
    pub fn emit_objects_source(&self, w: &mut CSourceWriter) {
        per_byte_order(w, &self.objects, |w, data| {
            w.emit_array("duk_builtins_data", data, ArrayDecl::default());
        });
    }

    /// Bidx defines and object counts
    pub fn emit_bidx_header(&self, w: &mut CSourceWriter) {
        for (i, define) in self.bidx_defines.iter().enumerate() {
            w.emit_define(define, i);
        }
        w.emit_define("DUK_NUM_BUILTINS", self.bidx_defines.len());
        w.emit_define("DUK_NUM_BIDX_BUILTINS", self.bidx_defines.len());
        w.emit_define("DUK_NUM_ALL_BUILTINS", self.top_level_count);
    }

    /// Object data declaration and size define, one variant per byte order
    pub fn emit_objects_header(&self, w: &mut CSourceWriter) {
        per_byte_order(w, &self.objects, |w, data| {
            internal_decl(
                w,
                format!(
                    "DUK_INTERNAL_DECL const duk_uint8_t duk_builtins_data[{}];",
                    data.len()
                ),
            );
            w.emit_define("DUK_BUILTINS_DATA_LENGTH", data.len());
        });
    }
}

/// `duk_initjs_data` array
pub fn emit_initjs_source(w: &mut CSourceWriter, initjs: &[u8]) {
    w.emit_line("#if defined(DUK_USE_BUILTIN_INITJS)");
    w.emit_array("duk_initjs_data", initjs, ArrayDecl::default());
    w.emit_line("#endif  /* DUK_USE_BUILTIN_INITJS */");
}

/// InitJS declaration and length define
pub fn emit_initjs_header(w: &mut CSourceWriter, initjs: &[u8]) {
    w.emit_line("#if defined(DUK_USE_BUILTIN_INITJS)");
    internal_decl(
        w,
        format!(
            "DUK_INTERNAL_DECL const duk_uint8_t duk_initjs_data[{}];",
            initjs.len()
        ),
    );
    w.emit_define("DUK_BUILTIN_INITJS_DATA_LENGTH", initjs.len());
    w.emit_line("#endif  /* DUK_USE_BUILTIN_INITJS */");
}

/// Bidx define names of a graph, in bidx order
pub fn bidx_defines(graph: &FinalizedGraph) -> Vec<String> {
    graph.bidx_objects().iter().map(|o| o.bidx_define()).collect()
}
