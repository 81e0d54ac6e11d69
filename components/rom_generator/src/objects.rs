//! Read-only object records and property tables

use crate::error::{RomError, Result};
use crate::macros::HELPER_MACROS;
use crate::ptrcomp::{PointerCompressor, ROMPTR_FIRST};
use crate::strings::StringSymbols;
use crate::values::{attribute_flags, value_initializer, ObjectSymbols};
use builtin_meta::{latin1, resolve_magic, FinalizedGraph, ObjectClass, ObjectEntry};
use gen_support::CSourceWriter;
use tracing::info;

/// Property table memory layouts supported by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyLayout {
    /// Keys, values, flags
    One,
    /// Values, keys, flags
    Two,
    /// Values, keys, flags; no array or hash part
    Three,
}

impl PropertyLayout {
    /// All layouts in emission order
    pub const ALL: [PropertyLayout; 3] = [PropertyLayout::One, PropertyLayout::Two, PropertyLayout::Three];

    /// Config define selecting the layout
    pub fn define(self) -> &'static str {
        match self {
            PropertyLayout::One => "DUK_USE_HOBJECT_LAYOUT_1",
            PropertyLayout::Two => "DUK_USE_HOBJECT_LAYOUT_2",
            PropertyLayout::Three => "DUK_USE_HOBJECT_LAYOUT_3",
        }
    }

    fn keys_first(self) -> bool {
        self == PropertyLayout::One
    }
}

/// Counts from one generation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RomObjectStats {
    /// Object records
    pub objects: usize,
    /// Property table entries
    pub properties: usize,
    /// Compressed pointers assigned
    pub compressed_pointers: usize,
}

/// Object record kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordKind {
    Function,
    Array,
    Object,
}

impl RecordKind {
    fn of(o: &ObjectEntry) -> Self {
        if o.callable {
            RecordKind::Function
        } else if o.class == ObjectClass::Array {
            RecordKind::Array
        } else {
            RecordKind::Object
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            RecordKind::Function => "duk_romfun",
            RecordKind::Array => "duk_romarr",
            RecordKind::Object => "duk_romobj",
        }
    }
}

/// Key, value and flag initializers of one property table
struct PropTable {
    keys: Vec<String>,
    value_types: Vec<&'static str>,
    values: Vec<String>,
    flags: Vec<String>,
}

impl PropTable {
    fn build(o: &ObjectEntry, strings: &StringSymbols, objects: &ObjectSymbols) -> Result<Self> {
        let mut table = PropTable {
            keys: Vec::new(),
            value_types: Vec::new(),
            values: Vec::new(),
            flags: Vec::new(),
        };
        for p in &o.properties {
            let key = strings.require(&p.key, || {
                format!("object {}, key {}", o.id, latin1::to_text(&p.key))
            })?;
            table.keys.push(format!("(const duk_hstring *)&{}", key));
            let init = value_initializer(&o.id, p, strings, objects)?;
            table.value_types.push(init.type_name);
            table.values.push(init.literal);
            table.flags.push(attribute_flags(&o.id, p)?);
        }
        Ok(table)
    }

    fn struct_decl(&self, index: usize, layout: PropertyLayout) -> String {
        let keys: Vec<String> = (0..self.keys.len())
            .map(|i| format!("const duk_hstring *key{}; ", i))
            .collect();
        let values: Vec<String> = self
            .value_types
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{} val{}; ", t, i))
            .collect();
        let flags: Vec<String> = (0..self.flags.len())
            .map(|i| format!("duk_uint8_t flags{}; ", i))
            .collect();
        let body = if layout.keys_first() {
            [keys, values, flags].concat()
        } else {
            [values, keys, flags].concat()
        };
        format!(
            "typedef struct duk_romprops_{idx} duk_romprops_{idx}; struct duk_romprops_{idx} {{ {}}};",
            body.concat(),
            idx = index
        )
    }

    fn initializer(&self, index: usize, layout: PropertyLayout) -> String {
        let list = if layout.keys_first() {
            [&self.keys[..], &self.values[..], &self.flags[..]].concat()
        } else {
            [&self.values[..], &self.keys[..], &self.flags[..]].concat()
        };
        format!(
            "DUK_EXTERNAL const duk_romprops_{idx} duk_prop_{idx} = {{{}}};",
            list.join(","),
            idx = index
        )
    }
}

fn emit_per_layout<F>(w: &mut CSourceWriter, mut body: F)
where
    F: FnMut(&mut CSourceWriter, PropertyLayout),
{
    for (i, layout) in PropertyLayout::ALL.iter().enumerate() {
        let kw = if i == 0 { "#if" } else { "#elif" };
        w.emit_line(format!("{} defined({})", kw, layout.define()));
        body(w, *layout);
    }
    w.emit_line("#else");
    w.emit_line("#error invalid object layout");
    w.emit_line("#endif");
    w.emit_line("");
}

fn object_flags(o: &ObjectEntry) -> String {
    let mut flags = vec![
        "DUK_HTYPE_OBJECT".to_string(),
        "DUK_HEAPHDR_FLAG_READONLY".to_string(),
    ];
    if o.callable {
        flags.push("DUK_HOBJECT_FLAG_NATFUNC".to_string());
        flags.push("DUK_HOBJECT_FLAG_STRICT".to_string());
        flags.push("DUK_HOBJECT_FLAG_NEWENV".to_string());
    }
    if o.constructable {
        flags.push("DUK_HOBJECT_FLAG_CONSTRUCTABLE".to_string());
    }
    if o.class == ObjectClass::Array {
        flags.push("DUK_HOBJECT_FLAG_EXOTIC_ARRAY".to_string());
    }
    flags.push(format!("DUK_HOBJECT_CLASS_AS_FLAGS({})", o.class.number()));
    flags.join("|")
}

/// Object records, property tables, the bidx table and the compressed
/// pointer table
pub fn emit_objects_source(
    w: &mut CSourceWriter,
    graph: &FinalizedGraph,
    strings: &StringSymbols,
) -> Result<RomObjectStats> {
    let objects = graph.objects();
    let symbols: ObjectSymbols = objects
        .iter()
        .enumerate()
        .map(|(i, o)| (o.id.clone(), format!("duk_obj_{}", i)))
        .collect();

    let mut ptrs = PointerCompressor::new();
    for symbol in strings.by_content() {
        ptrs.compress(Some(symbol))?;
    }
    let mut ids: Vec<&String> = symbols.keys().collect();
    ids.sort();
    for id in ids {
        ptrs.compress(Some(symbols[id].as_str()))?;
    }

    let mut tables = Vec::with_capacity(objects.len());
    for o in objects {
        tables.push(PropTable::build(o, strings, &symbols)?);
    }

    emit_per_layout(w, |w, layout| {
        for (i, table) in tables.iter().enumerate() {
            if !table.keys.is_empty() {
                w.emit_line(table.struct_decl(i, layout));
            }
        }
    });

    for (i, table) in tables.iter().enumerate() {
        if table.keys.is_empty() {
            continue;
        }
        w.emit_line(format!(
            "DUK_EXTERNAL_DECL const duk_romprops_{idx} duk_prop_{idx};",
            idx = i
        ));
        ptrs.compress(Some(format!("duk_prop_{}", i).as_str()))?;
    }
    w.emit_line("");

    for (i, o) in objects.iter().enumerate() {
        w.emit_line(format!(
            "DUK_EXTERNAL_DECL const {} duk_obj_{};",
            RecordKind::of(o).type_name(),
            i
        ));
    }
    w.emit_line("");

    let mut stats = RomObjectStats::default();
    for (i, o) in objects.iter().enumerate() {
        let numprops = o.properties.len();
        let props = (numprops > 0).then(|| format!("duk_prop_{}", i));
        let props_enc16 = ptrs.compress(props.as_deref())?;
        let iproto = match &o.internal_prototype {
            Some(id) => Some(symbols.get(id).ok_or_else(|| RomError::UnknownObject {
                from: o.id.clone(),
                target: id.clone(),
            })?),
            None => None,
        };
        let iproto_enc16 = ptrs.compress(iproto.map(String::as_str))?;

        let ptr = |sym: Option<&String>| sym.map_or("NULL".to_string(), |s| format!("&{}", s));
        // esize, enext, asize, hsize
        let common = format!(
            "{},1,{},{},{},{},{},{},0,0",
            object_flags(o),
            ptr(props.as_ref()),
            props_enc16,
            ptr(iproto),
            iproto_enc16,
            numprops,
            numprops
        );

        let kind = RecordKind::of(o);
        let init = match kind {
            RecordKind::Function => {
                let native = o.native.as_deref().ok_or_else(|| RomError::MalformedFunction {
                    id: o.id.clone(),
                    reason: "callable object without a native function".to_string(),
                })?;
                let nargs = if o.varargs {
                    "DUK_VARARGS".to_string()
                } else {
                    o.nargs
                        .ok_or_else(|| RomError::MalformedFunction {
                            id: o.id.clone(),
                            reason: "no nargs".to_string(),
                        })?
                        .to_string()
                };
                let magic = resolve_magic(o.magic.as_ref(), graph.bidx_map())?;
                format!(
                    "DUK__ROMFUN_INIT({},{},{},{});",
                    common, native, nargs, magic as i16
                )
            }
            RecordKind::Array => format!("DUK__ROMARR_INIT({},0);", common),
            RecordKind::Object => format!("DUK__ROMOBJ_INIT({});", common),
        };
        w.emit_line(format!(
            "DUK_EXTERNAL const {} duk_obj_{} = {}",
            kind.type_name(),
            i,
            init
        ));
        stats.objects += 1;
        stats.properties += numprops;
    }

    emit_per_layout(w, |w, layout| {
        for (i, table) in tables.iter().enumerate() {
            if !table.keys.is_empty() {
                w.emit_line(table.initializer(i, layout));
            }
        }
    });

    let bidx = graph.bidx_objects();
    w.emit_line(format!(
        "DUK_INTERNAL const duk_hobject * const duk_rom_builtins_bidx[{}] = {{",
        bidx.len()
    ));
    for o in bidx {
        w.emit_line(format!("\t(const duk_hobject *) &{},", symbols[&o.id]));
    }
    w.emit_line("};");

    w.emit_line("");
    ptrs.emit_table(w);
    info!(
        "{} compressed rom pointers (used range is [0x{:04x},0x{:04x}], {} space left)",
        ptrs.len(),
        ROMPTR_FIRST,
        ptrs.highest(),
        0xffff - ptrs.highest()
    );

    w.emit_line("");
    for name in HELPER_MACROS {
        w.emit_line(format!("#undef {}", name));
    }

    stats.compressed_pointers = ptrs.len();
    Ok(stats)
}

/// Bidx defines, counts and the bidx table declaration
pub fn emit_objects_header(w: &mut CSourceWriter, graph: &FinalizedGraph) {
    let bidx = graph.bidx_objects();
    for (i, o) in bidx.iter().enumerate() {
        w.emit_define(&o.bidx_define(), i);
    }
    w.emit_define("DUK_NUM_BUILTINS", bidx.len());
    w.emit_define("DUK_NUM_BIDX_BUILTINS", bidx.len());
    w.emit_define("DUK_NUM_ALL_BUILTINS", graph.objects().len());
    w.emit_line("");
    w.emit_line("#if !defined(DUK_SINGLE_FILE)");
    w.emit_line(format!(
        "DUK_INTERNAL_DECL const duk_hobject * const duk_rom_builtins_bidx[{}];",
        bidx.len()
    ));
    w.emit_line("#endif");
}
