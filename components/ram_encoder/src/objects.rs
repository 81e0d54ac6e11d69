//! Bit-packed object stream
//!
//! The stream has two passes over the RAM top level list. Pass one creates
//! the objects (class, length, function data); pass two fills in prototypes
//! and properties, which may reference any object created in pass one.

use crate::error::{EncodeError, Result};
use crate::layout::RamLayout;
use builtin_meta::model::{BI_DATE_PROTOTYPE, BI_FUNCTION_PROTOTYPE};
use builtin_meta::{
    latin1, resolve_magic, Attributes, FinalizedGraph, ObjectClass, ObjectEntry, PropertyEntry,
    PropertyValue,
};
use gen_support::BitEncoder;
use tracing::{debug, warn};

/// Class number width
pub const CLASS_BITS: u32 = 5;
/// Object reference width
pub const BIDX_BITS: u32 = 7;
/// String index width
pub const STRIDX_BITS: u32 = 9;
/// Native function index width
pub const NATIDX_BITS: u32 = 8;
/// Value property count width
pub const NUM_NORMAL_PROPS_BITS: u32 = 6;
/// Function property count width
pub const NUM_FUNC_PROPS_BITS: u32 = 6;
/// Custom attribute flags width
pub const PROP_FLAGS_BITS: u32 = 3;
/// Literal string length width
pub const STRING_LENGTH_BITS: u32 = 8;
/// Literal string character width
pub const STRING_CHAR_BITS: u32 = 7;
/// `length` value width
pub const LENGTH_PROP_BITS: u32 = 3;
/// Argument count width
pub const NARGS_BITS: u32 = 3;
/// Property value type width
pub const PROP_TYPE_BITS: u32 = 3;
/// Magic width
pub const MAGIC_BITS: u32 = 16;

/// Argument count marking a variable argument function
pub const NARGS_VARARGS_MARKER: u32 = 0x07;
/// Object reference meaning "none"
pub const NO_BIDX_MARKER: u32 = 0x7f;

const FLAG_WRITABLE: u32 = 1 << 0;
const FLAG_ENUMERABLE: u32 = 1 << 1;
const FLAG_CONFIGURABLE: u32 = 1 << 2;

const LENGTH_ATTRIBUTES: Attributes = Attributes::NONE;
const CONSTRUCTOR_ATTRIBUTES: Attributes = Attributes::DATA_DEFAULT;

/// Property value type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PropType {
    /// 8 raw bytes follow
    Double = 0,
    /// Literal string follows
    String = 1,
    /// String index follows
    Stridx = 2,
    /// Object reference follows
    Builtin = 3,
    /// No payload
    Undefined = 4,
    /// No payload
    BooleanTrue = 5,
    /// No payload
    BooleanFalse = 6,
    /// Getter and setter native indices follow
    Accessor = 7,
}

/// Byte order of embedded doubles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Little endian
    Little,
    /// Big endian
    Big,
    /// Little endian words, big endian word order (some ARM targets)
    Mixed,
}

impl ByteOrder {
    /// All byte orders, in output order
    pub const ALL: [ByteOrder; 3] = [ByteOrder::Little, ByteOrder::Big, ByteOrder::Mixed];

    /// Config define selecting this byte order
    pub fn define(self) -> &'static str {
        match self {
            ByteOrder::Little => "DUK_USE_DOUBLE_LE",
            ByteOrder::Big => "DUK_USE_DOUBLE_BE",
            ByteOrder::Mixed => "DUK_USE_DOUBLE_ME",
        }
    }

    /// Rearrange big endian double bytes into this order
    pub fn arrange(self, be: [u8; 8]) -> [u8; 8] {
        let index: [usize; 8] = match self {
            ByteOrder::Big => [0, 1, 2, 3, 4, 5, 6, 7],
            ByteOrder::Little => [7, 6, 5, 4, 3, 2, 1, 0],
            ByteOrder::Mixed => [3, 2, 1, 0, 7, 6, 5, 4],
        };
        index.map(|i| be[i])
    }
}

/// Property flag bits used by the decoder (`w`=1, `e`=2, `c`=4)
pub fn property_flags(attrs: Attributes) -> u32 {
    let mut flags = 0;
    if attrs.writable {
        flags |= FLAG_WRITABLE;
    }
    if attrs.enumerable {
        flags |= FLAG_ENUMERABLE;
    }
    if attrs.configurable {
        flags |= FLAG_CONFIGURABLE;
    }
    flags
}

/// Counts from one encoding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectStats {
    /// Top level objects
    pub objects: usize,
    /// Value properties
    pub normal_props: usize,
    /// Function properties
    pub function_props: usize,
}

/// Encode the object stream for one double byte order
pub fn encode_objects(
    graph: &FinalizedGraph,
    layout: &RamLayout,
    order: ByteOrder,
) -> Result<(Vec<u8>, ObjectStats)> {
    let mut w = StreamWriter {
        enc: BitEncoder::new(),
        graph,
        layout,
        order,
        stats: ObjectStats::default(),
    };
    for o in layout.top_level(graph) {
        w.object_header(o)?;
        w.stats.objects += 1;
    }
    for o in layout.top_level(graph) {
        w.object_properties(o)?;
    }
    let stats = w.stats;
    let data = w.enc.finish();
    debug!(
        "{:?}: {} ram builtins, {} normal properties, {} function properties, {} bytes of object init data",
        order,
        stats.objects,
        stats.normal_props,
        stats.function_props,
        data.len()
    );
    Ok((data, stats))
}

fn steal<'p>(props: &mut Vec<&'p PropertyEntry>, key: &[u8]) -> Option<&'p PropertyEntry> {
    let idx = props.iter().position(|p| p.key == key)?;
    Some(props.remove(idx))
}

fn key_text(p: &PropertyEntry) -> String {
    latin1::to_text(&p.key)
}

struct StreamWriter<'a> {
    enc: BitEncoder,
    graph: &'a FinalizedGraph,
    layout: &'a RamLayout,
    order: ByteOrder,
    stats: ObjectStats,
}

impl<'a> StreamWriter<'a> {
    fn field(&mut self, value: usize, width: u32, what: impl FnOnce() -> String) -> Result<()> {
        let limit = (1usize << width) - 1;
        if value > limit {
            return Err(EncodeError::CapacityOverflow {
                what: what(),
                value,
                limit,
            });
        }
        self.enc.bits(value as u32, width)?;
        Ok(())
    }

    fn object_ref(&mut self, from: &str, target: Option<&str>) -> Result<()> {
        let Some(target) = target else {
            self.enc.bits(NO_BIDX_MARKER, BIDX_BITS)?;
            return Ok(());
        };
        let idx = self
            .layout
            .ramidx_of(target)
            .ok_or_else(|| EncodeError::UnknownObject {
                from: from.to_string(),
                target: target.to_string(),
            })?;
        // The none marker is the last encodable value.
        if idx >= NO_BIDX_MARKER as usize {
            return Err(EncodeError::CapacityOverflow {
                what: "RAM object index".to_string(),
                value: idx,
                limit: NO_BIDX_MARKER as usize - 1,
            });
        }
        self.enc.bits(idx as u32, BIDX_BITS)?;
        Ok(())
    }

    fn literal(&mut self, bytes: &[u8]) -> Result<()> {
        self.field(bytes.len(), STRING_LENGTH_BITS, || {
            format!("length of literal {:?}", latin1::to_text(bytes))
        })?;
        for &b in bytes {
            if b > 0x7f {
                return Err(EncodeError::NonAsciiLiteral {
                    byte: b,
                    context: latin1::to_text(bytes),
                });
            }
            self.enc.bits(u32::from(b), STRING_CHAR_BITS)?;
        }
        Ok(())
    }

    fn stridx_or_string(&mut self, bytes: &[u8]) -> Result<()> {
        match self.graph.stridx_of(bytes) {
            Some(stridx) => {
                self.enc.flag(false);
                self.field(stridx, STRIDX_BITS, || "string index".to_string())
            }
            None => {
                self.enc.flag(true);
                self.literal(bytes)
            }
        }
    }

    fn native(&mut self, func: &ObjectEntry) -> Result<()> {
        let name = func
            .native
            .as_deref()
            .ok_or_else(|| EncodeError::MalformedFunction {
                id: func.id.clone(),
                reason: "no native function".to_string(),
            })?;
        let idx = self
            .layout
            .native_index(name)
            .ok_or_else(|| EncodeError::MalformedFunction {
                id: func.id.clone(),
                reason: format!("native {} missing from the native table", name),
            })?;
        self.field(idx, NATIDX_BITS, || "native function index".to_string())
    }

    fn nargs(&mut self, func: &ObjectEntry, length: Option<u32>) -> Result<()> {
        if func.varargs {
            self.enc.flag(true);
            self.enc.bits(NARGS_VARARGS_MARKER, NARGS_BITS)?;
            return Ok(());
        }
        match func.nargs {
            Some(nargs) if Some(nargs) != length => {
                self.enc.flag(true);
                if nargs >= NARGS_VARARGS_MARKER {
                    return Err(EncodeError::CapacityOverflow {
                        what: format!("nargs of {}", func.id),
                        value: nargs as usize,
                        limit: NARGS_VARARGS_MARKER as usize - 1,
                    });
                }
                self.enc.bits(nargs, NARGS_BITS)?;
            }
            _ => self.enc.flag(false),
        }
        Ok(())
    }

    fn magic(&mut self, func: &ObjectEntry) -> Result<()> {
        let magic = resolve_magic(func.magic.as_ref(), self.layout.ramidx_map())?;
        if magic != 0 {
            self.enc.flag(true);
            self.enc.bits(u32::from(magic), MAGIC_BITS)?;
        } else {
            self.enc.flag(false);
        }
        Ok(())
    }

    fn integer_length(&self, owner: &ObjectEntry, prop: &PropertyEntry) -> Result<u32> {
        let value = match &prop.value {
            PropertyValue::Double(bits) => bits.as_u32(),
            _ => None,
        };
        value.ok_or_else(|| EncodeError::UnsupportedValueShape {
            id: owner.id.clone(),
            key: key_text(prop),
            reason: "length must be a non-negative integer",
        })
    }

    fn object_header(&mut self, o: &ObjectEntry) -> Result<()> {
        self.enc.bits(o.class.number(), CLASS_BITS)?;

        let length_prop = o.property(b"length");
        let length = match length_prop {
            Some(p) => {
                let v = self.integer_length(o, p)?;
                self.enc.flag(true);
                self.field(v as usize, LENGTH_PROP_BITS, || format!("length of {}", o.id))?;
                Some(v)
            }
            None => {
                self.enc.flag(false);
                None
            }
        };

        if let Some(p) = length_prop {
            // Array.prototype.length is writable, handled by the decoder.
            if p.attributes != LENGTH_ATTRIBUTES && o.class != ObjectClass::Array {
                return Err(EncodeError::UnexpectedAttributes {
                    id: o.id.clone(),
                    key: key_text(p),
                    found: p.attributes.canonical(),
                    expected: "",
                });
            }
        }

        if o.class != ObjectClass::Function {
            return Ok(());
        }

        self.native(o)?;
        self.nargs(o, length)?;
        if !o.callable {
            return Err(EncodeError::MalformedFunction {
                id: o.id.clone(),
                reason: "Function class object is not callable".to_string(),
            });
        }
        match o.property(b"name").map(|p| &p.value) {
            Some(PropertyValue::String(name)) => self.stridx_or_string(name)?,
            _ => {
                return Err(EncodeError::MalformedFunction {
                    id: o.id.clone(),
                    reason: "missing string valued name".to_string(),
                })
            }
        }
        self.enc.flag(o.constructable);
        self.magic(o)
    }

    fn object_properties(&mut self, o: &ObjectEntry) -> Result<()> {
        let mut props: Vec<&PropertyEntry> = o.properties.iter().collect();

        self.object_ref(&o.id, o.internal_prototype.as_deref())?;

        let proto = steal(&mut props, b"prototype");
        self.special_ref(o, proto, Attributes::NONE, "")?;
        let constr = steal(&mut props, b"constructor");
        self.special_ref(o, constr, CONSTRUCTOR_ATTRIBUTES, "wc")?;

        if o.class == ObjectClass::Function {
            let name = steal(&mut props, b"name").ok_or_else(|| EncodeError::MalformedFunction {
                id: o.id.clone(),
                reason: "missing name".to_string(),
            })?;
            let (expected, text) = if o.id == BI_FUNCTION_PROTOTYPE {
                (
                    Attributes {
                        writable: true,
                        ..Attributes::NONE
                    },
                    "w",
                )
            } else {
                (Attributes::NONE, "")
            };
            if name.attributes != expected {
                return Err(EncodeError::UnexpectedAttributes {
                    id: o.id.clone(),
                    key: key_text(name),
                    found: name.attributes.canonical(),
                    expected: text,
                });
            }
        }

        steal(&mut props, b"length");
        if o.id == BI_DATE_PROTOTYPE {
            steal(&mut props, b"toGMTString");
        }

        let (functions, values): (Vec<&PropertyEntry>, Vec<&PropertyEntry>) =
            props.into_iter().partition(|p| match &p.value {
                PropertyValue::Object(id) => self
                    .graph
                    .object(id)
                    .is_some_and(ObjectEntry::is_inline_native),
                _ => false,
            });

        self.field(values.len(), NUM_NORMAL_PROPS_BITS, || {
            format!("value property count of {}", o.id)
        })?;
        for p in values {
            self.value_property(o, p)?;
            self.stats.normal_props += 1;
        }

        self.field(functions.len(), NUM_FUNC_PROPS_BITS, || {
            format!("function property count of {}", o.id)
        })?;
        for p in functions {
            self.function_property(o, p)?;
            self.stats.function_props += 1;
        }
        Ok(())
    }

    fn special_ref(
        &mut self,
        o: &ObjectEntry,
        prop: Option<&PropertyEntry>,
        expected: Attributes,
        expected_text: &'static str,
    ) -> Result<()> {
        let Some(p) = prop else {
            return self.object_ref(&o.id, None);
        };
        let PropertyValue::Object(target) = &p.value else {
            return Err(EncodeError::UnsupportedValueShape {
                id: o.id.clone(),
                key: key_text(p),
                reason: "must reference an object",
            });
        };
        if p.attributes != expected {
            return Err(EncodeError::UnexpectedAttributes {
                id: o.id.clone(),
                key: key_text(p),
                found: p.attributes.canonical(),
                expected: expected_text,
            });
        }
        self.object_ref(&o.id, Some(target))
    }

    fn value_property(&mut self, o: &ObjectEntry, p: &PropertyEntry) -> Result<()> {
        self.stridx_or_string(&p.key)?;

        // The accessor flag is implied by the value type.
        let attrs = Attributes {
            accessor: false,
            ..p.attributes
        };
        if attrs != Attributes::DATA_DEFAULT {
            self.enc.flag(true);
            self.enc.bits(property_flags(attrs), PROP_FLAGS_BITS)?;
        } else {
            self.enc.flag(false);
        }

        match &p.value {
            PropertyValue::Null => {
                warn!(
                    object = %o.id,
                    property = %key_text(p),
                    "RAM init data format doesn't support null, value replaced with undefined"
                );
                self.prop_type(PropType::Undefined)?;
            }
            PropertyValue::Undefined => self.prop_type(PropType::Undefined)?,
            PropertyValue::Boolean(true) => self.prop_type(PropType::BooleanTrue)?,
            PropertyValue::Boolean(false) => self.prop_type(PropType::BooleanFalse)?,
            PropertyValue::Double(bits) => {
                self.prop_type(PropType::Double)?;
                let bytes = self.order.arrange(bits.be_bytes());
                self.enc.bytes(&bytes);
            }
            PropertyValue::String(s) => match self.graph.stridx_of(s) {
                Some(stridx) => {
                    self.prop_type(PropType::Stridx)?;
                    self.field(stridx, STRIDX_BITS, || "string index".to_string())?;
                }
                None => {
                    self.prop_type(PropType::String)?;
                    self.literal(s)?;
                }
            },
            PropertyValue::Object(id) => {
                self.prop_type(PropType::Builtin)?;
                self.object_ref(&o.id, Some(id))?;
            }
            PropertyValue::Accessor { getter, setter } => {
                self.prop_type(PropType::Accessor)?;
                let getter = self.accessor_half(o, p, getter.as_deref(), 0)?;
                let setter = self.accessor_half(o, p, setter.as_deref(), 1)?;
                self.native(getter)?;
                self.native(setter)?;
            }
        }
        Ok(())
    }

    fn accessor_half(
        &self,
        o: &ObjectEntry,
        p: &PropertyEntry,
        id: Option<&str>,
        nargs: u32,
    ) -> Result<&'a ObjectEntry> {
        let malformed = |reason: String| EncodeError::MalformedFunction {
            id: o.id.clone(),
            reason: format!("accessor {}: {}", key_text(p), reason),
        };
        let id = id.ok_or_else(|| malformed("getter or setter missing".to_string()))?;
        let func = self
            .graph
            .object(id)
            .ok_or_else(|| malformed(format!("unknown function {}", id)))?;
        if func.nargs != Some(nargs) {
            return Err(malformed(format!("{} must take {} arguments", id, nargs)));
        }
        if resolve_magic(func.magic.as_ref(), self.layout.ramidx_map())? != 0 {
            return Err(malformed(format!("{} must not have a magic value", id)));
        }
        Ok(func)
    }

    fn prop_type(&mut self, t: PropType) -> Result<()> {
        self.enc.bits(t as u32, PROP_TYPE_BITS)?;
        Ok(())
    }

    fn function_property(&mut self, o: &ObjectEntry, p: &PropertyEntry) -> Result<()> {
        let PropertyValue::Object(id) = &p.value else {
            return Err(EncodeError::UnsupportedValueShape {
                id: o.id.clone(),
                key: key_text(p),
                reason: "function property must reference an object",
            });
        };
        let graph = self.graph;
        let func = graph.object(id).ok_or_else(|| EncodeError::UnknownObject {
            from: o.id.clone(),
            target: id.clone(),
        })?;
        let length_prop = func
            .property(b"length")
            .ok_or_else(|| EncodeError::MalformedFunction {
                id: func.id.clone(),
                reason: "missing length".to_string(),
            })?;
        let length = self.integer_length(func, length_prop)?;

        self.stridx_or_string(&p.key)?;
        self.native(func)?;
        self.field(length as usize, LENGTH_PROP_BITS, || {
            format!("length of {}", func.id)
        })?;
        self.nargs(func, Some(length))?;
        self.magic(func)
    }
}
